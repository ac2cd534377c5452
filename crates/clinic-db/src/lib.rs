//! # clinic-db
//!
//! Document store for the clinic backend.
//!
//! Every resource lives in its own collection, stored whole as a JSON
//! document next to its id, unique slug and display position:
//!
//! - Connection pool management
//! - The [`DocumentStore`] trait with PostgreSQL and in-memory backends
//! - [`Stores`], one store per resource collection
//!
//! ## Example
//!
//! ```ignore
//! use clinic_db::{Database, PoolSettings, Stores};
//!
//! let db = Database::connect(&PoolSettings::new(url)).await?;
//! let stores = Stores::postgres(&db).await?;
//! let albums = stores.albums.find_all().await?;
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod repository;
pub mod stores;

pub use memory::MemoryDocumentStore;
pub use pool::{Database, PoolSettings};
pub use postgres::PgDocumentStore;
pub use repository::{check_order, DocumentStore, RepositoryError, RepositoryResult};
pub use stores::Stores;

//! # clinic-auth
//!
//! Authentication for the clinic backend.
//!
//! ## Features
//!
//! - HS256 JWT issue and validation
//! - Bearer header parsing
//! - The authenticated principal and its role checks

pub mod jwt;
pub mod permissions;

pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use permissions::CurrentUser;

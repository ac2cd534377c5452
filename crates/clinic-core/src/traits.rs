//! Core traits shared by models and stores

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Primary key of every stored document
pub type DocumentId = Uuid;

/// A resource persisted in a document collection.
///
/// Documents are stored whole; the store only needs to know the key, the
/// optional unique slug, and the collection they belong to.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Collection (table) name
    const COLLECTION: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;

    fn id(&self) -> DocumentId;

    /// Unique slug, for collections addressed by slug
    fn slug(&self) -> Option<&str> {
        None
    }

    fn created_at(&self) -> DateTime<Utc>;

    /// Record a modification
    fn touch(&mut self);
}

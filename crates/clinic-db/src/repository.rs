//! Document store trait
//!
//! One store per collection. Documents keep a display position; `find_all`
//! returns them in that order and `reorder` rewrites it.

use std::collections::HashSet;

use async_trait::async_trait;
use clinic_core::error::ClinicError;
use clinic_core::traits::{Document, DocumentId};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique slug already used by another document
    #[error("Conflict: slug '{0}' is already taken")]
    Conflict(String),
}

/// Result type for store operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for ClinicError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ClinicError::not_found("Document", "id", id),
            RepositoryError::Conflict(_) => {
                ClinicError::invalid("slug", "Slug has already been taken")
            }
            RepositoryError::Validation(message) => ClinicError::invalid("order", message),
            RepositoryError::Database(e) => ClinicError::Database(e.to_string()),
            RepositoryError::Serialization(e) => ClinicError::Internal(e.to_string()),
        }
    }
}

/// Persistent collection of documents of one type
#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Store a new document at the end of the collection order
    async fn insert(&self, doc: &T) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: DocumentId) -> RepositoryResult<Option<T>>;

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<T>>;

    /// Documents whose top-level text field equals `value`, ignoring ASCII case
    async fn find_where(&self, field: &str, value: &str) -> RepositoryResult<Vec<T>>;

    /// All documents in display order
    async fn find_all(&self) -> RepositoryResult<Vec<T>>;

    /// Replace an existing document, keeping its position
    async fn update(&self, doc: &T) -> RepositoryResult<()>;

    /// Remove a document, returning it when it existed
    async fn delete(&self, id: DocumentId) -> RepositoryResult<Option<T>>;

    async fn exists(&self, id: DocumentId) -> RepositoryResult<bool>;

    /// Slug is used by a document other than `exclude`
    async fn slug_taken(&self, slug: &str, exclude: Option<DocumentId>) -> RepositoryResult<bool>;

    /// Apply a display order.
    ///
    /// Listed documents take ranks `0..n` in the given order; the others
    /// follow, keeping their relative order. Applying the same order twice
    /// leaves the collection as applying it once. Unknown or repeated ids
    /// fail without changing anything.
    async fn reorder(&self, ids: &[DocumentId]) -> RepositoryResult<()>;

    async fn count(&self) -> RepositoryResult<i64>;
}

/// Reject repeated ids in a requested order
pub fn check_order(ids: &[DocumentId]) -> RepositoryResult<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            return Err(RepositoryError::Validation(format!(
                "Order lists {} more than once",
                id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_check_order_rejects_duplicates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(check_order(&[a, b]).is_ok());
        assert!(matches!(check_order(&[a, b, a]), Err(RepositoryError::Validation(_))));
    }

    #[test]
    fn test_conflict_maps_to_validation() {
        let err: ClinicError = RepositoryError::Conflict("camp".into()).into();
        assert_eq!(err.status_code(), 400);
    }
}

//! Helpers shared by the resource services

use clinic_contracts::Contract;
use clinic_core::error::ClinicError;
use clinic_core::result::ClinicResult;
use clinic_core::slug::slugify;
use clinic_core::traits::{Document, DocumentId};
use clinic_db::{DocumentStore, RepositoryError};
use uuid::Uuid;

/// Run a contract, turning its errors into a 400
pub fn validate<T, C: Contract<T>>(contract: &C, input: &T) -> ClinicResult<()> {
    contract.validate(input).map_err(ClinicError::from)
}

/// Path ids that are not UUIDs cannot name a stored document
pub fn parse_id<T: Document>(raw: &str) -> ClinicResult<DocumentId> {
    Uuid::parse_str(raw.trim()).map_err(|_| ClinicError::not_found(T::TYPE_NAME, "id", raw))
}

pub async fn find_or_404<T: Document>(
    store: &dyn DocumentStore<T>,
    id: DocumentId,
) -> ClinicResult<T> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ClinicError::not_found(T::TYPE_NAME, "id", id))
}

pub async fn find_slug_or_404<T: Document>(
    store: &dyn DocumentStore<T>,
    slug: &str,
) -> ClinicResult<T> {
    store
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| ClinicError::not_found(T::TYPE_NAME, "slug", slug))
}

/// Derive the slug for `source` and make sure no other document holds it
pub async fn available_slug<T: Document>(
    store: &dyn DocumentStore<T>,
    source: &str,
    exclude: Option<DocumentId>,
) -> ClinicResult<String> {
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(ClinicError::invalid(
            "slug",
            "Slug must contain at least one letter or digit",
        ));
    }
    if store.slug_taken(&slug, exclude).await? {
        return Err(ClinicError::invalid("slug", "Slug has already been taken"));
    }
    Ok(slug)
}

/// Parse the ids of a reorder request
pub fn parse_order<T: Document>(raw: &[String]) -> ClinicResult<Vec<DocumentId>> {
    raw.iter().map(|id| parse_id::<T>(id)).collect()
}

/// Apply a collection order, reporting unknown ids as missing documents
pub async fn apply_order<T: Document>(
    store: &dyn DocumentStore<T>,
    raw: &[String],
) -> ClinicResult<()> {
    let ids = parse_order::<T>(raw)?;
    store.reorder(&ids).await.map_err(|e| match e {
        RepositoryError::NotFound(id) => ClinicError::not_found(T::TYPE_NAME, "id", id),
        other => other.into(),
    })
}

/// Trimmed value, `None` when absent or blank
pub fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_db::MemoryDocumentStore;
    use clinic_models::Video;

    #[test]
    fn test_parse_id_rejects_garbage_as_not_found() {
        let err = parse_id::<Video>("not-a-uuid").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_available_slug() {
        let store = MemoryDocumentStore::<Video>::new();
        let video = Video::new(
            "Knee Rehab".into(),
            "https://youtu.be/abc".into(),
            "knee-rehab".into(),
        );
        store.insert(&video).await.unwrap();

        let err = available_slug(&store, "Knee  rehab", None).await.unwrap_err();
        assert_eq!(err.public_message(), "Slug has already been taken");
        assert_eq!(
            available_slug(&store, "Knee Rehab", Some(video.id)).await.unwrap(),
            "knee-rehab"
        );
        assert!(available_slug(&store, "?!%", None).await.is_err());
    }

    #[tokio::test]
    async fn test_apply_order_unknown_id() {
        let store = MemoryDocumentStore::<Video>::new();
        let err = apply_order(&store, &[Uuid::new_v4().to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.public_message(), "Video not found");
    }

    #[test]
    fn test_present() {
        assert_eq!(present(Some("  x ".into())), Some("x".into()));
        assert_eq!(present(Some("   ".into())), None);
        assert_eq!(present(None), None);
    }
}

//! In-memory document store
//!
//! Used for development without a database and in tests. Vector order is
//! the display order.

use async_trait::async_trait;
use clinic_core::traits::{Document, DocumentId};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::repository::{check_order, DocumentStore, RepositoryError, RepositoryResult};

pub struct MemoryDocumentStore<T> {
    docs: RwLock<Vec<T>>,
}

impl<T> MemoryDocumentStore<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryDocumentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn slug_clash<T: Document>(docs: &[T], slug: Option<&str>, exclude: DocumentId) -> bool {
    match slug {
        Some(slug) => docs
            .iter()
            .any(|d| d.id() != exclude && d.slug() == Some(slug)),
        None => false,
    }
}

fn field_matches(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(s)) => s.eq_ignore_ascii_case(expected),
        Some(Value::Number(n)) => n.to_string() == expected,
        _ => false,
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for MemoryDocumentStore<T> {
    async fn insert(&self, doc: &T) -> RepositoryResult<()> {
        let mut docs = self.docs.write().await;
        if slug_clash(&docs, doc.slug(), doc.id()) {
            return Err(RepositoryError::Conflict(doc.slug().unwrap_or_default().to_string()));
        }
        docs.push(doc.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: DocumentId) -> RepositoryResult<Option<T>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| d.id() == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<T>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| d.slug() == Some(slug)).cloned())
    }

    async fn find_where(&self, field: &str, value: &str) -> RepositoryResult<Vec<T>> {
        let docs = self.docs.read().await;
        let mut found = Vec::new();
        for doc in docs.iter() {
            let json = serde_json::to_value(doc)?;
            if field_matches(json.get(field), value) {
                found.push(doc.clone());
            }
        }
        Ok(found)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<T>> {
        Ok(self.docs.read().await.clone())
    }

    async fn update(&self, doc: &T) -> RepositoryResult<()> {
        let mut docs = self.docs.write().await;
        if slug_clash(&docs, doc.slug(), doc.id()) {
            return Err(RepositoryError::Conflict(doc.slug().unwrap_or_default().to_string()));
        }
        let slot = docs
            .iter_mut()
            .find(|d| d.id() == doc.id())
            .ok_or_else(|| RepositoryError::NotFound(doc.id().to_string()))?;
        *slot = doc.clone();
        Ok(())
    }

    async fn delete(&self, id: DocumentId) -> RepositoryResult<Option<T>> {
        let mut docs = self.docs.write().await;
        let position = docs.iter().position(|d| d.id() == id);
        Ok(position.map(|pos| docs.remove(pos)))
    }

    async fn exists(&self, id: DocumentId) -> RepositoryResult<bool> {
        Ok(self.docs.read().await.iter().any(|d| d.id() == id))
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<DocumentId>) -> RepositoryResult<bool> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .any(|d| d.slug() == Some(slug) && Some(d.id()) != exclude))
    }

    async fn reorder(&self, ids: &[DocumentId]) -> RepositoryResult<()> {
        check_order(ids)?;
        let mut docs = self.docs.write().await;

        if let Some(missing) = ids.iter().find(|id| !docs.iter().any(|d| d.id() == **id)) {
            return Err(RepositoryError::NotFound(missing.to_string()));
        }

        let mut remaining = std::mem::take(&mut *docs);
        let mut ordered = Vec::with_capacity(remaining.len());
        for id in ids {
            if let Some(pos) = remaining.iter().position(|d| d.id() == *id) {
                ordered.push(remaining.remove(pos));
            }
        }
        ordered.extend(remaining);
        *docs = ordered;
        Ok(())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        Ok(self.docs.read().await.len() as i64)
    }
}

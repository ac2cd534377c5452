//! One store per resource collection

use std::sync::Arc;

use clinic_core::traits::Document;
use clinic_models::{Album, Appointment, BlogPost, ExerciseVideo, Profile, Treatment, Video};
use tracing::info;

use crate::memory::MemoryDocumentStore;
use crate::pool::Database;
use crate::postgres::PgDocumentStore;
use crate::repository::{DocumentStore, RepositoryResult};

/// Stores for every collection, sharing one backend
#[derive(Clone)]
pub struct Stores {
    pub profiles: Arc<dyn DocumentStore<Profile>>,
    pub appointments: Arc<dyn DocumentStore<Appointment>>,
    pub albums: Arc<dyn DocumentStore<Album>>,
    pub blog_posts: Arc<dyn DocumentStore<BlogPost>>,
    pub treatments: Arc<dyn DocumentStore<Treatment>>,
    pub videos: Arc<dyn DocumentStore<Video>>,
    pub exercise_videos: Arc<dyn DocumentStore<ExerciseVideo>>,
    database: Option<Database>,
}

impl Stores {
    /// Process-local stores; contents are lost on exit
    pub fn memory() -> Self {
        Self {
            profiles: Arc::new(MemoryDocumentStore::new()),
            appointments: Arc::new(MemoryDocumentStore::new()),
            albums: Arc::new(MemoryDocumentStore::new()),
            blog_posts: Arc::new(MemoryDocumentStore::new()),
            treatments: Arc::new(MemoryDocumentStore::new()),
            videos: Arc::new(MemoryDocumentStore::new()),
            exercise_videos: Arc::new(MemoryDocumentStore::new()),
            database: None,
        }
    }

    /// PostgreSQL-backed stores; collection tables are created when missing
    pub async fn postgres(db: &Database) -> RepositoryResult<Self> {
        let stores = Self {
            profiles: pg_store::<Profile>(db).await?,
            appointments: pg_store::<Appointment>(db).await?,
            albums: pg_store::<Album>(db).await?,
            blog_posts: pg_store::<BlogPost>(db).await?,
            treatments: pg_store::<Treatment>(db).await?,
            videos: pg_store::<Video>(db).await?,
            exercise_videos: pg_store::<ExerciseVideo>(db).await?,
            database: Some(db.clone()),
        };
        info!("Document collections ready");
        Ok(stores)
    }

    pub fn backend_name(&self) -> &'static str {
        if self.database.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Check the backend is reachable
    pub async fn ping(&self) -> RepositoryResult<()> {
        if let Some(db) = &self.database {
            db.ping().await?;
        }
        Ok(())
    }
}

async fn pg_store<T: Document>(db: &Database) -> RepositoryResult<Arc<dyn DocumentStore<T>>> {
    let store = PgDocumentStore::<T>::new(db.pool().clone());
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_stores_are_independent() {
        let stores = Stores::memory();
        let treatment = Treatment::new("Scoliosis".into(), "Spinal curvature".into());
        stores.treatments.insert(&treatment).await.unwrap();

        assert_eq!(stores.treatments.count().await.unwrap(), 1);
        assert_eq!(stores.profiles.count().await.unwrap(), 0);
        assert_eq!(stores.backend_name(), "memory");
        assert!(stores.ping().await.is_ok());
    }
}

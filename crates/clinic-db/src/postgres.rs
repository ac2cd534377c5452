//! PostgreSQL document store
//!
//! Table layout per collection:
//!
//! ```sql
//! id UUID PRIMARY KEY, slug TEXT UNIQUE, position BIGINT,
//! body JSONB, created_at TIMESTAMPTZ, updated_at TIMESTAMPTZ
//! ```
//!
//! Table names come from `Document::COLLECTION` and are never user input.

use std::marker::PhantomData;

use async_trait::async_trait;
use clinic_core::traits::{Document, DocumentId};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use crate::repository::{check_order, DocumentStore, RepositoryError, RepositoryResult};

pub struct PgDocumentStore<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> PgDocumentStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    fn table() -> &'static str {
        T::COLLECTION
    }

    /// Create the collection table when missing
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                slug TEXT UNIQUE,
                position BIGINT NOT NULL DEFAULT 0,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table = Self::table()
        );
        sqlx::query(&sql).execute(&self.pool).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_position_idx ON {table} (position, created_at)",
            table = Self::table()
        );
        sqlx::query(&index).execute(&self.pool).await?;

        debug!(collection = Self::table(), "Collection schema ready");
        Ok(())
    }
}

/// Unique violations on the slug column become conflicts
fn map_write_error(err: sqlx::Error, slug: Option<&str>) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(slug.unwrap_or_default().to_string());
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl<T: Document> DocumentStore<T> for PgDocumentStore<T> {
    async fn insert(&self, doc: &T) -> RepositoryResult<()> {
        let sql = format!(
            r#"
            INSERT INTO {table} (id, slug, position, body, created_at, updated_at)
            VALUES ($1, $2, (SELECT COALESCE(MAX(position), -1) + 1 FROM {table}), $3, $4, NOW())
            "#,
            table = Self::table()
        );
        sqlx::query(&sql)
            .bind(doc.id())
            .bind(doc.slug())
            .bind(Json(doc))
            .bind(doc.created_at())
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, doc.slug()))?;
        Ok(())
    }

    async fn find_by_id(&self, id: DocumentId) -> RepositoryResult<Option<T>> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", Self::table());
        let row = sqlx::query_scalar::<_, Json<T>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<T>> {
        let sql = format!("SELECT body FROM {} WHERE slug = $1", Self::table());
        let row = sqlx::query_scalar::<_, Json<T>>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn find_where(&self, field: &str, value: &str) -> RepositoryResult<Vec<T>> {
        let sql = format!(
            r#"
            SELECT body FROM {}
            WHERE LOWER(body ->> $1) = LOWER($2)
            ORDER BY position ASC, created_at ASC
            "#,
            Self::table()
        );
        let rows = sqlx::query_scalar::<_, Json<T>>(&sql)
            .bind(field)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<T>> {
        let sql = format!(
            "SELECT body FROM {} ORDER BY position ASC, created_at ASC",
            Self::table()
        );
        let rows = sqlx::query_scalar::<_, Json<T>>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn update(&self, doc: &T) -> RepositoryResult<()> {
        let sql = format!(
            "UPDATE {} SET slug = $2, body = $3, updated_at = NOW() WHERE id = $1",
            Self::table()
        );
        let result = sqlx::query(&sql)
            .bind(doc.id())
            .bind(doc.slug())
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, doc.slug()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(doc.id().to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: DocumentId) -> RepositoryResult<Option<T>> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING body", Self::table());
        let row = sqlx::query_scalar::<_, Json<T>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn exists(&self, id: DocumentId) -> RepositoryResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", Self::table());
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<DocumentId>) -> RepositoryResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
            Self::table()
        );
        let taken = sqlx::query_scalar::<_, bool>(&sql)
            .bind(slug)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await?;
        Ok(taken)
    }

    async fn reorder(&self, ids: &[DocumentId]) -> RepositoryResult<()> {
        check_order(ids)?;
        let mut tx = self.pool.begin().await?;

        let known_sql = format!("SELECT id FROM {} WHERE id = ANY($1)", Self::table());
        let known: Vec<DocumentId> = sqlx::query_scalar(&known_sql)
            .bind(ids)
            .fetch_all(&mut *tx)
            .await?;
        if let Some(missing) = ids.iter().find(|id| !known.contains(*id)) {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound(missing.to_string()));
        }

        let listed_sql = format!(
            r#"
            UPDATE {table} AS d SET position = o.ord - 1
            FROM UNNEST($1::uuid[]) WITH ORDINALITY AS o(id, ord)
            WHERE d.id = o.id
            "#,
            table = Self::table()
        );
        sqlx::query(&listed_sql).bind(ids).execute(&mut *tx).await?;

        let rest_sql = format!(
            r#"
            UPDATE {table} AS d SET position = r.rn + $2 - 1
            FROM (
                SELECT id, ROW_NUMBER() OVER (ORDER BY position, created_at) AS rn
                FROM {table}
                WHERE NOT (id = ANY($1))
            ) AS r
            WHERE d.id = r.id
            "#,
            table = Self::table()
        );
        sqlx::query(&rest_sql)
            .bind(ids)
            .bind(ids.len() as i64)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(collection = Self::table(), count = ids.len(), "Order applied");
        Ok(())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", Self::table());
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

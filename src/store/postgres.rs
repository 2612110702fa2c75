use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, PgPool, Row};
use std::marker::PhantomData;
use tracing::{debug, instrument, warn};

use super::{Document, DocumentRepository};
use crate::shared::AppError;

/// PostgreSQL implementation of DocumentRepository
///
/// Each collection is a table of `(id, doc JSONB, created_at)`.
pub struct PostgresDocumentRepository<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> PostgresDocumentRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Creates the collection table if it does not exist yet
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                id TEXT PRIMARY KEY, \
                doc JSONB NOT NULL, \
                created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            T::COLLECTION
        );

        sqlx::query(&statement)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create collection table");
                AppError::DatabaseError(e.to_string())
            })?;

        for field in T::UNIQUE_FIELDS {
            let statement = format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {table}_{field}_key ON {table} ((doc->>'{field}'))",
                table = T::COLLECTION,
            );
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    warn!(error = %e, field = %field, "Failed to create unique index");
                    AppError::DatabaseError(e.to_string())
                })?;
        }

        debug!("Collection table ready");
        Ok(())
    }
}

/// Unique-index violations become `Conflict`; a clashing primary key stays a
/// database error since ids are generated server-side.
fn write_error<T: Document>(e: sqlx::Error) -> AppError {
    if let Some(db_error) = e.as_database_error() {
        let pkey = format!("{}_pkey", T::COLLECTION);
        if db_error.is_unique_violation() && db_error.constraint() != Some(pkey.as_str()) {
            let constraint = db_error.constraint().unwrap_or(T::COLLECTION);
            return AppError::Conflict(format!("Duplicate value violates {constraint}"));
        }
    }
    AppError::DatabaseError(e.to_string())
}

fn decode_doc<T: Document>(row: &sqlx::postgres::PgRow) -> Result<T, AppError> {
    row.try_get::<Json<T>, _>("doc")
        .map(|Json(doc)| doc)
        .map_err(|e| AppError::DatabaseError(e.to_string()))
}

#[async_trait]
impl<T: Document> DocumentRepository<T> for PostgresDocumentRepository<T> {
    #[instrument(skip(self, doc), fields(collection = T::COLLECTION))]
    async fn insert(&self, doc: &T) -> Result<(), AppError> {
        debug!(id = %doc.id(), "Inserting document in database");

        sqlx::query(&format!(
            "INSERT INTO {} (id, doc, created_at) VALUES ($1, $2, $3)",
            T::COLLECTION
        ))
        .bind(doc.id())
        .bind(Json(doc))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, id = %doc.id(), "Failed to insert document");
            write_error::<T>(e)
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        let row = sqlx::query(&format!("SELECT doc FROM {} WHERE id = $1", T::COLLECTION))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, id = %id, "Failed to fetch document");
                AppError::DatabaseError(e.to_string())
            })?;

        row.as_ref().map(decode_doc::<T>).transpose()
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn list(&self) -> Result<Vec<T>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT doc FROM {} ORDER BY created_at, id",
            T::COLLECTION
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list documents");
            AppError::DatabaseError(e.to_string())
        })?;

        rows.iter().map(decode_doc::<T>).collect()
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_one_by(&self, field: &str, value: &str) -> Result<Option<T>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT doc FROM {} WHERE doc->>$1 = $2 ORDER BY created_at LIMIT 1",
            T::COLLECTION
        ))
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, field = %field, "Failed to query documents by field");
            AppError::DatabaseError(e.to_string())
        })?;

        row.as_ref().map(decode_doc::<T>).transpose()
    }

    #[instrument(skip(self, doc), fields(collection = T::COLLECTION))]
    async fn replace(&self, doc: &T) -> Result<(), AppError> {
        let result = sqlx::query(&format!("UPDATE {} SET doc = $2 WHERE id = $1", T::COLLECTION))
            .bind(doc.id())
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, id = %doc.id(), "Failed to replace document");
                write_error::<T>(e)
            })?;

        if result.rows_affected() == 0 {
            warn!(id = %doc.id(), "Document not found for replace");
            return Err(AppError::NotFound("Document not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::COLLECTION))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, id = %id, "Failed to delete document");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(id = %id, "Document not found for deletion");
            return Err(AppError::NotFound("Document not found".to_string()));
        }
        Ok(())
    }
}

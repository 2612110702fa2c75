//! Document persistence behind a single generic repository trait.
//!
//! Every resource is stored as a JSON document keyed by a string id. The
//! in-memory backend is used for development and tests; the PostgreSQL backend
//! keeps one JSONB table per collection.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::shared::AppError;

pub use memory::InMemoryDocumentRepository;
pub use postgres::PostgresDocumentRepository;

mod memory;
mod postgres;

/// A record that can be stored in a collection
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (table) name
    const COLLECTION: &'static str;

    /// Top-level string fields no two documents may share
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;
}

/// Trait for document repository operations
#[async_trait]
pub trait DocumentRepository<T: Document>: Send + Sync {
    /// Stores a new document. Fails with `Conflict` when it shares a value
    /// of one of `T::UNIQUE_FIELDS` with a stored document.
    async fn insert(&self, doc: &T) -> Result<(), AppError>;
    async fn get(&self, id: &str) -> Result<Option<T>, AppError>;

    /// Returns every document in insertion order
    async fn list(&self) -> Result<Vec<T>, AppError>;

    /// Finds the first document whose top-level string `field` equals `value`
    async fn find_one_by(&self, field: &str, value: &str) -> Result<Option<T>, AppError>;

    /// Overwrites the document with the same id, enforcing `T::UNIQUE_FIELDS`
    /// against every other document
    async fn replace(&self, doc: &T) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Generates a new document id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Fetches a document by id or fails with "<label> not found"
pub async fn find_or_not_found<T: Document>(
    repository: &dyn DocumentRepository<T>,
    id: &str,
    label: &str,
) -> Result<T, AppError> {
    repository
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{label} not found")))
}

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{Document, DocumentRepository};
use crate::shared::AppError;

/// In-memory implementation of DocumentRepository for development and testing
///
/// Data lives only as long as the process does.
pub struct InMemoryDocumentRepository<T> {
    docs: RwLock<Vec<T>>,
}

impl<T: Document> Default for InMemoryDocumentRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> InMemoryDocumentRepository<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Creates a repository pre-populated with documents
    pub fn with_documents(docs: Vec<T>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }
}

fn to_json<T: Document>(doc: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(doc).map_err(|e| AppError::DatabaseError(e.to_string()))
}

fn field_matches<T: Document>(doc: &T, field: &str, value: &str) -> Result<bool, AppError> {
    Ok(to_json(doc)?.get(field).and_then(|v| v.as_str()) == Some(value))
}

/// First unique field whose value `doc` shares with another stored document.
/// Callers hold the write guard so check and write happen together.
fn unique_conflict<T: Document>(docs: &[T], doc: &T) -> Result<Option<&'static str>, AppError> {
    if T::UNIQUE_FIELDS.is_empty() {
        return Ok(None);
    }

    let json = to_json(doc)?;
    for field in T::UNIQUE_FIELDS {
        let Some(value) = json.get(*field).and_then(|v| v.as_str()) else {
            continue;
        };
        for other in docs.iter().filter(|d| d.id() != doc.id()) {
            if field_matches(other, field, value)? {
                return Ok(Some(*field));
            }
        }
    }
    Ok(None)
}

fn conflict(field: &str) -> AppError {
    warn!(field = %field, "Unique field already in use in memory");
    AppError::Conflict(format!("{field} already in use"))
}

#[async_trait]
impl<T: Document> DocumentRepository<T> for InMemoryDocumentRepository<T> {
    #[instrument(skip(self, doc), fields(collection = T::COLLECTION))]
    async fn insert(&self, doc: &T) -> Result<(), AppError> {
        debug!(id = %doc.id(), "Inserting document in memory");

        let mut docs = self.docs.write().await;
        if docs.iter().any(|d| d.id() == doc.id()) {
            warn!(id = %doc.id(), "Document already exists in memory");
            return Err(AppError::DatabaseError(format!(
                "Document {} already exists in {}",
                doc.id(),
                T::COLLECTION
            )));
        }
        if let Some(field) = unique_conflict(&docs, doc)? {
            return Err(conflict(field));
        }
        docs.push(doc.clone());
        Ok(())
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        let docs = self.docs.read().await;
        let doc = docs.iter().find(|d| d.id() == id).cloned();
        debug!(found = doc.is_some(), "Fetched document from memory");
        Ok(doc)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn list(&self) -> Result<Vec<T>, AppError> {
        Ok(self.docs.read().await.clone())
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn find_one_by(&self, field: &str, value: &str) -> Result<Option<T>, AppError> {
        let docs = self.docs.read().await;
        for doc in docs.iter() {
            if field_matches(doc, field, value)? {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    #[instrument(skip(self, doc), fields(collection = T::COLLECTION))]
    async fn replace(&self, doc: &T) -> Result<(), AppError> {
        let mut docs = self.docs.write().await;
        if let Some(field) = unique_conflict(&docs, doc)? {
            return Err(conflict(field));
        }
        match docs.iter_mut().find(|d| d.id() == doc.id()) {
            Some(existing) => {
                *existing = doc.clone();
                debug!(id = %doc.id(), "Document replaced in memory");
                Ok(())
            }
            None => {
                warn!(id = %doc.id(), "Document not found for replace in memory");
                Err(AppError::NotFound("Document not found".to_string()))
            }
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| d.id() != id);

        if docs.len() == before {
            warn!(id = %id, "Document not found for deletion in memory");
            return Err(AppError::NotFound("Document not found".to_string()));
        }
        Ok(())
    }
}

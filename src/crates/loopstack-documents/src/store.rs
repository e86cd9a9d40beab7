//! Document storage.
//!
//! [`DocumentStore`] is the async persistence seam behind the
//! `createDocument` tool. Implementations can use any backend; the bundled
//! [`InMemoryDocumentStore`] is a thread-safe map suitable for development
//! and testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Error type for document store operations
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for document store operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document id.
    pub id: Uuid,

    /// Document type, from the transition's document binding.
    #[serde(rename = "type")]
    pub doc_type: String,

    /// Arbitrary JSON content.
    pub content: Value,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a document with a fresh id and the current timestamp.
    pub fn new(doc_type: impl Into<String>, content: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            doc_type: doc_type.into(),
            content,
            created_at: Utc::now(),
        }
    }
}

/// Store trait for documents
///
/// Implementations can use any backend: in-memory, database, object store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning its id
    async fn insert(&self, document: Document) -> Result<Uuid>;

    /// Get a document by id, or None if not found
    async fn get(&self, id: Uuid) -> Result<Option<Document>>;

    /// List all documents in insertion order
    async fn list(&self) -> Result<Vec<Document>>;

    /// Number of stored documents
    async fn count(&self) -> Result<usize>;
}

#[derive(Default)]
struct Inner {
    documents: HashMap<Uuid, Document>,
    // Insertion order, so list() is deterministic.
    order: Vec<Uuid>,
}

/// In-memory implementation of [`DocumentStore`]
///
/// Thread-safe and cheap to clone; clones share the same underlying map.
/// For production use, implement [`DocumentStore`] with a persistent
/// backend.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().documents.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, document: Document) -> Result<Uuid> {
        let id = document.id;
        let mut inner = self.inner.write().unwrap();
        if inner.documents.insert(id, document).is_none() {
            inner.order.push(id);
        }
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.documents.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.documents.get(id).cloned())
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        let inner = self.inner.read().unwrap();
        Ok(inner.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryDocumentStore::new();

        let document = Document::new("note", json!({ "text": "hello" }));
        let id = store.insert(document.clone()).await.unwrap();

        let found = store.get(id).await.unwrap();
        assert_eq!(found, Some(document));
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let store = InMemoryDocumentStore::new();
        let found = store.get(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = InMemoryDocumentStore::new();

        let first = store
            .insert(Document::new("note", json!({ "n": 1 })))
            .await
            .unwrap();
        let second = store
            .insert(Document::new("note", json!({ "n": 2 })))
            .await
            .unwrap();
        let third = store
            .insert(Document::new("note", json!({ "n": 3 })))
            .await
            .unwrap();

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![first, second, third]);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let store = InMemoryDocumentStore::new();
        let clone = store.clone();

        clone
            .insert(Document::new("note", json!({})))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn document_serializes_type_field() {
        let document = Document::new("aiMessageDocument", json!({ "role": "assistant" }));
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["type"], "aiMessageDocument");
        assert!(value["id"].is_string());
        assert!(value["created_at"].is_string());
    }
}

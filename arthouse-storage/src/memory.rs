//! In-memory document store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use arthouse_core::{Stage, StoreError, StoreResult};
use tokio::sync::RwLock;

use crate::document::{document_id, Document, DocumentStore};
use crate::engine::{evaluate, CollectionSource};

#[derive(Debug, Default)]
struct Collections {
    docs: HashMap<String, Vec<Document>>,
    text_indexes: HashMap<String, Vec<String>>,
}

impl CollectionSource for Collections {
    fn load(&self, collection: &str) -> StoreResult<Vec<Document>> {
        Ok(self.docs.get(collection).cloned().unwrap_or_default())
    }

    fn text_fields(&self, collection: &str) -> Option<&[String]> {
        self.text_indexes.get(collection).map(Vec::as_slice)
    }
}

/// Document store backed by process memory. Documents keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.inner
            .read()
            .await
            .docs
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn aggregate(&self, collection: &str, pipeline: &[Stage]) -> StoreResult<Vec<Document>> {
        let state = self.inner.read().await;
        let docs = state.load(collection)?;
        evaluate(&*state, collection, docs, pipeline)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> StoreResult<usize> {
        let mut state = self.inner.write().await;
        let existing = state.docs.entry(collection.to_string()).or_default();

        let mut seen: HashSet<String> = HashSet::with_capacity(existing.len() + documents.len());
        for doc in existing.iter() {
            seen.insert(document_id(collection, doc)?.to_string());
        }
        for doc in &documents {
            let id = document_id(collection, doc)?;
            if !seen.insert(id.to_string()) {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
        }

        let inserted = documents.len();
        existing.extend(documents);
        Ok(inserted)
    }

    async fn create_text_index(&self, collection: &str, fields: &[&str]) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        state.text_indexes.insert(
            collection.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

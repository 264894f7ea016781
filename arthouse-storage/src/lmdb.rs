//! LMDB-backed document store.
//!
//! Uses heed to keep each collection in its own named database. Keys are the
//! document `_id`, values the JSON-encoded document. Text index definitions
//! live in a reserved database so they survive restarts.
//!
//! # Ordering
//!
//! LMDB iterates in key order. Object ids lead with a timestamp, so natural
//! order is creation order for ids minted by this process.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use arthouse_core::{Stage, StoreError, StoreResult};
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions, RoTxn};

use crate::document::{document_id, Document, DocumentStore};
use crate::engine::{evaluate, CollectionSource};

/// Reserved database holding text index definitions.
const INDEX_DB: &str = "__text_indexes";

/// Upper bound on named databases (collections plus the index database).
const MAX_DBS: u32 = 16;

/// Why the document store could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStoreError {
    #[error("store environment: {0}")]
    Environment(heed::Error),

    #[error("index database: {0}")]
    IndexDatabase(heed::Error),

    #[error("store directory: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbStoreError> for StoreError {
    fn from(e: LmdbStoreError) -> Self {
        StoreError::unavailable(e)
    }
}

fn txn_error(e: heed::Error) -> StoreError {
    StoreError::unavailable(format!("lmdb: {}", e))
}

/// Document store persisted in an LMDB environment.
pub struct LmdbDocumentStore {
    env: Env,
    indexes: Database<Str, Bytes>,
}

impl LmdbDocumentStore {
    /// Open (or create) a store rooted at `dir`; `map_size_mb` bounds the
    /// LMDB map.
    pub fn open<P: AsRef<Path>>(dir: P, map_size_mb: usize) -> Result<Self, LmdbStoreError> {
        std::fs::create_dir_all(dir.as_ref())?;

        // SAFETY: one environment per directory within this process, and the
        // files are not mapped by anything else.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size_mb << 20)
                .max_dbs(MAX_DBS)
                .open(dir.as_ref())
        }
        .map_err(LmdbStoreError::Environment)?;

        let mut wtxn = env.write_txn().map_err(LmdbStoreError::Environment)?;
        let indexes = env
            .create_database::<Str, Bytes>(&mut wtxn, Some(INDEX_DB))
            .map_err(LmdbStoreError::IndexDatabase)?;
        wtxn.commit().map_err(LmdbStoreError::IndexDatabase)?;

        Ok(Self { env, indexes })
    }

    fn load_indexes(&self, rtxn: &RoTxn<'_>) -> StoreResult<HashMap<String, Vec<String>>> {
        let mut indexes = HashMap::new();
        for entry in self.indexes.iter(rtxn).map_err(txn_error)? {
            let (collection, raw) = entry.map_err(txn_error)?;
            let fields: Vec<String> = serde_json::from_slice(raw)
                .map_err(|e| StoreError::decode(INDEX_DB, e))?;
            indexes.insert(collection.to_string(), fields);
        }
        Ok(indexes)
    }

    fn aggregate_sync(&self, collection: &str, pipeline: &[Stage]) -> StoreResult<Vec<Document>> {
        let rtxn = self.env.read_txn().map_err(txn_error)?;
        let source = LmdbSource {
            env: &self.env,
            rtxn: &rtxn,
            text_indexes: self.load_indexes(&rtxn)?,
        };
        let docs = source.load(collection)?;
        evaluate(&source, collection, docs, pipeline)
    }

    fn insert_many_sync(&self, collection: &str, documents: Vec<Document>) -> StoreResult<usize> {
        let mut wtxn = self.env.write_txn().map_err(txn_error)?;
        let db: Database<Str, Bytes> = self
            .env
            .create_database(&mut wtxn, Some(collection))
            .map_err(txn_error)?;

        for doc in &documents {
            let id = document_id(collection, doc)?;
            if db.get(&wtxn, id).map_err(txn_error)?.is_some() {
                // Dropping the transaction aborts the whole batch.
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
            let bytes = serde_json::to_vec(doc).map_err(|e| StoreError::decode(collection, e))?;
            db.put(&mut wtxn, id, &bytes).map_err(txn_error)?;
        }

        wtxn.commit().map_err(txn_error)?;
        Ok(documents.len())
    }

    fn create_text_index_sync(&self, collection: &str, fields: &[&str]) -> StoreResult<()> {
        let bytes = serde_json::to_vec(fields).map_err(|e| StoreError::decode(INDEX_DB, e))?;
        let mut wtxn = self.env.write_txn().map_err(txn_error)?;
        self.indexes
            .put(&mut wtxn, collection, &bytes)
            .map_err(txn_error)?;
        wtxn.commit().map_err(txn_error)
    }
}

struct LmdbSource<'a, 'e> {
    env: &'e Env,
    rtxn: &'a RoTxn<'e>,
    text_indexes: HashMap<String, Vec<String>>,
}

impl CollectionSource for LmdbSource<'_, '_> {
    fn load(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let db: Option<Database<Str, Bytes>> = self
            .env
            .open_database(self.rtxn, Some(collection))
            .map_err(txn_error)?;
        let Some(db) = db else {
            return Ok(Vec::new());
        };

        let mut docs = Vec::new();
        for entry in db.iter(self.rtxn).map_err(txn_error)? {
            let (_, raw) = entry.map_err(txn_error)?;
            let doc: Document =
                serde_json::from_slice(raw).map_err(|e| StoreError::decode(collection, e))?;
            docs.push(doc);
        }
        Ok(docs)
    }

    fn text_fields(&self, collection: &str) -> Option<&[String]> {
        self.text_indexes.get(collection).map(Vec::as_slice)
    }
}

#[async_trait]
impl DocumentStore for LmdbDocumentStore {
    async fn aggregate(&self, collection: &str, pipeline: &[Stage]) -> StoreResult<Vec<Document>> {
        self.aggregate_sync(collection, pipeline)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> StoreResult<usize> {
        self.insert_many_sync(collection, documents)
    }

    async fn create_text_index(&self, collection: &str, fields: &[&str]) -> StoreResult<()> {
        self.create_text_index_sync(collection, fields)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.env.read_txn().map(drop).map_err(txn_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arthouse_core::{Filter, FindOptions, SortDirection, SortSpec};
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn create_test_store() -> (LmdbDocumentStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = LmdbDocumentStore::open(dir.path(), 10).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_insert_and_sorted_find() {
        let (store, _dir) = create_test_store();
        store
            .insert_many(
                "artworks",
                vec![
                    doc(json!({"_id": "b", "year": 1500})),
                    doc(json!({"_id": "a", "year": 1900})),
                ],
            )
            .await
            .unwrap();

        let options = FindOptions {
            sort: Some(SortSpec::new().with("year", SortDirection::Ascending)),
            ..FindOptions::default()
        };
        let found = store.find("artworks", &Filter::All, &options).await.unwrap();
        assert_eq!(found[0]["_id"], json!("b"));
        assert_eq!(found[1]["_id"], json!("a"));
    }

    #[tokio::test]
    async fn test_duplicate_aborts_batch() {
        let (store, _dir) = create_test_store();
        let err = store
            .insert_many(
                "artists",
                vec![doc(json!({"_id": "x"})), doc(json!({"_id": "x"}))],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        let all = store.aggregate("artists", &[]).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_text_index_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = LmdbDocumentStore::open(dir.path(), 10).unwrap();
            store
                .create_text_index("artworks", &["title"])
                .await
                .unwrap();
            store
                .insert_many("artworks", vec![doc(json!({"_id": "w", "title": "The Kiss"}))])
                .await
                .unwrap();
        }
        let store = LmdbDocumentStore::open(dir.path(), 10).unwrap();
        let found = store
            .aggregate("artworks", &[Stage::Match(Filter::text("kiss"))])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.ping().await.is_ok());
    }
}

//! Document store abstraction.
//!
//! A `DocumentStore` holds named collections of JSON documents keyed by their
//! `_id` string and evaluates typed pipelines against them. Entity stores are
//! written against this trait only.

use async_trait::async_trait;
use arthouse_core::{Filter, FindOptions, Stage, StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use crate::engine::Document;

/// Primary key field of every document.
pub const ID_FIELD: &str = "_id";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a pipeline against `collection`.
    async fn aggregate(&self, collection: &str, pipeline: &[Stage]) -> StoreResult<Vec<Document>>;

    /// Plain find: `filter`, then sort, skip and limit from `options`.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let mut pipeline = Vec::with_capacity(4);
        if !filter.is_all() {
            pipeline.push(Stage::Match(filter.clone()));
        }
        pipeline.extend(options.clone().into_stages());
        self.aggregate(collection, &pipeline).await
    }

    /// Insert every document or none. Fails with `DuplicateKey` if an `_id`
    /// already exists or repeats within the batch.
    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> StoreResult<usize>;

    /// Declare the fields searched by text matches on `collection`.
    async fn create_text_index(&self, collection: &str, fields: &[&str]) -> StoreResult<()>;

    /// Cheap liveness check.
    async fn ping(&self) -> StoreResult<()>;
}

/// Serialize a record into a document.
pub fn encode<T: Serialize>(collection: &str, record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record) {
        Ok(Value::Object(doc)) => Ok(doc),
        Ok(other) => Err(StoreError::decode(
            collection,
            format!("expected an object, got {}", other),
        )),
        Err(e) => Err(StoreError::decode(collection, e)),
    }
}

/// Deserialize a document into a record.
pub fn decode<T: DeserializeOwned>(collection: &str, doc: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| StoreError::decode(collection, e))
}

/// The `_id` of a document, which must be a string.
pub fn document_id<'a>(collection: &str, doc: &'a Document) -> StoreResult<&'a str> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::query(collection, "document is missing a string _id"))
}

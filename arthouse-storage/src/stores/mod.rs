//! Entity stores.
//!
//! Each store turns a query specification (or an id) into a pipeline over its
//! collection, resolves references with lookup stages, decodes the result and
//! sorts every embedded image list before returning it.

mod artist;
mod artwork;
mod exhibition;

pub use artist::ArtistStore;
pub use artwork::ArtworkStore;
pub use exhibition::ExhibitionStore;

use std::sync::Arc;

use arthouse_core::{EntityKind, Filter, ObjectId, Stage, StoreError, StoreResult};
use serde::Serialize;

use crate::document::{encode, Document, DocumentStore, ID_FIELD};

pub const ARTISTS: &str = EntityKind::Artist.collection();
pub const ARTWORKS: &str = EntityKind::Artwork.collection();
pub const EXHIBITIONS: &str = EntityKind::Exhibition.collection();

/// Fields covered by the artwork text index.
pub const ARTWORK_TEXT_FIELDS: &[&str] = &["title", "description"];

/// `[match _id, limit 1]`.
fn by_id(id: ObjectId) -> Vec<Stage> {
    vec![
        Stage::Match(Filter::eq(ID_FIELD, id.to_hex())),
        Stage::Limit(1),
    ]
}

/// Inner join of an artwork's `artist` id to the artist record.
fn artist_join() -> [Stage; 2] {
    [
        Stage::lookup(ARTISTS, "artist", ID_FIELD, "artist"),
        Stage::unwind("artist"),
    ]
}

/// Take the single document a by-id pipeline produced, or `NotFound`.
fn single(docs: Vec<Document>, entity: EntityKind, id: &str) -> StoreResult<Document> {
    docs.into_iter()
        .next()
        .ok_or_else(|| StoreError::not_found(entity, id))
}

/// Remove an array field from a document, failing on anything else.
fn take_array(doc: &mut Document, collection: &str, field: &str) -> StoreResult<Vec<Document>> {
    match doc.remove(field) {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(map) => Ok(map),
                other => Err(StoreError::decode(
                    collection,
                    format!("expected object in {}, got {}", field, other),
                )),
            })
            .collect(),
        Some(other) => Err(StoreError::decode(
            collection,
            format!("expected array in {}, got {}", field, other),
        )),
        None => Ok(Vec::new()),
    }
}

async fn insert_documents<T: Serialize>(
    db: &Arc<dyn DocumentStore>,
    collection: &str,
    records: &[T],
) -> StoreResult<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    let docs = records
        .iter()
        .map(|record| encode(collection, record))
        .collect::<StoreResult<Vec<_>>>()?;
    let inserted = db.insert_many(collection, docs).await?;
    tracing::info!(collection, inserted, "Inserted documents");
    Ok(inserted)
}

use std::sync::Arc;

use arthouse_core::{
    Artist, Artwork, EntityKind, Exhibition, ExhibitionDocument, ObjectId, QuerySpec, Stage,
    StoreResult,
};

use super::artwork::decode_artwork;
use super::{
    artist_join, by_id, insert_documents, single, take_array, ARTISTS, ARTWORKS, EXHIBITIONS,
};
use crate::document::{decode, Document, DocumentStore, ID_FIELD};

/// Reads exhibitions and resolves their artist and artwork reference arrays.
#[derive(Clone)]
pub struct ExhibitionStore {
    db: Arc<dyn DocumentStore>,
}

impl ExhibitionStore {
    pub fn new(db: Arc<dyn DocumentStore>) -> Self {
        Self { db }
    }

    /// Detail view. Member references are not resolved.
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Exhibition> {
        let object_id = ObjectId::parse(id)?;
        let docs = self.db.aggregate(EXHIBITIONS, &by_id(object_id)).await?;
        let doc = single(docs, EntityKind::Exhibition, id)?;
        decode_exhibition(doc)
    }

    pub async fn find_many(&self, spec: &dyn QuerySpec) -> StoreResult<Vec<Exhibition>> {
        let docs = self
            .db
            .find(EXHIBITIONS, &spec.filter(), &spec.find_options())
            .await?;
        docs.into_iter().map(decode_exhibition).collect()
    }

    /// Artworks listed by the exhibition, paged by `spec` within that set.
    /// Artworks without a resolvable artist are dropped.
    pub async fn find_artworks(
        &self,
        exhibition_id: &str,
        spec: &dyn QuerySpec,
    ) -> StoreResult<Vec<Artwork>> {
        let mut members = spec.pipeline();
        members.extend(artist_join());

        let related = self
            .resolve_members(exhibition_id, ARTWORKS, "artworks", members)
            .await?;
        related.into_iter().map(decode_artwork).collect()
    }

    /// Artists listed by the exhibition, paged by `spec` within that set.
    pub async fn find_artists(
        &self,
        exhibition_id: &str,
        spec: &dyn QuerySpec,
    ) -> StoreResult<Vec<Artist>> {
        let related = self
            .resolve_members(exhibition_id, ARTISTS, "artists", spec.pipeline())
            .await?;
        related
            .into_iter()
            .map(|doc| {
                let mut artist: Artist = decode(ARTISTS, doc)?;
                artist.sort_images();
                Ok(artist)
            })
            .collect()
    }

    /// `[match _id, limit 1, lookup {from, field → _id, pipeline}]`: the lookup
    /// restricts `from` to the ids in the exhibition's `field` array before
    /// `pipeline` runs.
    async fn resolve_members(
        &self,
        exhibition_id: &str,
        from: &str,
        field: &str,
        pipeline: Vec<Stage>,
    ) -> StoreResult<Vec<Document>> {
        let object_id = ObjectId::parse(exhibition_id)?;
        let mut stages = by_id(object_id);
        stages.push(Stage::Lookup {
            from: from.to_string(),
            local_field: field.to_string(),
            foreign_field: ID_FIELD.to_string(),
            pipeline,
            as_field: field.to_string(),
        });

        let docs = self.db.aggregate(EXHIBITIONS, &stages).await?;
        let mut doc = single(docs, EntityKind::Exhibition, exhibition_id)?;
        take_array(&mut doc, EXHIBITIONS, field)
    }

    /// Bulk load from materialized records; members are stored by id.
    pub async fn insert_many(&self, exhibitions: Vec<Exhibition>) -> StoreResult<usize> {
        let docs = exhibitions
            .iter()
            .map(Exhibition::to_document)
            .collect();
        self.insert_documents(docs).await
    }

    /// Bulk load from persisted documents.
    pub async fn insert_documents(&self, docs: Vec<ExhibitionDocument>) -> StoreResult<usize> {
        let docs: Vec<ExhibitionDocument> = docs
            .into_iter()
            .map(|mut doc| {
                arthouse_core::Image::sort_slice(&mut doc.images);
                doc
            })
            .collect();
        insert_documents(&self.db, EXHIBITIONS, &docs).await
    }
}

fn decode_exhibition(doc: Document) -> StoreResult<Exhibition> {
    let mut exhibition = decode::<ExhibitionDocument>(EXHIBITIONS, doc)?.into_exhibition();
    exhibition.sort_images();
    Ok(exhibition)
}

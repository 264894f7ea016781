use std::sync::Arc;

use arthouse_core::{
    Artist, Artwork, ArtworkDocument, EntityKind, ObjectId, QuerySpec, Stage, StoreResult,
};

use super::{by_id, insert_documents, single, take_array, ARTISTS, ARTWORKS};
use crate::document::{decode, DocumentStore, ID_FIELD};

#[derive(Clone)]
pub struct ArtistStore {
    db: Arc<dyn DocumentStore>,
}

impl ArtistStore {
    pub fn new(db: Arc<dyn DocumentStore>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Artist> {
        let object_id = ObjectId::parse(id)?;
        let docs = self.db.aggregate(ARTISTS, &by_id(object_id)).await?;
        let doc = single(docs, EntityKind::Artist, id)?;

        let mut artist: Artist = decode(ARTISTS, doc)?;
        artist.sort_images();
        Ok(artist)
    }

    pub async fn find_many(&self, spec: &dyn QuerySpec) -> StoreResult<Vec<Artist>> {
        let docs = self
            .db
            .find(ARTISTS, &spec.filter(), &spec.find_options())
            .await?;
        docs.into_iter()
            .map(|doc| {
                let mut artist: Artist = decode(ARTISTS, doc)?;
                artist.sort_images();
                Ok(artist)
            })
            .collect()
    }

    /// Artworks owned by the artist, paged by `spec`. Each artwork embeds the
    /// artist. Fails with `NotFound` if the artist does not exist.
    pub async fn find_artworks(
        &self,
        artist_id: &str,
        spec: &dyn QuerySpec,
    ) -> StoreResult<Vec<Artwork>> {
        let object_id = ObjectId::parse(artist_id)?;
        let mut pipeline = by_id(object_id);
        pipeline.push(Stage::Lookup {
            from: ARTWORKS.to_string(),
            local_field: ID_FIELD.to_string(),
            foreign_field: "artist".to_string(),
            pipeline: spec.pipeline(),
            as_field: "artworks".to_string(),
        });

        let docs = self.db.aggregate(ARTISTS, &pipeline).await?;
        let mut doc = single(docs, EntityKind::Artist, artist_id)?;
        let related = take_array(&mut doc, ARTISTS, "artworks")?;

        let mut artist: Artist = decode(ARTISTS, doc)?;
        artist.sort_images();

        related
            .into_iter()
            .map(|doc| {
                let mut artwork = decode::<ArtworkDocument>(ARTWORKS, doc)?
                    .into_artwork(artist.clone());
                artwork.sort_images();
                Ok(artwork)
            })
            .collect()
    }

    pub async fn insert_many(&self, artists: Vec<Artist>) -> StoreResult<usize> {
        let artists: Vec<Artist> = artists
            .into_iter()
            .map(|mut artist| {
                artist.sort_images();
                artist
            })
            .collect();
        insert_documents(&self.db, ARTISTS, &artists).await
    }
}

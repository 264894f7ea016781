use std::sync::Arc;

use arthouse_core::{
    Artwork, ArtworkDocument, EntityKind, ObjectId, QuerySpec, StoreResult,
};

use super::{artist_join, by_id, insert_documents, single, ARTWORKS, ARTWORK_TEXT_FIELDS};
use crate::document::{decode, Document, DocumentStore};

/// Reads artworks with their owning artist joined in.
#[derive(Clone)]
pub struct ArtworkStore {
    db: Arc<dyn DocumentStore>,
}

impl ArtworkStore {
    pub fn new(db: Arc<dyn DocumentStore>) -> Self {
        Self { db }
    }

    /// Declare the text index used by `search`.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        self.db
            .create_text_index(ARTWORKS, ARTWORK_TEXT_FIELDS)
            .await
    }

    /// Fetch one artwork. An artwork whose artist cannot be resolved is
    /// reported as `NotFound`.
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Artwork> {
        let object_id = ObjectId::parse(id)?;
        let mut pipeline = by_id(object_id);
        pipeline.extend(artist_join());

        let docs = self.db.aggregate(ARTWORKS, &pipeline).await?;
        let doc = single(docs, EntityKind::Artwork, id)?;
        decode_artwork(doc)
    }

    /// Run `spec` over the collection, then join artists. Rows without a
    /// resolvable artist are dropped, so a page may come back short.
    pub async fn find_many(&self, spec: &dyn QuerySpec) -> StoreResult<Vec<Artwork>> {
        let mut pipeline = spec.pipeline();
        pipeline.extend(artist_join());

        let docs = self.db.aggregate(ARTWORKS, &pipeline).await?;
        docs.into_iter().map(decode_artwork).collect()
    }

    /// Bulk load. Only the artist id of each artwork is stored.
    pub async fn insert_many(&self, artworks: Vec<Artwork>) -> StoreResult<usize> {
        let docs: Vec<ArtworkDocument> = artworks
            .into_iter()
            .map(|mut artwork| {
                artwork.sort_images();
                artwork.to_document()
            })
            .collect();
        insert_documents(&self.db, ARTWORKS, &docs).await
    }
}

/// Decode a joined artwork and sort its image lists.
pub(super) fn decode_artwork(doc: Document) -> StoreResult<Artwork> {
    let mut artwork: Artwork = decode(ARTWORKS, doc)?;
    artwork.sort_images();
    Ok(artwork)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocumentStore;
    use crate::stores::ArtistStore;
    use arthouse_core::{Artist, ArtworkQuery, Image, LimitConfig, QueryParams, StoreError};

    fn artist(name: &str) -> Artist {
        Artist {
            id: ObjectId::new(),
            name: name.into(),
            images: vec![],
        }
    }

    fn artwork(title: &str, year: i64, artist: &Artist) -> Artwork {
        Artwork {
            id: ObjectId::new(),
            title: title.into(),
            images: vec![
                Image::new("large").with_size(1200.0, 800.0),
                Image::new("unsized"),
                Image::new("small").with_size(200.0, 150.0),
            ],
            year,
            description: String::new(),
            artist: artist.clone(),
        }
    }

    async fn setup() -> (ArtworkStore, Artist, Vec<Artwork>) {
        let db: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let artists = ArtistStore::new(db.clone());
        let artworks = ArtworkStore::new(db);

        let klimt = artist("Klimt");
        artists.insert_many(vec![klimt.clone()]).await.unwrap();

        let ghost = artist("Nobody");
        let rows = vec![
            artwork("The Kiss", 1908, &klimt),
            artwork("Lost", 1900, &ghost),
        ];
        artworks.insert_many(rows.clone()).await.unwrap();
        artworks.ensure_indexes().await.unwrap();
        (artworks, klimt, rows)
    }

    #[tokio::test]
    async fn test_find_by_id_joins_artist_and_sorts_images() {
        let (store, klimt, rows) = setup().await;
        let found = store.find_by_id(&rows[0].id.to_hex()).await.unwrap();
        assert_eq!(found.artist, klimt);
        let urls: Vec<_> = found.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["small", "large", "unsized"]);
    }

    #[tokio::test]
    async fn test_find_by_id_with_missing_artist_is_not_found() {
        let (store, _, rows) = setup().await;
        let err = store.find_by_id(&rows[1].id.to_hex()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_by_id_rejects_malformed_id() {
        let (store, _, _) = setup().await;
        let err = store.find_by_id("not-an-id").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentifier { .. }));
    }

    #[tokio::test]
    async fn test_find_many_drops_unresolvable_rows() {
        let (store, _, rows) = setup().await;
        let spec = ArtworkQuery::new(LimitConfig::default());
        let found = store.find_many(&spec).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, rows[0].id);
    }

    #[tokio::test]
    async fn test_find_many_search_and_empty_result() {
        let (store, _, _) = setup().await;
        let spec = ArtworkQuery::from_params(
            &QueryParams::parse("search=kiss"),
            LimitConfig::default(),
        );
        assert_eq!(store.find_many(&spec).await.unwrap().len(), 1);

        let spec = ArtworkQuery::from_params(
            &QueryParams::parse("search=sunflowers"),
            LimitConfig::default(),
        );
        assert!(store.find_many(&spec).await.unwrap().is_empty());
    }
}

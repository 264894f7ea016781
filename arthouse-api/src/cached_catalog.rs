//! Cached Catalog Client
//!
//! `CachedCatalog` is what route handlers talk to. Each operation derives a
//! cache key from the entity kind, the path id and the raw query string,
//! builds the matching query specification and runs the entity store behind
//! [`ReadThroughCache::get_or_fetch`].

use std::future::Future;
use std::sync::Arc;

use arthouse_core::{
    Artist, ArtistQuery, Artwork, ArtworkQuery, CatalogLimits, EntityKind, Exhibition,
    ExhibitionQuery, ObjectId, QueryParams, StoreResult,
};
use arthouse_storage::{
    ArtistStore, ArtworkStore, CacheKey, CacheProvider, DocumentStore, ExhibitionStore,
    ReadThroughCache,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiResult;

/// Cache implementation used by the API.
pub type ApiCache = ReadThroughCache<CacheProvider>;

/// Entity stores fronted by the response cache.
#[derive(Clone)]
pub struct CachedCatalog {
    artists: ArtistStore,
    artworks: ArtworkStore,
    exhibitions: ExhibitionStore,
    cache: Arc<ApiCache>,
    limits: CatalogLimits,
}

impl CachedCatalog {
    pub fn new(db: Arc<dyn DocumentStore>, cache: Arc<ApiCache>, limits: CatalogLimits) -> Self {
        Self {
            artists: ArtistStore::new(db.clone()),
            artworks: ArtworkStore::new(db.clone()),
            exhibitions: ExhibitionStore::new(db),
            cache,
            limits,
        }
    }

    pub fn cache(&self) -> &Arc<ApiCache> {
        &self.cache
    }

    // ========================================================================
    // ARTISTS
    // ========================================================================

    pub async fn list_artists(&self, raw_query: &str) -> ApiResult<Vec<Artist>> {
        let spec = ArtistQuery::from_params(&QueryParams::parse(raw_query), self.limits.artist);
        self.cached(CacheKey::list(EntityKind::Artist, raw_query), || {
            self.artists.find_many(&spec)
        })
        .await
    }

    pub async fn artist(&self, id: &str) -> ApiResult<Artist> {
        ObjectId::parse(id)?;
        self.cached(CacheKey::record(EntityKind::Artist, id), || {
            self.artists.find_by_id(id)
        })
        .await
    }

    pub async fn artist_artworks(&self, id: &str, raw_query: &str) -> ApiResult<Vec<Artwork>> {
        ObjectId::parse(id)?;
        let spec = ArtworkQuery::from_params(&QueryParams::parse(raw_query), self.limits.artwork);
        let key = CacheKey::related(EntityKind::Artist, id, EntityKind::Artwork, raw_query);
        self.cached(key, || self.artists.find_artworks(id, &spec))
            .await
    }

    // ========================================================================
    // ARTWORKS
    // ========================================================================

    pub async fn list_artworks(&self, raw_query: &str) -> ApiResult<Vec<Artwork>> {
        let spec = ArtworkQuery::from_params(&QueryParams::parse(raw_query), self.limits.artwork);
        self.cached(CacheKey::list(EntityKind::Artwork, raw_query), || {
            self.artworks.find_many(&spec)
        })
        .await
    }

    pub async fn artwork(&self, id: &str) -> ApiResult<Artwork> {
        ObjectId::parse(id)?;
        self.cached(CacheKey::record(EntityKind::Artwork, id), || {
            self.artworks.find_by_id(id)
        })
        .await
    }

    // ========================================================================
    // EXHIBITIONS
    // ========================================================================

    pub async fn list_exhibitions(&self, raw_query: &str) -> ApiResult<Vec<Exhibition>> {
        let spec = ExhibitionQuery::from_params(
            &QueryParams::parse(raw_query),
            self.limits.exhibition,
        );
        self.cached(CacheKey::list(EntityKind::Exhibition, raw_query), || {
            self.exhibitions.find_many(&spec)
        })
        .await
    }

    pub async fn exhibition(&self, id: &str) -> ApiResult<Exhibition> {
        ObjectId::parse(id)?;
        self.cached(CacheKey::record(EntityKind::Exhibition, id), || {
            self.exhibitions.find_by_id(id)
        })
        .await
    }

    pub async fn exhibition_artworks(&self, id: &str, raw_query: &str) -> ApiResult<Vec<Artwork>> {
        ObjectId::parse(id)?;
        let spec = ArtworkQuery::from_params(&QueryParams::parse(raw_query), self.limits.artwork);
        let key = CacheKey::related(EntityKind::Exhibition, id, EntityKind::Artwork, raw_query);
        self.cached(key, || self.exhibitions.find_artworks(id, &spec))
            .await
    }

    pub async fn exhibition_artists(&self, id: &str, raw_query: &str) -> ApiResult<Vec<Artist>> {
        ObjectId::parse(id)?;
        let spec = ArtistQuery::from_params(&QueryParams::parse(raw_query), self.limits.artist);
        let key = CacheKey::related(EntityKind::Exhibition, id, EntityKind::Artist, raw_query);
        self.cached(key, || self.exhibitions.find_artists(id, &spec))
            .await
    }

    async fn cached<T, F, Fut>(&self, key: CacheKey, fetch: F) -> ApiResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        Ok(self.cache.get_or_fetch(key, fetch).await?)
    }
}

//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use arthouse_core::StoreError;
use arthouse_storage::{ArtworkStore, CacheProvider, DocumentStore, ReadThroughCache};

use crate::cached_catalog::{ApiCache, CachedCatalog};
use crate::config::{AppConfig, ConfigError};
use crate::seed::{self, SeedError};

/// Anything that can stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to prepare store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Cached entity stores; every catalog read goes through here.
    pub catalog: CachedCatalog,
    /// Raw datastore handle, used by the health check.
    pub db: Arc<dyn DocumentStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(db: Arc<dyn DocumentStore>, cache: Arc<ApiCache>, config: &AppConfig) -> Self {
        Self {
            catalog: CachedCatalog::new(db.clone(), cache, config.limits),
            db,
            start_time: Instant::now(),
        }
    }

    /// Open the store, seed it if `SEED_DIR` is set, declare indexes and
    /// build the cache.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let db = config.store.connect()?;

        if let Some(dir) = &config.seed_dir {
            tracing::info!(dir = %dir.display(), "Seeding catalog");
            seed::seed_catalog(db.clone(), seed::load_dir(dir)?).await?;
        }
        ArtworkStore::new(db.clone()).ensure_indexes().await?;

        let provider = CacheProvider::from_config(&config.cache_backend).await;
        let cache = Arc::new(ReadThroughCache::new(
            Arc::new(provider),
            config.cache.clone(),
        ));

        Ok(Self::new(db, cache, config))
    }
}

crate::impl_from_ref!(
    CachedCatalog => catalog,
    Arc<dyn DocumentStore> => db,
    Instant => start_time,
);

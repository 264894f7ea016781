//! Redis cache backend (feature `redis`).
//!
//! Uses a `ConnectionManager`, which reconnects on its own after transport
//! failures. Values are stored with `SET key value EX ttl`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::key::CacheKey;
use super::provider::RedisConfig;
use super::traits::{CacheBackend, CacheError, CacheResult, CacheStats};

fn backend_error(e: redis::RedisError) -> CacheError {
    CacheError::Backend(format!("redis: {}", e))
}

pub struct RedisCacheBackend {
    manager: ConnectionManager,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RedisCacheBackend {
    /// Connect and verify the server answers.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        let client = redis::Client::open(config.url()).map_err(backend_error)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(backend_error)?;
        tracing::info!(addr = %config.addr, db = config.db, "Connected to Redis cache");
        Ok(Self {
            manager,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn.get(key.as_str()).await.map_err(backend_error)?;
        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }

    async fn set(&self, key: &CacheKey, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key.as_str(), value, seconds)
            .await
            .map_err(backend_error)
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: 0,
        })
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

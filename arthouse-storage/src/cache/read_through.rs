//! Read-through cache.
//!
//! Wraps a [`CacheBackend`] with JSON encoding, a fixed TTL and per-operation
//! timeouts. [`ReadThroughCache::get_or_fetch`] is the one entry point the
//! API uses: cache failures of any kind degrade to a miss and fall through to
//! the fetch, and populating the cache afterwards is best-effort.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::key::CacheKey;
use super::traits::{CacheBackend, CacheError, CacheResult, CacheStats};

/// Configuration for the read-through cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for every cached entry.
    pub entry_ttl: Duration,
    /// Upper bound on a single backend call.
    pub operation_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entry_ttl: Duration::from_secs(60),
            operation_timeout: Duration::from_millis(250),
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }

    /// Set the per-operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

pub struct ReadThroughCache<C: CacheBackend> {
    backend: Arc<C>,
    config: CacheConfig,
}

impl<C: CacheBackend> Clone for ReadThroughCache<C> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
        }
    }
}

impl<C: CacheBackend> ReadThroughCache<C> {
    pub fn new(backend: Arc<C>, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<C> {
        &self.backend
    }

    /// Decode the cached value under `key`.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheResult<Option<T>> {
        let raw = tokio::time::timeout(self.config.operation_timeout, self.backend.get(key))
            .await
            .map_err(|_| CacheError::Timeout(self.config.operation_timeout))??;
        raw.map(|bytes| {
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Serialization(e.to_string()))
        })
        .transpose()
    }

    /// Encode and store `value` under `key` with the configured TTL.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &CacheKey, value: &T) -> CacheResult<()> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
        tokio::time::timeout(
            self.config.operation_timeout,
            self.backend.set(key, bytes, self.config.entry_ttl),
        )
        .await
        .map_err(|_| CacheError::Timeout(self.config.operation_timeout))?
    }

    /// Return the cached value for `key`, or run `fetch`, cache its result
    /// and return it.
    ///
    /// `fetch` runs at most once, and only on a miss or cache failure. Its
    /// errors are returned unchanged and nothing is cached for them.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get::<T>(&key).await {
            Ok(Some(value)) => {
                tracing::debug!(key = %key, "Cache hit");
                return Ok(value);
            }
            Ok(None) => tracing::debug!(key = %key, "Cache miss"),
            Err(e) => tracing::warn!(key = %key, error = %e, "Cache read failed, falling through"),
        }

        let value = fetch().await?;

        if let Err(e) = self.set(&key, &value).await {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
        }
        Ok(value)
    }

    pub async fn stats(&self) -> CacheResult<CacheStats> {
        self.backend.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheBackend;
    use arthouse_core::EntityKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend that records calls and can be told to fail or stall.
    #[derive(Default)]
    struct MockBackend {
        stored: Mutex<Option<Vec<u8>>>,
        gets: AtomicUsize,
        sets: AtomicUsize,
        fail: bool,
        stall: bool,
    }

    #[async_trait]
    impl CacheBackend for MockBackend {
        async fn get(&self, _key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.stall {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail {
                return Err(CacheError::Backend("connection refused".into()));
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn set(&self, _key: &CacheKey, value: Vec<u8>, _ttl: Duration) -> CacheResult<()> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CacheError::Backend("connection refused".into()));
            }
            *self.stored.lock().unwrap() = Some(value);
            Ok(())
        }

        async fn stats(&self) -> CacheResult<CacheStats> {
            Ok(CacheStats::default())
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn key() -> CacheKey {
        CacheKey::list(EntityKind::Artwork, "limit=5")
    }

    #[tokio::test]
    async fn test_miss_fetches_once_and_sets_once() {
        let backend = Arc::new(MockBackend::default());
        let cache = ReadThroughCache::new(backend.clone(), CacheConfig::default());
        let fetches = AtomicUsize::new(0);

        let value: Result<Vec<String>, String> = cache
            .get_or_fetch(key(), || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["wave".to_string()])
            })
            .await;

        assert_eq!(value.unwrap(), vec!["wave".to_string()]);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(backend.gets.load(Ordering::SeqCst), 1);
        assert_eq!(backend.sets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let backend = Arc::new(MockBackend::default());
        *backend.stored.lock().unwrap() = Some(br#"["cached"]"#.to_vec());
        let cache = ReadThroughCache::new(backend.clone(), CacheConfig::default());
        let fetches = AtomicUsize::new(0);

        let value: Result<Vec<String>, String> = cache
            .get_or_fetch(key(), || async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["fresh".to_string()])
            })
            .await;

        assert_eq!(value.unwrap(), vec!["cached".to_string()]);
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(backend.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_through() {
        let backend = Arc::new(MockBackend {
            fail: true,
            ..MockBackend::default()
        });
        let cache = ReadThroughCache::new(backend.clone(), CacheConfig::default());

        let value: Result<u32, String> = cache.get_or_fetch(key(), || async { Ok(7) }).await;
        assert_eq!(value, Ok(7));
        assert_eq!(backend.sets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_undecodable_entry_falls_through() {
        let backend = Arc::new(MockBackend::default());
        *backend.stored.lock().unwrap() = Some(b"not json".to_vec());
        let cache = ReadThroughCache::new(backend, CacheConfig::default());

        assert!(matches!(
            cache.get::<u32>(&key()).await,
            Err(CacheError::Serialization(_))
        ));
        let value: Result<u32, String> = cache.get_or_fetch(key(), || async { Ok(3) }).await;
        assert_eq!(value, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_backend_times_out() {
        let backend = Arc::new(MockBackend {
            stall: true,
            ..MockBackend::default()
        });
        let config = CacheConfig::new().with_operation_timeout(Duration::from_millis(50));
        let cache = ReadThroughCache::new(backend, config);

        let value: Result<u32, String> = cache.get_or_fetch(key(), || async { Ok(1) }).await;
        assert_eq!(value, Ok(1));
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned_and_not_cached() {
        let backend = Arc::new(MockBackend::default());
        let cache = ReadThroughCache::new(backend.clone(), CacheConfig::default());

        let value: Result<u32, String> = cache
            .get_or_fetch(key(), || async { Err("store down".to_string()) })
            .await;
        assert_eq!(value, Err("store down".to_string()));
        assert_eq!(backend.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_memory_backend_second_read_is_a_hit() {
        let cache = ReadThroughCache::new(
            Arc::new(MemoryCacheBackend::default()),
            CacheConfig::default(),
        );
        let fetches = AtomicUsize::new(0);
        for _ in 0..2 {
            let value: Result<String, String> = cache
                .get_or_fetch(key(), || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok("v".to_string())
                })
                .await;
            assert_eq!(value.unwrap(), "v");
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().await.unwrap().hits, 1);
    }
}

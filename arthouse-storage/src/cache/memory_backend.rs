//! In-process cache backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use super::key::CacheKey;
use super::traits::{CacheBackend, CacheResult, CacheStats};

/// Default cap on stored entries.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Concurrent map cache with lazy expiry.
///
/// Expired entries are dropped when read. When the map is full, expired
/// entries are purged first and then the entry closest to expiry is evicted.
#[derive(Debug)]
pub struct MemoryCacheBackend {
    entries: DashMap<String, Entry>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for MemoryCacheBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryCacheBackend {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn make_room(&self, now: Instant) {
        if self.entries.len() < self.max_entries {
            return;
        }
        self.entries.retain(|_, entry| entry.expires_at > now);
        if self.entries.len() < self.max_entries {
            return;
        }
        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = victim {
            self.entries.remove(&key);
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        let now = Instant::now();
        let found = self
            .entries
            .get(key.as_str())
            .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));

        match found {
            Some(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            Some(None) => {
                self.entries
                    .remove_if(key.as_str(), |_, entry| entry.expires_at <= now);
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        if !self.entries.contains_key(key.as_str()) {
            self.make_room(now);
        }
        self.entries.insert(
            key.as_str().to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arthouse_core::EntityKind;

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = MemoryCacheBackend::default();
        let key = CacheKey::record(EntityKind::Artist, "a");
        cache
            .set(&key, b"x".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"x".to_vec()));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get(&key).await.unwrap(), None);

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 0);
    }

    #[tokio::test]
    async fn test_full_cache_evicts_soonest_expiry() {
        let cache = MemoryCacheBackend::new(2);
        let a = CacheKey::record(EntityKind::Artist, "a");
        let b = CacheKey::record(EntityKind::Artist, "b");
        let c = CacheKey::record(EntityKind::Artist, "c");
        cache.set(&a, vec![1], Duration::from_secs(10)).await.unwrap();
        cache.set(&b, vec![2], Duration::from_secs(100)).await.unwrap();
        cache.set(&c, vec![3], Duration::from_secs(100)).await.unwrap();

        assert_eq!(cache.get(&a).await.unwrap(), None);
        assert_eq!(cache.get(&b).await.unwrap(), Some(vec![2]));
        assert_eq!(cache.get(&c).await.unwrap(), Some(vec![3]));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = MemoryCacheBackend::new(1);
        let a = CacheKey::record(EntityKind::Artist, "a");
        cache.set(&a, vec![1], Duration::from_secs(10)).await.unwrap();
        cache.set(&a, vec![2], Duration::from_secs(10)).await.unwrap();
        assert_eq!(cache.get(&a).await.unwrap(), Some(vec![2]));
    }
}

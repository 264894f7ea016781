//! Cache backend trait, errors and statistics.

use std::time::Duration;

use async_trait::async_trait;

use super::key::CacheKey;

/// Cache-layer failures. These are logged by the read-through cache and
/// never returned to request handlers.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    /// Transport or storage failure inside the backend.
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Operation exceeded the configured timeout.
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Byte-oriented key-value cache with per-entry TTL.
///
/// Implementations must be safe for concurrent use. Expired entries must
/// never be returned from `get`.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>>;

    /// Store `value` under `key` for `ttl`, replacing any previous value.
    async fn set(&self, key: &CacheKey, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;

    /// Get cache statistics.
    async fn stats(&self) -> CacheResult<CacheStats>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (including expired entries).
    pub misses: u64,
    /// Number of entries currently held, where the backend can tell.
    pub entries: u64,
}

impl CacheStats {
    /// Calculate the hit rate.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 0,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}

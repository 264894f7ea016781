//! Backend selection.
//!
//! `CacheProvider` is an enum over the concrete backends so the read-through
//! cache stays monomorphic. Construction never fails: a backend that cannot
//! be opened degrades to `NoOp` with a warning, since the cache is never a
//! correctness dependency.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;

use super::key::CacheKey;
use super::lmdb_backend::LmdbCacheBackend;
use super::memory_backend::{MemoryCacheBackend, DEFAULT_MAX_ENTRIES};
#[cfg(feature = "redis")]
use super::redis_backend::RedisCacheBackend;
use super::traits::{CacheBackend, CacheResult, CacheStats};

/// Which backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    Memory,
    Lmdb,
    Redis,
    Disabled,
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "lmdb" => Ok(Self::Lmdb),
            "redis" => Ok(Self::Redis),
            "none" | "off" | "disabled" => Ok(Self::Disabled),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Connection settings for the Redis backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// `host:port`.
    pub addr: String,
    pub password: Option<String>,
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            addr: "localhost:6379".to_string(),
            password: None,
            db: 0,
        }
    }
}

impl RedisConfig {
    /// Connection URL, `redis://[:password@]addr/db`.
    pub fn url(&self) -> String {
        match self.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => format!("redis://:{}@{}/{}", password, self.addr, self.db),
            None => format!("redis://{}/{}", self.addr, self.db),
        }
    }
}

/// Everything needed to build any backend.
#[derive(Debug, Clone)]
pub struct CacheProviderConfig {
    pub kind: CacheBackendKind,
    pub memory_max_entries: usize,
    pub lmdb_path: PathBuf,
    pub lmdb_max_size_mb: usize,
    pub redis: RedisConfig,
}

impl Default for CacheProviderConfig {
    fn default() -> Self {
        Self {
            kind: CacheBackendKind::Memory,
            memory_max_entries: DEFAULT_MAX_ENTRIES,
            lmdb_path: PathBuf::from("./data/cache"),
            lmdb_max_size_mb: 256,
            redis: RedisConfig::default(),
        }
    }
}

/// Always misses, always accepts writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCacheBackend;

#[async_trait]
impl CacheBackend for NoOpCacheBackend {
    async fn get(&self, _key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &CacheKey, _value: Vec<u8>, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(CacheStats::default())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

pub enum CacheProvider {
    Memory(MemoryCacheBackend),
    Lmdb(LmdbCacheBackend),
    #[cfg(feature = "redis")]
    Redis(RedisCacheBackend),
    NoOp(NoOpCacheBackend),
}

impl CacheProvider {
    /// Build the configured backend, falling back to `NoOp` on failure.
    pub async fn from_config(config: &CacheProviderConfig) -> Self {
        let provider = match config.kind {
            CacheBackendKind::Memory => {
                Self::Memory(MemoryCacheBackend::new(config.memory_max_entries))
            }
            CacheBackendKind::Lmdb => {
                match LmdbCacheBackend::new(&config.lmdb_path, config.lmdb_max_size_mb) {
                    Ok(backend) => Self::Lmdb(backend),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            path = %config.lmdb_path.display(),
                            "LMDB cache unavailable, caching disabled"
                        );
                        Self::NoOp(NoOpCacheBackend)
                    }
                }
            }
            CacheBackendKind::Redis => Self::connect_redis(&config.redis).await,
            CacheBackendKind::Disabled => Self::NoOp(NoOpCacheBackend),
        };
        tracing::info!(backend = provider.name(), "Cache backend ready");
        provider
    }

    #[cfg(feature = "redis")]
    async fn connect_redis(config: &RedisConfig) -> Self {
        match RedisCacheBackend::connect(config).await {
            Ok(backend) => Self::Redis(backend),
            Err(e) => {
                tracing::warn!(error = %e, addr = %config.addr, "Redis unavailable, caching disabled");
                Self::NoOp(NoOpCacheBackend)
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn connect_redis(config: &RedisConfig) -> Self {
        tracing::warn!(
            addr = %config.addr,
            "Redis cache requested but the `redis` feature is not enabled, caching disabled"
        );
        Self::NoOp(NoOpCacheBackend)
    }

    fn backend(&self) -> &dyn CacheBackend {
        match self {
            Self::Memory(backend) => backend,
            Self::Lmdb(backend) => backend,
            #[cfg(feature = "redis")]
            Self::Redis(backend) => backend,
            Self::NoOp(backend) => backend,
        }
    }
}

#[async_trait]
impl CacheBackend for CacheProvider {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        self.backend().get(key).await
    }

    async fn set(&self, key: &CacheKey, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        self.backend().set(key, value, ttl).await
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        self.backend().stats().await
    }

    fn name(&self) -> &'static str {
        self.backend().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arthouse_core::EntityKind;

    #[test]
    fn test_parse_backend_kind() {
        assert_eq!("memory".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Memory));
        assert_eq!(" LMDB ".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Lmdb));
        assert_eq!("none".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Disabled));
        assert!("memcached".parse::<CacheBackendKind>().is_err());
    }

    #[test]
    fn test_redis_url_with_and_without_password() {
        let mut config = RedisConfig::default();
        assert_eq!(config.url(), "redis://localhost:6379/0");
        config.password = Some("secret".into());
        config.db = 2;
        assert_eq!(config.url(), "redis://:secret@localhost:6379/2");
        config.password = Some(String::new());
        assert_eq!(config.url(), "redis://localhost:6379/2");
    }

    #[tokio::test]
    async fn test_disabled_provider_never_hits() {
        let config = CacheProviderConfig {
            kind: CacheBackendKind::Disabled,
            ..CacheProviderConfig::default()
        };
        let provider = CacheProvider::from_config(&config).await;
        assert_eq!(provider.name(), "noop");

        let key = CacheKey::record(EntityKind::Artist, "a");
        provider.set(&key, vec![1], Duration::from_secs(1)).await.unwrap();
        assert_eq!(provider.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_provider_round_trips() {
        let provider = CacheProvider::from_config(&CacheProviderConfig::default()).await;
        let key = CacheKey::record(EntityKind::Artist, "a");
        provider.set(&key, vec![7], Duration::from_secs(60)).await.unwrap();
        assert_eq!(provider.get(&key).await.unwrap(), Some(vec![7]));
    }

    #[tokio::test]
    async fn test_lmdb_provider_uses_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CacheProviderConfig {
            kind: CacheBackendKind::Lmdb,
            lmdb_path: dir.path().join("cache"),
            lmdb_max_size_mb: 10,
            ..CacheProviderConfig::default()
        };
        let provider = CacheProvider::from_config(&config).await;
        assert_eq!(provider.name(), "lmdb");
    }
}

//! API Configuration Module
//!
//! Everything the server needs is read once from environment variables in
//! `main` and passed down by value. Unset or unparsable values fall back to
//! defaults; the only hard failures are an invalid bind address, an
//! unsupported store URI and an inconsistent page-size triple.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use arthouse_core::{CatalogLimits, LimitConfig};
use arthouse_storage::{CacheBackendKind, CacheConfig, CacheProviderConfig, RedisConfig};

use crate::db::{StoreConfig, StoreUri};

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Invalid STORE_URI: {0}")]
    InvalidStoreUri(String),

    #[error("Invalid page-size limits: {0}")]
    InvalidLimits(#[from] arthouse_core::ConfigError),
}

// ============================================================================
// APP CONFIGURATION
// ============================================================================

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub cache_backend: CacheProviderConfig,
    pub cache: CacheConfig,
    /// Whole-request deadline
    pub request_timeout: Duration,
    /// Seed the store from this directory at startup
    pub seed_dir: Option<PathBuf>,
    pub limits: CatalogLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            store: StoreConfig::default(),
            cache_backend: CacheProviderConfig::default(),
            cache: CacheConfig::default(),
            request_timeout: Duration::from_secs(15),
            seed_dir: None,
            limits: CatalogLimits::default(),
        }
    }
}

impl AppConfig {
    /// Create AppConfig from environment variables.
    ///
    /// Environment variables:
    /// - `HOST`, `PORT`: bind address (default: 0.0.0.0:8080)
    /// - `STORE_URI`: `memory://` or `lmdb://<dir>` (default: memory://)
    /// - `STORE_DB_NAME`: database name (default: art-house)
    /// - `STORE_MAP_SIZE_MB`: LMDB map size (default: 512)
    /// - `CACHE_BACKEND`: memory, lmdb, redis or none (default: memory)
    /// - `CACHE_ADDR`, `CACHE_PASSWORD`, `CACHE_DB`: Redis connection
    /// - `CACHE_PATH`: LMDB cache directory (default: ./data/cache)
    /// - `CACHE_TTL_SECS`: entry TTL (default: 60)
    /// - `CACHE_TIMEOUT_MS`: per cache call (default: 250)
    /// - `REQUEST_TIMEOUT_SECS`: per request (default: 15)
    /// - `SEED_DIR`: seed directory loaded at startup (default: unset)
    /// - `{ARTIST,ARTWORK,EXHIBITION}_LIMIT`, `_LIMIT_MIN`, `_LIMIT_MAX`:
    ///   page sizes (default: 15, 1, 100)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = StoreConfig {
            uri: match parsed("STORE_URI") {
                Some(raw) => StoreUri::from_str(&raw).map_err(ConfigError::InvalidStoreUri)?,
                None => defaults.store.uri.clone(),
            },
            db_name: parsed("STORE_DB_NAME").unwrap_or(defaults.store.db_name.clone()),
            map_size_mb: parse_or(&lookup, "STORE_MAP_SIZE_MB", defaults.store.map_size_mb),
        };

        let cache_backend = CacheProviderConfig {
            kind: parsed("CACHE_BACKEND")
                .and_then(|s| s.parse::<CacheBackendKind>().ok())
                .unwrap_or(defaults.cache_backend.kind),
            lmdb_path: parsed("CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_backend.lmdb_path.clone()),
            redis: RedisConfig {
                addr: parsed("CACHE_ADDR").unwrap_or(defaults.cache_backend.redis.addr.clone()),
                password: parsed("CACHE_PASSWORD"),
                db: parse_or(&lookup, "CACHE_DB", defaults.cache_backend.redis.db),
            },
            ..defaults.cache_backend.clone()
        };

        let cache = CacheConfig::new()
            .with_ttl(Duration::from_secs(parse_or(
                &lookup,
                "CACHE_TTL_SECS",
                defaults.cache.entry_ttl.as_secs(),
            )))
            .with_operation_timeout(Duration::from_millis(parse_or(
                &lookup,
                "CACHE_TIMEOUT_MS",
                250,
            )));

        let limits = CatalogLimits {
            artist: limit_from(&lookup, "ARTIST"),
            artwork: limit_from(&lookup, "ARTWORK"),
            exhibition: limit_from(&lookup, "EXHIBITION"),
        };
        limits.validate()?;

        Ok(Self {
            host: parsed("HOST").unwrap_or(defaults.host.clone()),
            port: parse_or(&lookup, "PORT", defaults.port),
            store,
            cache_backend,
            cache,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            seed_dir: parsed("SEED_DIR").map(PathBuf::from),
            limits,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidAddress {
                reason: e.to_string(),
                addr,
            })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// `{PREFIX}_LIMIT`, `{PREFIX}_LIMIT_MIN`, `{PREFIX}_LIMIT_MAX`.
fn limit_from<F>(lookup: &F, prefix: &str) -> LimitConfig
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = LimitConfig::default();
    LimitConfig::new(
        parse_or(lookup, &format!("{}_LIMIT", prefix), defaults.default),
        parse_or(lookup, &format!("{}_LIMIT_MIN", prefix), defaults.min),
        parse_or(lookup, &format!("{}_LIMIT_MAX", prefix), defaults.max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.cache.entry_ttl, Duration::from_secs(60));
        assert_eq!(config.cache.operation_timeout, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.cache_backend.kind, CacheBackendKind::Memory);
        assert_eq!(config.limits, CatalogLimits::default());
        assert_eq!(config.seed_dir, None);
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("STORE_URI", "lmdb:///srv/catalog"),
            ("STORE_DB_NAME", "museum"),
            ("CACHE_BACKEND", "redis"),
            ("CACHE_ADDR", "cache:6380"),
            ("CACHE_PASSWORD", "hunter2"),
            ("CACHE_DB", "3"),
            ("CACHE_TTL_SECS", "5"),
            ("ARTWORK_LIMIT", "20"),
            ("ARTWORK_LIMIT_MAX", "50"),
            ("SEED_DIR", "./data"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.store.uri, StoreUri::Lmdb(PathBuf::from("/srv/catalog")));
        assert_eq!(config.store.db_name, "museum");
        assert_eq!(config.cache_backend.kind, CacheBackendKind::Redis);
        assert_eq!(config.cache_backend.redis.url(), "redis://:hunter2@cache:6380/3");
        assert_eq!(config.cache.entry_ttl, Duration::from_secs(5));
        assert_eq!(config.limits.artwork, LimitConfig::new(20, 1, 50));
        assert_eq!(config.limits.artist, LimitConfig::default());
        assert_eq!(config.seed_dir, Some(PathBuf::from("./data")));
    }

    #[test]
    fn test_unparsable_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("PORT", "eighty"),
            ("CACHE_TTL_SECS", "-1"),
            ("CACHE_BACKEND", "memcached"),
            ("ARTIST_LIMIT", "lots"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache.entry_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_backend.kind, CacheBackendKind::Memory);
        assert_eq!(config.limits.artist.default, 15);
    }

    #[test]
    fn test_inconsistent_limits_are_rejected() {
        let err = config_from(&[("EXHIBITION_LIMIT_MIN", "50"), ("EXHIBITION_LIMIT_MAX", "10")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLimits(_)));

        let err = config_from(&[("ARTIST_LIMIT", "500")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLimits(arthouse_core::ConfigError::InvalidLimit {
                field: "artist.default".to_string(),
                value: 500,
                reason: "outside [1, 100]".to_string(),
            })
        );
    }

    #[test]
    fn test_unsupported_store_uri_is_rejected() {
        let err = config_from(&[("STORE_URI", "mongodb://localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStoreUri(_)));
    }

    proptest::proptest! {
        #[test]
        fn prop_valid_limits_from_environment_are_kept(
            limits in arthouse_test_utils::generators::arb_limit_config(),
        ) {
            let default = limits.default.to_string();
            let min = limits.min.to_string();
            let max = limits.max.to_string();
            let config = config_from(&[
                ("EXHIBITION_LIMIT", default.as_str()),
                ("EXHIBITION_LIMIT_MIN", min.as_str()),
                ("EXHIBITION_LIMIT_MAX", max.as_str()),
            ])
            .unwrap();
            proptest::prop_assert_eq!(config.limits.exhibition, limits);
            proptest::prop_assert_eq!(config.limits.artwork, LimitConfig::default());
        }
    }

    #[test]
    fn test_bad_host_is_rejected() {
        let config = config_from(&[("HOST", "not a host")]).unwrap();
        assert!(matches!(
            config.bind_addr(),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }
}

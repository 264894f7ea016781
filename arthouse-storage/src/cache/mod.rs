//! Response cache.
//!
//! Handlers consult a [`ReadThroughCache`] keyed by [`CacheKey`] before
//! touching a store. Entries are JSON-encoded, expire after a fixed TTL and
//! are never invalidated on write; the catalog is read-only at runtime.
//!
//! Backends are interchangeable behind [`CacheBackend`]:
//!
//! - [`MemoryCacheBackend`] - process-local map, the default
//! - [`LmdbCacheBackend`] - memory-mapped file, survives restarts
//! - `RedisCacheBackend` - shared across instances (feature `redis`)
//! - [`NoOpCacheBackend`] - caching disabled
//!
//! [`CacheProvider`] picks one from configuration.

pub mod key;
pub mod lmdb_backend;
pub mod memory_backend;
pub mod provider;
pub mod read_through;
#[cfg(feature = "redis")]
pub mod redis_backend;
pub mod traits;

pub use key::CacheKey;
pub use lmdb_backend::{LmdbCacheBackend, LmdbCacheError};
pub use memory_backend::MemoryCacheBackend;
pub use provider::{
    CacheBackendKind, CacheProvider, CacheProviderConfig, NoOpCacheBackend, RedisConfig,
};
pub use read_through::{CacheConfig, ReadThroughCache};
#[cfg(feature = "redis")]
pub use redis_backend::RedisCacheBackend;
pub use traits::{CacheBackend, CacheError, CacheResult, CacheStats};

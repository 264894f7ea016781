//! Arthouse Storage - Document Stores, Entity Stores and Cache
//!
//! [`DocumentStore`] is the datastore seam: a schemaless collection store
//! that evaluates aggregation pipelines. Two implementations ship here, an
//! in-memory one for tests and development and an LMDB one for persistence.
//! The entity stores in [`stores`] build catalog queries on top of it, and
//! [`cache`] holds the read-through response cache.

pub mod cache;
pub mod document;
pub mod engine;
pub mod lmdb;
pub mod memory;
pub mod stores;

pub use document::{Document, DocumentStore, ID_FIELD};
pub use lmdb::{LmdbDocumentStore, LmdbStoreError};
pub use memory::MemoryDocumentStore;
pub use stores::{ArtistStore, ArtworkStore, ExhibitionStore};

// Re-export cache types for API integration
pub use cache::{
    CacheBackend, CacheBackendKind, CacheConfig, CacheError, CacheKey, CacheProvider,
    CacheProviderConfig, CacheStats, ReadThroughCache, RedisConfig,
};

//! LMDB-backed cache backend.
//!
//! Uses heed to keep cached responses in a memory-mapped file so they survive
//! process restarts within their TTL.
//!
//! # Value layout
//!
//! `[expires_at: i64 millis, little-endian][payload]`. Entries past their
//! expiry read as misses and are deleted on the next read.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use super::key::CacheKey;
use super::traits::{CacheBackend, CacheError, CacheResult, CacheStats};

const HEADER_LEN: usize = 8;

/// Why the cache environment could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum LmdbCacheError {
    #[error("cache environment: {0}")]
    Environment(heed::Error),

    #[error("cache database: {0}")]
    Database(heed::Error),

    #[error("cache directory: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbCacheError> for CacheError {
    fn from(e: LmdbCacheError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

fn backend_error(e: heed::Error) -> CacheError {
    CacheError::Backend(format!("lmdb: {}", e))
}

/// Persistent cache in a single unnamed LMDB database.
pub struct LmdbCacheBackend {
    env: Env,
    db: Database<Bytes, Bytes>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LmdbCacheBackend {
    /// Open (or create) the cache under `dir`, with an LMDB map of
    /// `map_size_mb` megabytes.
    pub fn new<P: AsRef<Path>>(dir: P, map_size_mb: usize) -> Result<Self, LmdbCacheError> {
        std::fs::create_dir_all(dir.as_ref())?;

        // SAFETY: the environment is opened once per directory and never
        // shared with another process mapping the same files.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size_mb << 20)
                .max_dbs(1)
                .open(dir.as_ref())
        }
        .map_err(LmdbCacheError::Environment)?;

        let mut wtxn = env.write_txn().map_err(LmdbCacheError::Environment)?;
        let db = env
            .create_database::<Bytes, Bytes>(&mut wtxn, None)
            .map_err(LmdbCacheError::Database)?;
        wtxn.commit().map_err(LmdbCacheError::Database)?;

        Ok(Self {
            env,
            db,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    fn read(&self, key: &CacheKey, now_ms: i64) -> CacheResult<Lookup> {
        let rtxn = self.env.read_txn().map_err(backend_error)?;
        let Some(bytes) = self.db.get(&rtxn, key.as_bytes()).map_err(backend_error)? else {
            return Ok(Lookup::Missing);
        };
        if bytes.len() < HEADER_LEN {
            return Ok(Lookup::Expired);
        }
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&bytes[..HEADER_LEN]);
        if i64::from_le_bytes(header) <= now_ms {
            return Ok(Lookup::Expired);
        }
        Ok(Lookup::Found(bytes[HEADER_LEN..].to_vec()))
    }

    fn delete(&self, key: &CacheKey) -> CacheResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend_error)?;
        self.db
            .delete(&mut wtxn, key.as_bytes())
            .map_err(backend_error)?;
        wtxn.commit().map_err(backend_error)
    }

    fn write(&self, key: &CacheKey, value: &[u8], expires_at_ms: i64) -> CacheResult<()> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + value.len());
        bytes.extend_from_slice(&expires_at_ms.to_le_bytes());
        bytes.extend_from_slice(value);

        let mut wtxn = self.env.write_txn().map_err(backend_error)?;
        self.db
            .put(&mut wtxn, key.as_bytes(), &bytes)
            .map_err(backend_error)?;
        wtxn.commit().map_err(backend_error)
    }
}

enum Lookup {
    Found(Vec<u8>),
    Expired,
    Missing,
}

#[async_trait]
impl CacheBackend for LmdbCacheBackend {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        let lookup = self.read(key, Utc::now().timestamp_millis());
        match lookup {
            Ok(Lookup::Found(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            Ok(Lookup::Expired) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.delete(key)?;
                Ok(None)
            }
            Ok(Lookup::Missing) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(e) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = Utc::now().timestamp_millis().saturating_add(ttl_ms);
        self.write(key, &value, expires_at)
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let rtxn = self.env.read_txn().map_err(backend_error)?;
        let entries = self.db.len(&rtxn).map_err(backend_error)?;
        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        })
    }

    fn name(&self) -> &'static str {
        "lmdb"
    }
}

//! Datastore Connection Module
//!
//! Opens the document store named by `STORE_URI`: `memory://` for a
//! process-local store, `lmdb://<dir>` for a persistent LMDB environment in
//! `<dir>/<STORE_DB_NAME>`.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use arthouse_core::StoreResult;
use arthouse_storage::{DocumentStore, LmdbDocumentStore, MemoryDocumentStore};

// ============================================================================
// STORE CONFIGURATION
// ============================================================================

/// Where the catalog lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    Memory,
    Lmdb(PathBuf),
}

impl FromStr for StoreUri {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "memory://" || s == "memory" {
            return Ok(Self::Memory);
        }
        match s.strip_prefix("lmdb://") {
            Some(dir) if !dir.is_empty() => Ok(Self::Lmdb(PathBuf::from(dir))),
            _ => Err(format!(
                "unsupported store URI {:?}, expected memory:// or lmdb://<dir>",
                s
            )),
        }
    }
}

/// Datastore configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: StoreUri,
    /// Database name; the LMDB subdirectory under the URI path
    pub db_name: String,
    /// LMDB map size in megabytes
    pub map_size_mb: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: StoreUri::Memory,
            db_name: "art-house".to_string(),
            map_size_mb: 512,
        }
    }
}

impl StoreConfig {
    /// Open the configured store.
    pub fn connect(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        match &self.uri {
            StoreUri::Memory => {
                tracing::info!("Using in-memory document store");
                Ok(Arc::new(MemoryDocumentStore::new()))
            }
            StoreUri::Lmdb(dir) => {
                let path = dir.join(&self.db_name);
                let store = LmdbDocumentStore::open(&path, self.map_size_mb)?;
                tracing::info!(path = %path.display(), "Opened LMDB document store");
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_uri() {
        assert_eq!("memory://".parse::<StoreUri>(), Ok(StoreUri::Memory));
        assert_eq!(
            "lmdb:///var/lib/arthouse".parse::<StoreUri>(),
            Ok(StoreUri::Lmdb(PathBuf::from("/var/lib/arthouse")))
        );
        assert!("lmdb://".parse::<StoreUri>().is_err());
        assert!("mongodb://localhost:27017".parse::<StoreUri>().is_err());
    }

    #[tokio::test]
    async fn test_connect_lmdb_creates_database_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig {
            uri: StoreUri::Lmdb(dir.path().to_path_buf()),
            map_size_mb: 10,
            ..StoreConfig::default()
        };
        let store = config.connect().unwrap();
        store.ping().await.unwrap();
        assert!(dir.path().join("art-house").is_dir());
    }
}

//! Catalog seeding.
//!
//! A seed directory holds `artists.json`, `artworks.json` and
//! `exhibitions.json`, each a JSON array. Artworks embed their artist and
//! exhibitions embed their artists and artworks; only the embedded `_id`s are
//! kept. A missing file seeds nothing for that collection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arthouse_core::{Artist, Artwork, ExhibitionDocument, Image, ObjectId, StoreError};
use arthouse_storage::{ArtistStore, ArtworkStore, DocumentStore, ExhibitionStore};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const ARTISTS_FILE: &str = "artists.json";
pub const ARTWORKS_FILE: &str = "artworks.json";
pub const EXHIBITIONS_FILE: &str = "exhibitions.json";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to insert seed data: {0}")]
    Store(#[from] StoreError),
}

/// Any embedded record; everything but `_id` is ignored.
#[derive(Debug, Clone, Deserialize)]
struct SeedReference {
    #[serde(rename = "_id")]
    id: ObjectId,
}

/// Exhibition as it appears in `exhibitions.json`.
#[derive(Debug, Clone, Deserialize)]
struct SeedExhibition {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    images: Vec<Image>,
    #[serde(default)]
    artists: Vec<SeedReference>,
    #[serde(default)]
    artworks: Vec<SeedReference>,
}

impl From<SeedExhibition> for ExhibitionDocument {
    fn from(seed: SeedExhibition) -> Self {
        ExhibitionDocument {
            id: seed.id,
            name: seed.name,
            images: seed.images,
            artists: seed.artists.into_iter().map(|r| r.id).collect(),
            artworks: seed.artworks.into_iter().map(|r| r.id).collect(),
        }
    }
}

/// Parsed contents of a seed directory.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub artists: Vec<Artist>,
    pub artworks: Vec<Artwork>,
    pub exhibitions: Vec<ExhibitionDocument>,
}

/// How many records each collection received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub artists: usize,
    pub artworks: usize,
    pub exhibitions: usize,
}

/// Read and parse the seed files in `dir`.
pub fn load_dir(dir: &Path) -> Result<SeedData, SeedError> {
    let exhibitions: Vec<SeedExhibition> = read_array(&dir.join(EXHIBITIONS_FILE))?;
    Ok(SeedData {
        artists: read_array(&dir.join(ARTISTS_FILE))?,
        artworks: read_array(&dir.join(ARTWORKS_FILE))?,
        exhibitions: exhibitions.into_iter().map(ExhibitionDocument::from).collect(),
    })
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SeedError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Seed file missing, skipping");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(SeedError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&bytes).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Insert `data` through the entity stores and build the text index.
///
/// Each collection is inserted as one all-or-nothing batch; a duplicate id
/// fails that collection and stops the seed.
pub async fn seed_catalog(
    db: Arc<dyn DocumentStore>,
    data: SeedData,
) -> Result<SeedSummary, SeedError> {
    let artworks = ArtworkStore::new(db.clone());
    let summary = SeedSummary {
        artists: ArtistStore::new(db.clone()).insert_many(data.artists).await?,
        artworks: artworks.insert_many(data.artworks).await?,
        exhibitions: ExhibitionStore::new(db)
            .insert_documents(data.exhibitions)
            .await?,
    };
    artworks.ensure_indexes().await?;
    tracing::info!(
        artists = summary.artists,
        artworks = summary.artworks,
        exhibitions = summary.exhibitions,
        "Catalog seeded"
    );
    Ok(summary)
}

//! Arthouse Core - Catalog Types
//!
//! Data model, error taxonomy, query specifications and pipeline stages for
//! the art catalog. No I/O lives here; storage and HTTP crates build on it.

pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod pipeline;
pub mod query;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::{CatalogLimits, LimitConfig};
pub use error::{ConfigError, ConfigResult, StoreError, StoreResult};
pub use identity::ObjectId;
pub use model::{
    sort_images, Artist, Artwork, ArtworkDocument, Exhibition, ExhibitionDocument, Image,
};
pub use pipeline::{Filter, FindOptions, SortDirection, SortSpec, Stage};
pub use query::{ArtistQuery, ArtworkQuery, ExhibitionQuery, QueryParams, QuerySpec};

// ============================================================================
// ENTITY KINDS
// ============================================================================

/// Top-level catalog entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Artist,
    Artwork,
    Exhibition,
}

impl EntityKind {
    /// Name of the datastore collection holding this kind.
    pub const fn collection(self) -> &'static str {
        match self {
            EntityKind::Artist => "artists",
            EntityKind::Artwork => "artworks",
            EntityKind::Exhibition => "exhibitions",
        }
    }

    /// Singular lowercase name, used for cache namespaces and relation names.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Artist => "artist",
            EntityKind::Artwork => "artwork",
            EntityKind::Exhibition => "exhibition",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

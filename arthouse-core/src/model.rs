//! Catalog records and their persisted document forms.
//!
//! Materialized records (`Artwork`, `Exhibition`) embed the records they
//! reference; persisted documents (`ArtworkDocument`, `ExhibitionDocument`)
//! store only identifiers. Serialization omits empty and zero values.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::identity::ObjectId;

fn is_zero(value: &i64) -> bool {
    *value == 0
}

// ============================================================================
// IMAGE
// ============================================================================

/// Picture descriptor embedded in every catalog record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub url: String,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            height: None,
            width: None,
            url: url.into(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Ordering by ascending width with missing widths last.
    pub fn cmp_by_width(&self, other: &Self) -> Ordering {
        match (self.width, other.width) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Stable sort by ascending width, missing widths last.
    pub fn sort_slice(images: &mut [Image]) {
        images.sort_by(Image::cmp_by_width);
    }
}

/// Sort an optional image sequence in place. An absent sequence stays absent.
pub fn sort_images(images: Option<&mut Vec<Image>>) {
    if let Some(images) = images {
        Image::sort_slice(images);
    }
}

// ============================================================================
// ARTIST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Artist {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
}

impl Artist {
    pub fn sort_images(&mut self) {
        Image::sort_slice(&mut self.images);
    }
}

// ============================================================================
// ARTWORK
// ============================================================================

/// Artwork with its owning artist embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Artwork {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub year: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub artist: Artist,
}

impl Artwork {
    /// Sort the artwork's images and those of its embedded artist.
    pub fn sort_images(&mut self) {
        Image::sort_slice(&mut self.images);
        self.artist.sort_images();
    }

    pub fn to_document(&self) -> ArtworkDocument {
        ArtworkDocument {
            id: self.id,
            title: self.title.clone(),
            images: self.images.clone(),
            year: self.year,
            description: self.description.clone(),
            artist: self.artist.id,
        }
    }
}

/// Persisted artwork: the artist is stored by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub year: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub artist: ObjectId,
}

impl ArtworkDocument {
    /// Materialize with the resolved owning artist.
    pub fn into_artwork(self, artist: Artist) -> Artwork {
        Artwork {
            id: self.id,
            title: self.title,
            images: self.images,
            year: self.year,
            description: self.description,
            artist,
        }
    }
}

// ============================================================================
// EXHIBITION
// ============================================================================

/// Exhibition record. `artists` and `artworks` are only populated by the
/// relationship queries; list and detail reads leave them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Exhibition {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<Artist>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artworks: Vec<Artwork>,
}

impl Exhibition {
    pub fn sort_images(&mut self) {
        Image::sort_slice(&mut self.images);
        self.artists.iter_mut().for_each(Artist::sort_images);
        self.artworks.iter_mut().for_each(Artwork::sort_images);
    }

    pub fn to_document(&self) -> ExhibitionDocument {
        ExhibitionDocument {
            id: self.id,
            name: self.name.clone(),
            images: self.images.clone(),
            artists: self.artists.iter().map(|a| a.id).collect(),
            artworks: self.artworks.iter().map(|a| a.id).collect(),
        }
    }
}

/// Persisted exhibition: members are stored as id arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitionDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artists: Vec<ObjectId>,
    #[serde(default)]
    pub artworks: Vec<ObjectId>,
}

impl ExhibitionDocument {
    /// Detail view of the exhibition without resolved members.
    pub fn into_exhibition(self) -> Exhibition {
        Exhibition {
            id: self.id,
            name: self.name,
            images: self.images,
            artists: Vec::new(),
            artworks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(width: Option<f64>, url: &str) -> Image {
        Image {
            height: width,
            width,
            url: url.to_string(),
        }
    }

    fn urls(images: &[Image]) -> Vec<&str> {
        images.iter().map(|i| i.url.as_str()).collect()
    }

    #[test]
    fn test_sort_images_absent_stays_absent() {
        let mut images: Option<Vec<Image>> = None;
        sort_images(images.as_mut());
        assert!(images.is_none());
    }

    #[test]
    fn test_sort_images_mixed_widths() {
        let mut images = vec![
            sized(Some(500.0), "a"),
            sized(None, "b"),
            sized(Some(100.0), "c"),
            sized(Some(500.0), "d"),
            sized(Some(1200.0), "e"),
        ];
        sort_images(Some(&mut images));
        assert_eq!(urls(&images), vec!["c", "a", "d", "e", "b"]);
    }

    #[test]
    fn test_sort_images_already_sorted_is_unchanged() {
        let mut images = vec![
            sized(Some(100.0), "a"),
            sized(Some(200.0), "b"),
            sized(Some(300.0), "c"),
        ];
        let before = images.clone();
        Image::sort_slice(&mut images);
        assert_eq!(images, before);
    }

    #[test]
    fn test_artwork_serialization_omits_empty_fields() {
        let artist = Artist {
            id: ObjectId::parse("65a1b2c3d4e5f60718293a4b").unwrap(),
            name: "Hokusai".into(),
            images: vec![],
        };
        let artwork = Artwork {
            id: ObjectId::parse("65a1b2c3d4e5f60718293a4c").unwrap(),
            title: "The Great Wave".into(),
            images: vec![],
            year: 0,
            description: String::new(),
            artist,
        };
        let json = serde_json::to_value(&artwork).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": "65a1b2c3d4e5f60718293a4c",
                "title": "The Great Wave",
                "artist": { "_id": "65a1b2c3d4e5f60718293a4b", "name": "Hokusai" }
            })
        );
    }

    #[test]
    fn test_exhibition_document_keeps_member_ids() {
        let artist = Artist {
            id: ObjectId::new(),
            name: "Monet".into(),
            images: vec![],
        };
        let exhibition = Exhibition {
            id: ObjectId::new(),
            name: "Water Lilies".into(),
            images: vec![],
            artists: vec![artist.clone()],
            artworks: vec![],
        };
        let doc = exhibition.to_document();
        assert_eq!(doc.artists, vec![artist.id]);
        assert!(doc.artworks.is_empty());
        assert!(doc.into_exhibition().artists.is_empty());
    }
}

//! Arthouse Test Utilities
//!
//! Shared test infrastructure for the Arthouse workspace:
//! - Proptest generators for catalog types
//! - A small deterministic sample catalog and seeded stores
//! - Assertions for store errors and image ordering

pub use arthouse_core::{
    Artist, Artwork, EntityKind, Exhibition, ExhibitionDocument, Image, LimitConfig, ObjectId,
    StoreError, StoreResult,
};

use std::sync::Arc;

use arthouse_storage::{
    ArtistStore, ArtworkStore, DocumentStore, ExhibitionStore, MemoryDocumentStore,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for catalog types.

    use super::*;
    use proptest::prelude::*;

    /// Generate a random ObjectId.
    pub fn arb_object_id() -> impl Strategy<Value = ObjectId> {
        any::<[u8; 12]>().prop_map(ObjectId::from_bytes)
    }

    /// Generate an image, sometimes without dimensions.
    pub fn arb_image() -> impl Strategy<Value = Image> {
        (
            "[a-z]{1,8}",
            proptest::option::of(1u32..4000),
            proptest::option::of(1u32..4000),
        )
            .prop_map(|(name, width, height)| Image {
                height: height.map(f64::from),
                width: width.map(f64::from),
                url: format!("https://img.example/{}.jpg", name),
            })
    }

    pub fn arb_images() -> impl Strategy<Value = Vec<Image>> {
        prop::collection::vec(arb_image(), 0..8)
    }

    pub fn arb_artist() -> impl Strategy<Value = Artist> {
        (arb_object_id(), "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,10})?", arb_images()).prop_map(
            |(id, name, images)| Artist { id, name, images },
        )
    }

    /// Generate a limit triple that passes validation.
    pub fn arb_limit_config() -> impl Strategy<Value = LimitConfig> {
        (1i64..50, 0i64..50, 0i64..100).prop_map(|(min, span, offset)| {
            let max = min + span;
            let default = min + offset % (span + 1);
            LimitConfig::new(default, min, max)
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built catalog data for store and HTTP tests.

    use super::*;

    /// Deterministic id whose last byte is `n`.
    pub fn object_id(n: u8) -> ObjectId {
        let mut bytes = [0u8; 12];
        bytes[0] = 0x65;
        bytes[11] = n;
        ObjectId::from_bytes(bytes)
    }

    /// Everything needed to seed a store.
    #[derive(Debug, Clone)]
    pub struct Catalog {
        pub artists: Vec<Artist>,
        pub artworks: Vec<Artwork>,
        pub exhibitions: Vec<ExhibitionDocument>,
    }

    impl Catalog {
        pub fn artwork(&self, title: &str) -> &Artwork {
            self.artworks
                .iter()
                .find(|a| a.title == title)
                .unwrap_or_else(|| panic!("no artwork titled {:?}", title))
        }

        pub fn artist(&self, name: &str) -> &Artist {
            self.artists
                .iter()
                .find(|a| a.name == name)
                .unwrap_or_else(|| panic!("no artist named {:?}", name))
        }
    }

    fn artist(n: u8, name: &str, images: Vec<Image>) -> Artist {
        Artist {
            id: object_id(n),
            name: name.to_string(),
            images,
        }
    }

    fn artwork(n: u8, title: &str, year: i64, description: &str, artist: &Artist) -> Artwork {
        Artwork {
            id: object_id(n),
            title: title.to_string(),
            // Deliberately unsorted: widest first, one without dimensions.
            images: vec![
                Image::new(format!("https://img.example/{}/large.jpg", n)).with_size(1200.0, 900.0),
                Image::new(format!("https://img.example/{}/raw.jpg", n)),
                Image::new(format!("https://img.example/{}/thumb.jpg", n)).with_size(200.0, 150.0),
            ],
            year,
            description: description.to_string(),
            artist: artist.clone(),
        }
    }

    /// Three artists, eight artworks with distinct years, two exhibitions.
    ///
    /// Ids are fixed: artists are `object_id(1..=3)`, artworks
    /// `object_id(11..=18)` and exhibitions `object_id(21..=22)`.
    pub fn sample_catalog() -> Catalog {
        let hokusai = artist(
            1,
            "Katsushika Hokusai",
            vec![
                Image::new("https://img.example/hokusai/portrait.jpg").with_size(800.0, 1000.0),
                Image::new("https://img.example/hokusai/seal.jpg").with_size(100.0, 100.0),
            ],
        );
        let monet = artist(2, "Claude Monet", Vec::new());
        let kahlo = artist(3, "Frida Kahlo", Vec::new());

        let artworks = vec![
            artwork(11, "The Great Wave off Kanagawa", 1831, "Woodblock print of a wave over boats", &hokusai),
            artwork(12, "Fine Wind, Clear Morning", 1830, "Mount Fuji in red at dawn", &hokusai),
            artwork(13, "Impression, Sunrise", 1872, "The harbour of Le Havre at sunrise", &monet),
            artwork(14, "Water Lilies", 1906, "Lily pond at Giverny", &monet),
            artwork(15, "The Japanese Footbridge", 1899, "A bridge over the lily pond", &monet),
            artwork(16, "The Two Fridas", 1939, "Double self-portrait", &kahlo),
            artwork(17, "Self-Portrait with Thorn Necklace", 1940, "Portrait with a hummingbird", &kahlo),
            artwork(18, "The Wounded Deer", 1946, "A deer pierced by arrows", &kahlo),
        ];

        let exhibitions = vec![
            ExhibitionDocument {
                id: object_id(21),
                name: "Floating World".to_string(),
                images: vec![
                    Image::new("https://img.example/floating/poster.jpg").with_size(1600.0, 900.0),
                    Image::new("https://img.example/floating/card.jpg").with_size(400.0, 300.0),
                ],
                artists: vec![hokusai.id],
                artworks: vec![object_id(11), object_id(12)],
            },
            ExhibitionDocument {
                id: object_id(22),
                name: "Gardens".to_string(),
                images: Vec::new(),
                artists: vec![monet.id, kahlo.id],
                artworks: vec![object_id(13), object_id(14), object_id(15), object_id(16)],
            },
        ];

        Catalog {
            artists: vec![hokusai, monet, kahlo],
            artworks,
            exhibitions,
        }
    }

    /// Load `catalog` into `db` through the entity stores and build indexes.
    pub async fn seed(db: Arc<dyn DocumentStore>, catalog: &Catalog) -> StoreResult<()> {
        ArtistStore::new(db.clone())
            .insert_many(catalog.artists.clone())
            .await?;
        let artworks = ArtworkStore::new(db.clone());
        artworks.insert_many(catalog.artworks.clone()).await?;
        artworks.ensure_indexes().await?;
        ExhibitionStore::new(db)
            .insert_documents(catalog.exhibitions.clone())
            .await?;
        Ok(())
    }

    /// In-memory store holding [`sample_catalog`].
    pub async fn seeded_memory_store() -> Arc<MemoryDocumentStore> {
        let db = Arc::new(MemoryDocumentStore::new());
        seed(db.clone(), &sample_catalog())
            .await
            .expect("seeding the sample catalog");
        db
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for store results and catalog invariants.

    use super::*;

    /// Assert that a StoreResult is a NotFound error for `entity`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &StoreResult<T>, entity: EntityKind) {
        match result {
            Err(StoreError::NotFound { entity: e, .. }) => {
                assert_eq!(*e, entity, "Wrong entity in NotFound error");
            }
            other => panic!("Expected NotFound error for {}, got: {:?}", entity, other),
        }
    }

    /// Assert that a StoreResult is an InvalidIdentifier error.
    #[track_caller]
    pub fn assert_invalid_id<T: std::fmt::Debug>(result: &StoreResult<T>) {
        match result {
            Err(StoreError::InvalidIdentifier { .. }) => {}
            other => panic!("Expected InvalidIdentifier error, got: {:?}", other),
        }
    }

    /// Assert ascending width order with dimensionless images last.
    #[track_caller]
    pub fn assert_images_sorted(images: &[Image]) {
        for pair in images.windows(2) {
            assert_ne!(
                pair[0].cmp_by_width(&pair[1]),
                std::cmp::Ordering::Greater,
                "Images out of order: {:?}",
                images
            );
        }
    }

    /// Assert images on an artwork and on its embedded artist are sorted.
    #[track_caller]
    pub fn assert_artwork_images_sorted(artwork: &Artwork) {
        assert_images_sorted(&artwork.images);
        assert_images_sorted(&artwork.artist.images);
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::generators::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_catalog_is_consistent() {
        let catalog = sample_catalog();
        assert_eq!(catalog.artworks.len(), 8);
        for artwork in &catalog.artworks {
            assert!(catalog.artists.iter().any(|a| a.id == artwork.artist.id));
        }
        for exhibition in &catalog.exhibitions {
            for id in &exhibition.artworks {
                assert!(catalog.artworks.iter().any(|a| a.id == *id));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_generated_limit_configs_validate(config in arb_limit_config()) {
            prop_assert!(config.validate().is_ok());
        }
    }
}

//! Property tests for entity store reads and cache key shapes.

use std::sync::Arc;

use arthouse_core::{Artist, EntityKind, Image, ObjectId};
use arthouse_storage::{ArtistStore, CacheKey, MemoryDocumentStore};
use arthouse_test_utils::assertions::{assert_images_sorted, assert_invalid_id, assert_not_found};
use arthouse_test_utils::generators::{arb_artist, arb_images, arb_object_id};
use proptest::prelude::*;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn prop_width_sort_is_ordered_and_keeps_every_image(images in arb_images()) {
        let mut sorted = images.clone();
        Image::sort_slice(&mut sorted);

        assert_images_sorted(&sorted);
        prop_assert_eq!(sorted.len(), images.len());
        for image in &images {
            prop_assert!(sorted.contains(image));
        }
    }

    #[test]
    fn prop_stored_artist_reads_back_with_sorted_images(
        artist in arb_artist(),
        other in arb_object_id(),
    ) {
        prop_assume!(other != artist.id);

        let (found, missing) = block_on(async {
            let store = ArtistStore::new(Arc::new(MemoryDocumentStore::new()));
            store.insert_many(vec![artist.clone()]).await.unwrap();
            let found = store.find_by_id(&artist.id.to_hex()).await.unwrap();
            let missing = store.find_by_id(&other.to_hex()).await;
            (found, missing)
        });

        assert_images_sorted(&found.images);
        let mut expected: Artist = artist;
        expected.sort_images();
        prop_assert_eq!(found, expected);
        assert_not_found(&missing, EntityKind::Artist);
    }

    #[test]
    fn prop_non_hex_ids_are_rejected_before_lookup(id in "[g-z]{24}|[0-9a-f]{1,23}") {
        let result = block_on(async {
            ArtistStore::new(Arc::new(MemoryDocumentStore::new()))
                .find_by_id(&id)
                .await
        });
        assert_invalid_id(&result);
    }

    #[test]
    fn prop_record_key_embeds_the_hex_id(id in arb_object_id()) {
        let key = CacheKey::record(EntityKind::Artwork, &id.to_hex());
        let hex = key.as_str().strip_prefix("artwork:").unwrap();
        prop_assert_eq!(ObjectId::parse(hex).unwrap(), id);
    }

    #[test]
    fn prop_related_key_separates_parent_and_query(
        parent in arb_object_id(),
        raw_query in "[a-z]{1,6}=[0-9]{1,3}(&[a-z]{1,6}=[0-9]{1,3}){0,2}",
    ) {
        let key = CacheKey::related(
            EntityKind::Exhibition,
            &parent.to_hex(),
            EntityKind::Artist,
            &raw_query,
        );
        let (path, query) = key.as_str().split_once('?').unwrap();
        prop_assert_eq!(query, raw_query.as_str());
        prop_assert_eq!(path, format!("exhibition:{}:artist", parent.to_hex()));
    }
}

//! Property tests for query builders and image ordering.

use arthouse_core::query::{parse_int, parse_sort};
use arthouse_core::{
    ArtistQuery, ArtworkQuery, ExhibitionQuery, Image, LimitConfig, QueryParams, QuerySpec,
    SortDirection, Stage,
};
use proptest::prelude::*;

fn limits() -> LimitConfig {
    LimitConfig::new(15, 1, 100)
}

fn image_strategy() -> impl Strategy<Value = Image> {
    (proptest::option::of(0u32..2000), "[a-z]{1,8}").prop_map(|(width, url)| Image {
        height: None,
        width: width.map(f64::from),
        url,
    })
}

proptest! {
    #[test]
    fn prop_sorted_images_are_ascending_with_missing_last(
        mut images in proptest::collection::vec(image_strategy(), 0..20)
    ) {
        let before = images.len();
        Image::sort_slice(&mut images);
        prop_assert_eq!(images.len(), before);

        let first_missing = images.iter().position(|i| i.width.is_none()).unwrap_or(images.len());
        prop_assert!(images[first_missing..].iter().all(|i| i.width.is_none()));
        for pair in images[..first_missing].windows(2) {
            prop_assert!(pair[0].width <= pair[1].width);
        }
    }

    #[test]
    fn prop_image_sort_is_stable(widths in proptest::collection::vec(proptest::option::of(0u32..4), 0..20)) {
        let mut images: Vec<Image> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| Image { height: None, width: w.map(f64::from), url: i.to_string() })
            .collect();
        Image::sort_slice(&mut images);
        for pair in images.windows(2) {
            if pair[0].width == pair[1].width {
                let a: usize = pair[0].url.parse().unwrap();
                let b: usize = pair[1].url.parse().unwrap();
                prop_assert!(a < b);
            }
        }
    }

    #[test]
    fn prop_artwork_limit_policy(value in -1000i64..1000) {
        let mut query = ArtworkQuery::new(limits());
        query.set_limit(value);
        let expected = if value < 1 { 15 } else if value > 100 { 100 } else { value };
        prop_assert_eq!(query.limit(), expected);
    }

    #[test]
    fn prop_grouped_digits_parse_like_plain_digits(value in 0u64..10_000_000, negative in any::<bool>()) {
        let plain = value.to_string();
        let mut grouped = String::new();
        for (i, digit) in plain.chars().enumerate() {
            if i > 0 && (plain.len() - i) % 3 == 0 {
                grouped.push('_');
            }
            grouped.push(digit);
        }
        let sign = if negative { "-" } else { "" };
        let expected = if negative { -(value as i64) } else { value as i64 };
        prop_assert_eq!(parse_int(&format!("{}{}", sign, grouped)), Some(expected));

        let query = ArtworkQuery::from_params(&QueryParams::parse(&format!("limit={}", grouped)), limits());
        let clamped = if value < 1 { 15 } else if value > 100 { 100 } else { value as i64 };
        prop_assert_eq!(query.limit(), clamped);
    }

    #[test]
    fn prop_artist_and_exhibition_reset_out_of_range(value in -1000i64..1000) {
        let expected = if (1..=100).contains(&value) { value } else { 15 };

        let mut artist = ArtistQuery::new(limits());
        artist.set_limit(value);
        prop_assert_eq!(artist.limit(), expected);

        let mut exhibition = ExhibitionQuery::new(limits());
        exhibition.set_limit(value);
        prop_assert_eq!(exhibition.limit(), expected);
    }

    #[test]
    fn prop_set_limit_is_idempotent(value in -1000i64..1000) {
        let mut query = ArtworkQuery::new(limits());
        query.set_limit(value);
        let once = query.limit();
        query.set_limit(once);
        prop_assert_eq!(query.limit(), once);
    }

    #[test]
    fn prop_skip_only_applies_positive_values(value in -1000i64..1000) {
        let mut query = ArtistQuery::new(limits());
        query.set_skip(value);
        prop_assert_eq!(query.skip(), value.max(0));
        prop_assert_eq!(query.find_options().skip, (value > 0).then_some(value as u64));
    }

    #[test]
    fn prop_pipeline_always_ends_with_limit(raw in "[a-z=&:0-9]{0,40}") {
        let params = QueryParams::parse(&raw);
        let pipeline = ArtworkQuery::from_params(&params, limits()).pipeline();
        prop_assert!(matches!(pipeline.last(), Some(Stage::Limit(_))));
        prop_assert!(pipeline.len() <= 4);
    }

    #[test]
    fn prop_parse_sort_accepts_only_asc_or_desc(field in "[a-z]{1,10}", direction in "[a-z]{0,5}") {
        let parsed = parse_sort(&format!("{}:{}", field, direction));
        match direction.as_str() {
            "asc" => prop_assert_eq!(parsed, Some((field, SortDirection::Ascending))),
            "desc" => prop_assert_eq!(parsed, Some((field, SortDirection::Descending))),
            _ => prop_assert_eq!(parsed, None),
        }
    }
}

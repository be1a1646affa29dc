//! Property tests for candidate normalization.

use proptest::prelude::*;

use crate::core::books::candidate::{ISBN_COVER_BASE, PLACEHOLDER_COVER_BASE};
use crate::core::books::volume::{ISBN_10, ISBN_13};
use crate::core::books::{Candidate, ImageLinks, IndustryIdentifier, RawVolume, VolumeInfo};

fn isbn10() -> impl Strategy<Value = String> {
    "[0-9]{9}[0-9X]"
}

fn isbn13() -> impl Strategy<Value = String> {
    "97[89][0-9]{10}"
}

fn identifiers() -> impl Strategy<Value = (Vec<IndustryIdentifier>, Option<String>, Option<String>)> {
    (
        proptest::option::of(isbn10()),
        proptest::option::of(isbn13()),
        any::<bool>(),
    )
        .prop_map(|(ten, thirteen, ten_first)| {
            let mut ids = Vec::new();
            let a = ten.clone().map(|i| IndustryIdentifier::new(ISBN_10, i));
            let b = thirteen.clone().map(|i| IndustryIdentifier::new(ISBN_13, i));
            let (first, second) = if ten_first { (a, b) } else { (b, a) };
            ids.extend(first);
            ids.push(IndustryIdentifier::new("OTHER", "OCLC:1"));
            ids.extend(second);
            (ids, ten, thirteen)
        })
}

fn raw(
    title: Option<String>,
    authors: Vec<String>,
    thumbnail: Option<String>,
    ids: Vec<IndustryIdentifier>,
) -> RawVolume {
    RawVolume {
        id: "prop".into(),
        volume_info: VolumeInfo {
            title,
            authors,
            page_count: None,
            image_links: thumbnail.map(|t| ImageLinks {
                thumbnail: Some(t),
                small_thumbnail: None,
            }),
            industry_identifiers: ids,
        },
    }
}

proptest! {
    #[test]
    fn isbn13_wins_over_isbn10((ids, ten, thirteen) in identifiers()) {
        let c = Candidate::from_raw(raw(None, vec![], None, ids), "q");
        let expected = thirteen.or(ten);
        prop_assert_eq!(c.isbn, expected);
    }

    #[test]
    fn cover_url_follows_fallback_order(
        title in proptest::option::of("[A-Za-z ]{0,20}"),
        thumbnail in proptest::option::of("https://img\\.example/[a-z]{1,8}\\.jpg"),
        (ids, ten, thirteen) in identifiers(),
        query in "[a-z ]{0,12}",
    ) {
        let c = Candidate::from_raw(raw(title, vec![], thumbnail.clone(), ids), &query);
        prop_assert!(!c.cover_url.is_empty());

        match (thumbnail, thirteen.or(ten)) {
            (Some(url), _) => prop_assert_eq!(c.cover_url, url),
            (None, Some(isbn)) => {
                prop_assert!(c.cover_url.starts_with(ISBN_COVER_BASE));
                prop_assert!(c.cover_url.contains(&isbn));
            }
            (None, None) => prop_assert!(c.cover_url.starts_with(PLACEHOLDER_COVER_BASE)),
        }
    }

    #[test]
    fn label_is_never_empty(
        title in proptest::option::of("\\PC{0,20}"),
        authors in proptest::collection::vec("\\PC{0,10}", 0..3),
    ) {
        let c = Candidate::from_raw(raw(title, authors, None, vec![]), "q");
        prop_assert!(!c.label().trim().is_empty());
    }

    #[test]
    fn blank_authors_are_dropped(authors in proptest::collection::vec("[ ]{0,3}", 0..4)) {
        let c = Candidate::from_raw(raw(Some("T".into()), authors, None, vec![]), "q");
        prop_assert!(c.authors.is_empty());
        prop_assert_eq!(c.authors_joined(), "");
    }
}

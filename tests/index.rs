//! Structural invariants and round-trip laws over [`InvertedIndex`] (spec
//! invariants 1-3 and the merge round-trip laws).

use proptest::prelude::*;
use tfindex::InvertedIndex;

fn index_from(docs: &[(&str, &str)]) -> InvertedIndex {
    let mut idx = InvertedIndex::new();
    for (stems, location) in docs {
        let stems: Vec<String> = stems.split_whitespace().map(str::to_string).collect();
        idx.add_all(stems, location);
    }
    idx
}

fn assert_well_formed(idx: &InvertedIndex) {
    for (_, locations) in idx.view_postings() {
        for (location, positions) in locations {
            assert!(!positions.is_empty());
            let mut prev = 0u32;
            for &p in positions {
                assert!(p > prev, "positions must be strictly ascending");
                prev = p;
            }
            let length = idx.length_of(location).expect("location must have a length");
            assert!(*positions.iter().last().unwrap() <= length);
        }
    }
}

#[test]
fn single_file_produces_well_formed_index() {
    let idx = index_from(&[("hello world hello", "tiny.txt")]);
    assert_well_formed(&idx);
    assert_eq!(idx.length_of("tiny.txt"), Some(3));
}

#[test]
fn merge_identity_law() {
    let mut a = index_from(&[("x y", "a.txt")]);
    let snapshot = a.clone();
    a.merge(&InvertedIndex::new());
    assert_eq!(a.view_postings(), snapshot.view_postings());
    assert_eq!(a.view_lengths(), snapshot.view_lengths());
}

#[test]
fn clear_then_build_twice_equals_clear_then_build_once() {
    let mut once = InvertedIndex::new();
    once.add_all(vec!["x".to_string()], "a.txt");

    let mut twice = InvertedIndex::new();
    twice.add_all(vec!["x".to_string()], "a.txt");
    twice.clear();
    twice.add_all(vec!["x".to_string()], "a.txt");

    assert_eq!(once.view_postings(), twice.view_postings());
    assert_eq!(once.view_lengths(), twice.view_lengths());
}

#[test]
fn merge_is_associative_for_three_shards() {
    let a = index_from(&[("x y", "a.txt")]);
    let b = index_from(&[("y z", "b.txt")]);
    let c = index_from(&[("x z", "c.txt")]);

    let mut left = a.clone();
    left.merge(&b);
    left.merge(&c);

    let mut right = a.clone();
    let mut bc = b.clone();
    bc.merge(&c);
    right.merge(&bc);

    assert_eq!(left.view_postings(), right.view_postings());
    assert_eq!(left.view_lengths(), right.view_lengths());
}

#[test]
fn every_postings_location_has_a_recorded_length() {
    let idx = index_from(&[("a b c", "a.txt"), ("d e", "b.txt")]);
    for locations in idx.view_postings().values() {
        for location in locations.keys() {
            assert!(idx.contains_location(location));
        }
    }
}

#[test]
fn symlinked_and_trailing_whitespace_documents_tokenise_cleanly() {
    let idx = index_from(&[("hello world   ", "trailing.txt")]);
    assert_eq!(idx.length_of("trailing.txt"), Some(2));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Merging any index with itself is idempotent for postings (set union)
    /// and a no-op for lengths (replacement-by-larger of an identical value).
    #[test]
    fn prop_merge_with_self_is_idempotent(stems in proptest::collection::vec("[a-z]{1,6}", 0..10)) {
        let mut idx = InvertedIndex::new();
        idx.add_all(stems, "doc.txt");
        let before = idx.clone();
        idx.merge(&before.clone());
        prop_assert_eq!(idx.view_postings(), before.view_postings());
        prop_assert_eq!(idx.view_lengths(), before.view_lengths());
    }

    /// Every position recorded by `add_all` never exceeds the location's length.
    #[test]
    fn prop_positions_never_exceed_length(stems in proptest::collection::vec("[a-z]{1,4}", 1..20)) {
        let mut idx = InvertedIndex::new();
        idx.add_all(stems, "doc.txt");
        let length = idx.length_of("doc.txt").unwrap();
        for locations in idx.view_postings().values() {
            if let Some(positions) = locations.get("doc.txt") {
                for &p in positions {
                    prop_assert!(p <= length);
                }
            }
        }
    }
}

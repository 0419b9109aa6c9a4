// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Exact and prefix-term ranking over an [`InvertedIndex`](crate::index::InvertedIndex).
//!
//! A result row materialises its score at construction time from the
//! matching location's recorded length, rather than holding a reference
//! back into the index to recompute it lazily - there is no back-edge for
//! a later mutation to silently invalidate.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::index::InvertedIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub where_: String,
    pub count: u32,
    pub score: f64,
}

impl SearchResult {
    fn new(where_: String, count: u32, length: u32) -> Self {
        let score = if length == 0 {
            0.0
        } else {
            f64::from(count) / f64::from(length)
        };
        Self {
            where_,
            count,
            score,
        }
    }

    /// Add more matches to this row's count, recomputing the score from
    /// the same length used at construction. Count and score are always
    /// updated together through this one mutator.
    fn accumulate(&mut self, extra: u32, length: u32) {
        self.count += extra;
        self.score = if length == 0 {
            0.0
        } else {
            f64::from(self.count) / f64::from(length)
        };
    }
}

/// Total order over results: larger score first, then larger count, then
/// caseless-ascending location. `f64::total_cmp` is used even though
/// scores here are never NaN (both operands of the division are
/// non-negative integers), so the ordering is a true total order at every
/// representable value, including the equality boundary.
fn cmp_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.count.cmp(&a.count))
        .then_with(|| a.where_.to_lowercase().cmp(&b.where_.to_lowercase()))
}

/// Exact-term or prefix-term search over `index`, accumulating one row per
/// matching location. A single term contributes its positions once per
/// location; distinct terms matching the same location sum their counts
/// (total query-set term frequency, normalised by that location's length).
pub fn search(index: &InvertedIndex, stems: &BTreeSet<String>, partial: bool) -> Vec<SearchResult> {
    let mut rows: BTreeMap<String, SearchResult> = BTreeMap::new();

    let mut accumulate_term = |locations: &BTreeMap<String, BTreeSet<u32>>| {
        for (location, positions) in locations {
            let length = index.length_of(location).unwrap_or(0);
            let count = positions.len() as u32;
            rows.entry(location.clone())
                .and_modify(|row| row.accumulate(count, length))
                .or_insert_with(|| SearchResult::new(location.clone(), count, length));
        }
    };

    if partial {
        // Two distinct query stems can both prefix-match the same posting
        // term (e.g. "form" and "format" both match "format"); collect the
        // matched terms into a set first so each one is only accumulated
        // once, regardless of how many query stems matched it.
        let mut matched_terms: BTreeSet<&String> = BTreeSet::new();
        for stem in stems {
            for (term, _) in prefix_range(index, stem) {
                matched_terms.insert(term);
            }
        }
        for term in matched_terms {
            if let Some(locations) = index.view_postings().get(term) {
                accumulate_term(locations);
            }
        }
    } else {
        for stem in stems {
            if let Some(locations) = index.view_postings().get(stem) {
                accumulate_term(locations);
            }
        }
    }

    let mut results: Vec<SearchResult> = rows.into_values().collect();
    results.sort_by(cmp_results);
    results
}

/// Every `(term, locations)` entry whose term starts with `prefix`, via a
/// contiguous `BTreeMap` range rather than a full scan: `postings` is
/// ordered, so all keys with a given prefix form one contiguous run
/// starting at `prefix` itself.
fn prefix_range<'a>(
    index: &'a InvertedIndex,
    prefix: &str,
) -> impl Iterator<Item = (&'a String, &'a BTreeMap<String, BTreeSet<u32>>)> {
    index
        .view_postings()
        .range(prefix.to_string()..)
        .take_while(move |(term, _)| term.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(entries: &[(&str, &str, &[u32])]) -> InvertedIndex {
        let mut idx = InvertedIndex::new();
        for (term, loc, positions) in entries {
            for &p in *positions {
                idx.add(term, loc, p);
            }
        }
        idx
    }

    #[test]
    fn exact_search_scores_by_count_over_length() {
        let mut idx = build(&[("hello", "tiny.txt", &[1, 3]), ("world", "tiny.txt", &[2])]);
        idx.add_all(
            vec!["hello".to_string(), "world".to_string(), "hello".to_string()],
            "tiny.txt",
        );
        let results = search(&idx, &BTreeSet::from(["hello".to_string()]), false);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].where_, "tiny.txt");
        assert_eq!(results[0].count, 2);
        assert!((results[0].score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn prefix_search_spans_multiple_stems() {
        let mut idx = InvertedIndex::new();
        idx.add_all(
            vec!["hello".to_string(), "world".to_string(), "hello".to_string()],
            "tiny.txt",
        );
        let results = search(&idx, &BTreeSet::from(["he".to_string()]), true);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].count, 2);
    }

    #[test]
    fn distinct_terms_sum_into_one_row() {
        let mut idx = InvertedIndex::new();
        idx.add("cat", "a.txt", 1);
        idx.add("cats", "a.txt", 2);
        idx.add_all(vec!["x".to_string(), "x".to_string()], "a.txt");
        // Force length separately since add() alone doesn't set it.
        let results = search(
            &idx,
            &BTreeSet::from(["cat".to_string(), "cats".to_string()]),
            false,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].count, 2);
    }

    #[test]
    fn ties_break_on_caseless_location() {
        let mut idx = InvertedIndex::new();
        idx.add_all(vec!["x".to_string(), "x".to_string()], "A.txt");
        idx.add_all(vec!["x".to_string(), "x".to_string()], "b.txt");
        let results = search(&idx, &BTreeSet::from(["x".to_string()]), false);
        assert_eq!(results[0].where_, "A.txt");
        assert_eq!(results[1].where_, "b.txt");
    }

    #[test]
    fn no_match_returns_empty() {
        let idx = build(&[("hello", "a.txt", &[1])]);
        assert!(search(&idx, &BTreeSet::from(["nope".to_string()]), false).is_empty());
    }

    #[test]
    fn overlapping_prefix_stems_do_not_double_count_a_shared_term() {
        let mut idx = InvertedIndex::new();
        idx.add_all(vec!["format".to_string()], "a.txt");
        let results = search(
            &idx,
            &BTreeSet::from(["form".to_string(), "format".to_string()]),
            true,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].count, 1);
    }

    #[test]
    fn at_most_one_entry_per_location() {
        let mut idx = InvertedIndex::new();
        idx.add_all(
            vec!["cat".to_string(), "car".to_string(), "cab".to_string()],
            "a.txt",
        );
        let results = search(&idx, &BTreeSet::from(["ca".to_string()]), true);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].count, 3);
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text normalisation: whitespace splitting, diacritic stripping, and
//! Snowball-English stemming.
//!
//! The only guarantee downstream code depends on is *deterministic stems*:
//! two inputs that reduce to the same multiset of stems produce the same
//! `QueryKey` (see `query.rs`). Everything else here is plumbing.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Reduce one whitespace-delimited fragment to its stem, or `None` if
/// nothing alphabetic survives (e.g. the fragment was pure punctuation).
fn stem_fragment(fragment: &str, stemmer: &Stemmer) -> Option<String> {
    let cleaned: String = fragment
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(stemmer.stem(&cleaned).into_owned())
    }
}

/// Tokenise a line into stems, in document order, one per
/// whitespace-delimited fragment that contains at least one letter.
pub fn parse(line: &str) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    line.split_whitespace()
        .filter_map(|fragment| stem_fragment(fragment, &stemmer))
        .collect()
}

/// Tokenise a whole document into `(stem, position)` pairs, 1-based,
/// positions counted over the stems actually produced (skipped fragments
/// do not consume a position).
pub fn parse_with_positions(text: &str) -> Vec<(String, u32)> {
    let stemmer = Stemmer::create(Algorithm::English);
    text.split_whitespace()
        .filter_map(|fragment| stem_fragment(fragment, &stemmer))
        .enumerate()
        .map(|(i, stem)| (stem, i as u32 + 1))
        .collect()
}

/// The sorted, deduplicated set of stems in a line - used to build a
/// `QueryKey`.
pub fn unique_stems(line: &str) -> BTreeSet<String> {
    parse(line).into_iter().collect()
}

/// Space-joined concatenation of an already-computed stem set - the
/// canonical identifier results are memoised under.
pub fn key_of(stems: &BTreeSet<String>) -> String {
    stems.iter().cloned().collect::<Vec<_>>().join(" ")
}

/// Space-joined sorted unique stems of a query line - the canonical
/// identifier results are memoised under. Empty string means "skip".
pub fn query_key(line: &str) -> String {
    key_of(&unique_stems(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_stems() {
        assert_eq!(parse("hello world hello"), vec!["hello", "world", "hello"]);
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(parse("café"), vec!["cafe"]);
        assert_eq!(parse("naïve"), vec!["naiv"]);
    }

    #[test]
    fn drops_punctuation_only_fragments() {
        assert_eq!(parse("hello -- world"), vec!["hello", "world"]);
    }

    #[test]
    fn positions_are_one_based_and_skip_nothing() {
        let result = parse_with_positions("hello world hello");
        assert_eq!(
            result,
            vec![
                ("hello".to_string(), 1),
                ("world".to_string(), 2),
                ("hello".to_string(), 3),
            ]
        );
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse("!!! ---").is_empty());
    }

    #[test]
    fn query_key_is_sorted_and_deduped() {
        assert_eq!(query_key("world hello world"), "hello world");
    }

    #[test]
    fn query_key_idempotent() {
        let first = query_key("Hello World hello");
        let second = query_key(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn query_key_empty_for_whitespace() {
        assert_eq!(query_key("   "), "");
    }
}

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A hand-rolled, deterministic JSON pretty-printer.
//!
//! This is not `serde_json::to_writer` on purpose: key order here is the
//! natural order of the index's own maps (part of the contract, not an
//! implementation detail serde's `Value` would preserve without
//! `preserve_order`), and scores need a fixed 8-decimal-place
//! representation serde_json's default float formatter does not produce.
//! Test fixtures compare this output byte-for-byte, so every shape below
//! is written by hand rather than composed from a generic serializer.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::index::InvertedIndex;
use crate::search::SearchResult;

/// Escape `"` and `\`; inputs are otherwise pre-filtered to alphanumerics
/// and path characters, but locations are user-controlled paths/URLs, so
/// this is not skippable.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}

fn write_quoted<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    write!(w, "\"{}\"", escape(s))
}

/// Write the index in its canonical shape: an object keyed by term
/// (sorted), each value an object keyed by location (sorted), each value
/// a JSON array of ascending positions.
pub fn write_index<W: Write>(w: &mut W, index: &InvertedIndex) -> io::Result<()> {
    let postings = index.view_postings();
    writeln!(w, "{{")?;
    let term_count = postings.len();
    for (ti, (term, locations)) in postings.iter().enumerate() {
        write!(w, "  ")?;
        write_quoted(w, term)?;
        writeln!(w, ": {{")?;

        let loc_count = locations.len();
        for (li, (location, positions)) in locations.iter().enumerate() {
            write!(w, "    ")?;
            write_quoted(w, location)?;
            write!(w, ": [")?;
            for (pi, position) in positions.iter().enumerate() {
                if pi > 0 {
                    write!(w, ",")?;
                }
                write!(w, "{position}")?;
            }
            write!(w, "]")?;
            if li + 1 < loc_count {
                writeln!(w, ",")?;
            } else {
                writeln!(w)?;
            }
        }

        write!(w, "  }}")?;
        if ti + 1 < term_count {
            writeln!(w, ",")?;
        } else {
            writeln!(w)?;
        }
    }
    writeln!(w, "}}")
}

/// Write the per-location token-count table: an object keyed by location
/// (sorted) with integer values.
pub fn write_counts<W: Write>(w: &mut W, index: &InvertedIndex) -> io::Result<()> {
    let lengths = index.view_lengths();
    writeln!(w, "{{")?;
    let count = lengths.len();
    for (i, (location, length)) in lengths.iter().enumerate() {
        write!(w, "  ")?;
        write_quoted(w, location)?;
        write!(w, ": {length}")?;
        if i + 1 < count {
            writeln!(w, ",")?;
        } else {
            writeln!(w)?;
        }
    }
    writeln!(w, "}}")
}

/// Write search results: an object keyed by QueryKey (sorted), each value
/// an array of result objects with fields `count`, `score` (fixed
/// 8-decimal places), `where`, in that order.
pub fn write_results<W: Write>(
    w: &mut W,
    results: &BTreeMap<String, Vec<SearchResult>>,
) -> io::Result<()> {
    writeln!(w, "{{")?;
    let key_count = results.len();
    for (ki, (query_key, rows)) in results.iter().enumerate() {
        write!(w, "  ")?;
        write_quoted(w, query_key)?;
        writeln!(w, ": [")?;

        let row_count = rows.len();
        for (ri, row) in rows.iter().enumerate() {
            writeln!(w, "    {{")?;
            writeln!(w, "      \"count\": {},", row.count)?;
            writeln!(w, "      \"score\": {:.8},", row.score)?;
            write!(w, "      \"where\": ")?;
            write_quoted(w, &row.where_)?;
            writeln!(w)?;
            write!(w, "    }}")?;
            if ri + 1 < row_count {
                writeln!(w, ",")?;
            } else {
                writeln!(w)?;
            }
        }

        write!(w, "  ]")?;
        if ki + 1 < key_count {
            writeln!(w, ",")?;
        } else {
            writeln!(w)?;
        }
    }
    writeln!(w, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_json_matches_canonical_shape() {
        let mut idx = InvertedIndex::new();
        idx.add_all(
            vec!["hello".to_string(), "world".to_string(), "hello".to_string()],
            "tiny.txt",
        );
        let mut out = Vec::new();
        write_index(&mut out, &idx).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "{\n  \"hello\": {\n    \"tiny.txt\": [1,3]\n  },\n  \"world\": {\n    \"tiny.txt\": [2]\n  }\n}\n"
        );
    }

    #[test]
    fn counts_json_matches_canonical_shape() {
        let mut idx = InvertedIndex::new();
        idx.add_all(
            vec!["hello".to_string(), "world".to_string(), "hello".to_string()],
            "tiny.txt",
        );
        let mut out = Vec::new();
        write_counts(&mut out, &idx).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n  \"tiny.txt\": 3\n}\n"
        );
    }

    #[test]
    fn results_json_has_fixed_eight_decimal_score() {
        let mut results = BTreeMap::new();
        results.insert(
            "hello".to_string(),
            vec![SearchResult {
                where_: "tiny.txt".to_string(),
                count: 2,
                score: 2.0 / 3.0,
            }],
        );
        let mut out = Vec::new();
        write_results(&mut out, &results).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"score\": 0.66666667"));
        assert!(text.contains("\"count\": 2"));
        assert!(text.contains("\"where\": \"tiny.txt\""));
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_locations() {
        let mut idx = InvertedIndex::new();
        idx.add_all(vec!["x".to_string()], "weird\"path\\name.txt");
        let mut out = Vec::new();
        write_index(&mut out, &idx).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("weird\\\"path\\\\name.txt"));
    }

    #[test]
    fn empty_index_emits_empty_object() {
        let idx = InvertedIndex::new();
        let mut out = Vec::new();
        write_index(&mut out, &idx).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n}\n");
    }
}

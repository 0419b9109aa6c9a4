// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Debug-only invariant checks for the inverted index.
//!
//! These mirror the index invariants: non-empty, strictly-ascending position
//! sets, and a `lengths` entry covering every posted location. They compile
//! to nothing in release builds; treat a tripped assertion here as a bug in
//! `index.rs`, not a legitimate corpus shape.

use std::collections::{BTreeMap, BTreeSet};

pub fn check_position_set(positions: &BTreeSet<u32>) {
    debug_assert!(!positions.is_empty(), "posting with empty position set");
    debug_assert!(
        positions.iter().all(|&p| p >= 1),
        "position must be 1-based"
    );
}

pub fn check_location_within_length(loc: &str, positions: &BTreeSet<u32>, length: u32) {
    if let Some(&max) = positions.iter().next_back() {
        debug_assert!(
            max <= length,
            "position {max} for {loc} exceeds recorded length {length}"
        );
    }
}

pub fn check_lengths_cover_postings(
    postings: &BTreeMap<String, BTreeMap<String, BTreeSet<u32>>>,
    lengths: &BTreeMap<String, u32>,
) {
    for locations in postings.values() {
        for loc in locations.keys() {
            debug_assert!(
                lengths.contains_key(loc),
                "location {loc} has postings but no recorded length"
            );
        }
    }
}

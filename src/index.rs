// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The positional inverted index.
//!
//! Two maps sharing a lifetime: `postings` (term -> location -> sorted
//! positions) and `lengths` (location -> total token count at ingest time,
//! the denominator of a search score). Both are `BTreeMap`/`BTreeSet`
//! rather than hash maps on purpose - iteration order over terms,
//! locations, and positions is part of the contract, since it determines
//! JSON emission byte-for-byte (see `json.rs`).
//!
//! An `InvertedIndex` is unaware of concurrency; `shared.rs` wraps one for
//! multi-threaded access. Per-task "local" indices built during ingestion
//! are plain, lock-free instances of this same type.

use std::collections::{BTreeMap, BTreeSet};

use crate::contracts;
use crate::search::{self, SearchResult};

/// term -> location -> sorted positions
type Postings = BTreeMap<String, BTreeMap<String, BTreeSet<u32>>>;

#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: Postings,
    lengths: BTreeMap<String, u32>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single occurrence. Does **not** touch `lengths`; callers
    /// that build a location from scratch should use [`add_all`] instead,
    /// which also records the location's length.
    pub fn add(&mut self, stem: &str, location: &str, position: u32) {
        debug_assert!(!stem.is_empty(), "stem must be non-empty");
        debug_assert!(position >= 1, "position is 1-based");

        self.postings
            .entry(stem.to_string())
            .or_default()
            .entry(location.to_string())
            .or_default()
            .insert(position);

        #[cfg(debug_assertions)]
        if let Some(positions) = self.postings.get(stem).and_then(|locs| locs.get(location)) {
            contracts::check_position_set(positions);
        }
    }

    /// Set `lengths[location] = stems.len()` (overwriting any prior value)
    /// then add every `(stems[i], location, i + 1)`. A no-op for an empty
    /// `stems`.
    pub fn add_all<I>(&mut self, stems: I, location: &str)
    where
        I: IntoIterator<Item = String>,
    {
        let stems: Vec<String> = stems.into_iter().collect();
        if stems.is_empty() {
            return;
        }

        self.lengths
            .insert(location.to_string(), stems.len() as u32);

        for (i, stem) in stems.into_iter().enumerate() {
            self.add(&stem, location, i as u32 + 1);
        }

        #[cfg(debug_assertions)]
        {
            let length = self.lengths[location];
            for locations in self.postings.values() {
                if let Some(positions) = locations.get(location) {
                    contracts::check_location_within_length(location, positions, length);
                }
            }
        }
    }

    /// Union another index's postings into this one. `lengths[loc]` is
    /// inserted when absent on this side; when present on both sides the
    /// **larger** value wins (replacement-by-larger - see `DESIGN.md` for
    /// why this rule and not addition or plain overwrite was chosen).
    pub fn merge(&mut self, other: &InvertedIndex) {
        for (stem, locations) in &other.postings {
            let entry = self.postings.entry(stem.clone()).or_default();
            for (location, positions) in locations {
                entry
                    .entry(location.clone())
                    .or_default()
                    .extend(positions.iter().copied());
            }
        }

        for (location, &other_len) in &other.lengths {
            self.lengths
                .entry(location.clone())
                .and_modify(|len| {
                    if other_len > *len {
                        *len = other_len;
                    }
                })
                .or_insert(other_len);
        }

        #[cfg(debug_assertions)]
        contracts::check_lengths_cover_postings(&self.postings, &self.lengths);
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    pub fn contains_location(&self, location: &str) -> bool {
        self.lengths.contains_key(location)
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn location_count(&self) -> usize {
        self.lengths.len()
    }

    pub fn length_of(&self, location: &str) -> Option<u32> {
        self.lengths.get(location).copied()
    }

    /// Read-only, natural-order view of the postings map.
    pub fn view_postings(&self) -> &Postings {
        &self.postings
    }

    /// Read-only, natural-order view of the per-location length table.
    pub fn view_lengths(&self) -> &BTreeMap<String, u32> {
        &self.lengths
    }

    pub fn search(&self, stems: &BTreeSet<String>, partial: bool) -> Vec<SearchResult> {
        search::search(self, stems, partial)
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.lengths.clear();
    }
}

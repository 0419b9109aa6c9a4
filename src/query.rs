// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Reads query lines, stems and deduplicates them into a `QueryKey`,
//! dispatches per-line search tasks, and memoises results.
//!
//! The memo is guarded by its own mutex, entirely separate from the
//! shared index's lock - a thread executing a search holds only the
//! index's read lock during the search itself and releases it before
//! taking the memo mutex to store the result. This crate's single
//! lock-ordering rule: **never** hold the memo mutex while acquiring the
//! index lock.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::normalize;
use crate::pool::WorkerPool;
use crate::search::SearchResult;
use crate::shared::SharedIndex;

type Memo = Mutex<BTreeMap<String, Vec<SearchResult>>>;

#[derive(Default)]
pub struct QueryProcessor {
    exact_memo: Memo,
    prefix_memo: Memo,
    /// Counts actual calls into `search.rs`, as opposed to memo hits.
    /// Exposed so tests can assert on memoisation (scenario 5 of the
    /// testable properties: a repeated query line searches exactly once).
    search_invocations: AtomicUsize,
}

impl QueryProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn memo(&self, partial: bool) -> &Memo {
        if partial {
            &self.prefix_memo
        } else {
            &self.exact_memo
        }
    }

    /// Normalise `line` to a `QueryKey`; on an empty key, return an empty
    /// result list without touching the memo or the index. On a memo
    /// hit, return the memoised list. Otherwise search under the index's
    /// read lock, release it, then store the result under the memo's own
    /// mutex.
    pub fn process_line(&self, line: &str, partial: bool, shared: &SharedIndex) -> Vec<SearchResult> {
        let stems = normalize::unique_stems(line);
        if stems.is_empty() {
            return Vec::new();
        }
        let key = normalize::key_of(&stems);

        if let Some(cached) = self.memo(partial).lock().get(&key) {
            return cached.clone();
        }

        let results = {
            let guard = shared.read();
            self.search_invocations.fetch_add(1, Ordering::Relaxed);
            guard.search(&stems, partial)
        };

        self.memo(partial).lock().insert(key, results.clone());
        results
    }

    /// Read `path` line by line and submit each non-empty raw line to
    /// `pool` as an independent `process_line` task. Blocks until every
    /// dispatched task has completed.
    pub fn process_file(
        self: &Arc<Self>,
        path: &Path,
        partial: bool,
        pool: &WorkerPool,
        shared: &SharedIndex,
    ) -> std::io::Result<()> {
        let text = fs::read_to_string(path)?;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let processor = Arc::clone(self);
            let shared = shared.clone();
            let line = line.to_string();
            pool.execute(move || {
                processor.process_line(&line, partial, &shared);
            });
        }
        pool.finish();
        Ok(())
    }

    /// A QueryKey-ordered snapshot of one mode's memo.
    pub fn results(&self, partial: bool) -> BTreeMap<String, Vec<SearchResult>> {
        self.memo(partial).lock().clone()
    }

    pub fn search_invocation_count(&self) -> usize {
        self.search_invocations.load(Ordering::Relaxed)
    }
}

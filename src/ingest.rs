// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Walks a directory tree and dispatches one indexing task per text file.
//!
//! Each task builds a task-local [`InvertedIndex`] (unshared, no lock) and
//! merges it into the shared index once, under the write lock. Building
//! locally and merging in bulk keeps the write-lock critical section to
//! just the merge, so normalisation and tokenisation - the expensive part
//! - run fully in parallel across files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::index::InvertedIndex;
use crate::normalize;
use crate::pool::WorkerPool;
use crate::shared::SharedIndex;

/// `.txt`/`.text`, case-insensitive - the only extensions the ingester
/// treats as corpus documents.
pub fn is_corpus_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("text"))
        .unwrap_or(false)
}

/// Recursively collect corpus files under `root`, sorted lexicographically
/// by path - required so a single-threaded build and a parallel build
/// produce byte-identical output (scenario 4 of the testable properties).
fn collect_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                stack.push(path);
            } else if file_type.is_file() && is_corpus_file(&path) {
                files.push(path);
            } else if file_type.is_symlink() && is_corpus_file(&path) {
                // Follow the symlink once to check it targets a regular file;
                // symlinked directories are not pushed onto the walk stack,
                // so a cycle cannot recurse through them.
                if fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub files_indexed: usize,
    pub files_failed: usize,
}

/// Index every `.txt`/`.text` file under `root`, merging each file's
/// local index into `shared` as its task completes. Blocks until every
/// dispatched task has finished (calls `pool.finish()` internally).
pub fn ingest_corpus(
    root: &Path,
    pool: &WorkerPool,
    shared: &SharedIndex,
) -> std::io::Result<IngestReport> {
    let files = collect_files(root)?;
    let indexed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    #[cfg(feature = "progress")]
    let progress = build_progress_bar(files.len());

    for path in files {
        let shared = shared.clone();
        let indexed = Arc::clone(&indexed);
        let failed = Arc::clone(&failed);
        #[cfg(feature = "progress")]
        let progress = progress.clone();

        pool.execute(move || {
            match index_one_file(&path) {
                Ok(local) => {
                    shared.write().merge(&local);
                    indexed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    eprintln!("⚠️  failed to index {}: {e}", path.display());
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
            #[cfg(feature = "progress")]
            progress.inc(1);
        });
    }

    pool.finish();

    #[cfg(feature = "progress")]
    progress.finish_and_clear();

    Ok(IngestReport {
        files_indexed: indexed.load(Ordering::Relaxed),
        files_failed: failed.load(Ordering::Relaxed),
    })
}

fn index_one_file(path: &Path) -> std::io::Result<InvertedIndex> {
    let text = fs::read_to_string(path)?;
    let location = path.to_string_lossy().into_owned();
    let mut local = InvertedIndex::new();
    let stems: Vec<String> = normalize::parse_with_positions(&text)
        .into_iter()
        .map(|(stem, _)| stem)
        .collect();
    local.add_all(stems, &location);
    Ok(local)
}

#[cfg(feature = "progress")]
fn build_progress_bar(total: usize) -> ProgressBar {
    if total == 0 || !atty::is(atty::Stream::Stderr) {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("indexing {bar:40} {pos}/{len}") {
        bar.set_style(style);
    }
    bar
}

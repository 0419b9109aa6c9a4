// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types surfaced at the CLI/I/O boundary.
//!
//! Internal engine operations (`InvertedIndex::add`, `WorkerPool::execute`,
//! `QueryProcessor::process_line`, ...) do not return `Result` - per the
//! error-handling design, they have no caller-visible failure mode. Only
//! operations that touch the filesystem or network do.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid corpus root {path}: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },
}

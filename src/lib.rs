// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Concurrent positional inverted index and TF-ranked search engine.
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌─────────────┐
//! │ normalize   │──▶│  index    │──▶│  search     │
//! │ (stemming)  │   │ (postings)│   │ (ranking)   │
//! └────────────┘   └───────────┘   └─────────────┘
//!                        │                │
//!                        ▼                ▼
//!                 ┌────────────┐   ┌─────────────┐
//!                 │  shared    │   │   query     │
//!                 │ (rw lock)  │◀──│ (memoised)  │
//!                 └────────────┘   └─────────────┘
//!                        ▲                ▲
//!                        │                │
//!                 ┌────────────┐   ┌─────────────┐
//!                 │  ingest    │   │    pool     │
//!                 │ (corpus)   │   │ (workers)   │
//!                 └────────────┘   └─────────────┘
//!                        ▲
//!                        │
//!                 ┌────────────┐
//!                 │    web     │
//!                 │ (optional) │
//!                 └────────────┘
//! ```
//!
//! `index` holds the lock-free [`index::InvertedIndex`]; `shared` wraps one
//! behind a writer-preferring lock so `ingest`, `query`, and `web` can share
//! it across a [`pool::WorkerPool`]. `json` renders any of `index`'s or
//! `query`'s public state to the crate's canonical on-disk format.

pub mod cli;
pub mod contracts;
pub mod errors;
pub mod index;
pub mod ingest;
pub mod json;
pub mod normalize;
pub mod pool;
pub mod query;
pub mod search;
pub mod shared;

#[cfg(feature = "web")]
pub mod web;

pub use errors::IndexError;
pub use index::InvertedIndex;
pub use pool::WorkerPool;
pub use query::QueryProcessor;
pub use search::SearchResult;
pub use shared::SharedIndex;

// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A shared handle around [`InvertedIndex`] with writer-preferring
//! reader/writer semantics.
//!
//! Neither `std::sync::RwLock` nor `parking_lot::RwLock` documents writer
//! preference, and the index is read far more than it is written during a
//! search-heavy workload - without preference, a steady stream of readers
//! can starve a writer waiting to merge a just-finished ingest task
//! indefinitely. This hand-rolls the scheduling rule on top of
//! `parking_lot::{Mutex, Condvar}`: once a writer is waiting, newly
//! arriving readers block behind it, even if readers already hold the
//! lock when the writer starts waiting.
//!
//! `InvertedIndex` itself stays lock-free; only this wrapper knows about
//! concurrency, matching the "thread-safe X" collapse this crate
//! deliberately avoids (no separate "thread-safe index" type).

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

use crate::index::InvertedIndex;

struct State {
    readers: u32,
    writer: bool,
    waiting_writers: u32,
}

struct Inner {
    index: Mutex<InvertedIndex>,
    state: Mutex<State>,
    readers_ok: Condvar,
    writer_ok: Condvar,
}

/// A cheaply cloneable handle to one shared [`InvertedIndex`]. All clones
/// refer to the same underlying index and lock state.
#[derive(Clone)]
pub struct SharedIndex {
    inner: Arc<Inner>,
}

impl SharedIndex {
    pub fn new(index: InvertedIndex) -> Self {
        Self {
            inner: Arc::new(Inner {
                index: Mutex::new(index),
                state: Mutex::new(State {
                    readers: 0,
                    writer: false,
                    waiting_writers: 0,
                }),
                readers_ok: Condvar::new(),
                writer_ok: Condvar::new(),
            }),
        }
    }

    /// Acquire a shared (read) permit. Blocks while a writer holds the
    /// lock or while a writer is waiting for one.
    pub fn read(&self) -> ReadGuard<'_> {
        let mut state = self.inner.state.lock();
        while state.writer || state.waiting_writers > 0 {
            self.inner.readers_ok.wait(&mut state);
        }
        state.readers += 1;
        ReadGuard { shared: self }
    }

    /// Acquire an exclusive (write) permit. Blocks until no readers and no
    /// other writer hold the lock; marks itself as waiting first so later
    /// readers queue behind it.
    pub fn write(&self) -> WriteGuard<'_> {
        let mut state = self.inner.state.lock();
        state.waiting_writers += 1;
        while state.writer || state.readers > 0 {
            self.inner.writer_ok.wait(&mut state);
        }
        state.waiting_writers -= 1;
        state.writer = true;
        WriteGuard { shared: self }
    }

    fn release_read(&self) {
        let mut state = self.inner.state.lock();
        state.readers -= 1;
        if state.readers == 0 {
            // A waiting writer gets priority; only wake readers if none is waiting.
            self.inner.writer_ok.notify_one();
        }
    }

    fn release_write(&self) {
        let mut state = self.inner.state.lock();
        state.writer = false;
        if state.waiting_writers > 0 {
            self.inner.writer_ok.notify_one();
        } else {
            self.inner.readers_ok.notify_all();
        }
    }
}

pub struct ReadGuard<'a> {
    shared: &'a SharedIndex,
}

impl ReadGuard<'_> {
    pub fn search(
        &self,
        stems: &std::collections::BTreeSet<String>,
        partial: bool,
    ) -> Vec<crate::search::SearchResult> {
        self.shared.inner.index.lock().search(stems, partial)
    }

    pub fn view<T>(&self, f: impl FnOnce(&InvertedIndex) -> T) -> T {
        f(&self.shared.inner.index.lock())
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.shared.release_read();
    }
}

pub struct WriteGuard<'a> {
    shared: &'a SharedIndex,
}

impl WriteGuard<'_> {
    pub fn merge(&self, local: &InvertedIndex) {
        self.shared.inner.index.lock().merge(local);
    }

    pub fn clear(&self) {
        self.shared.inner.index.lock().clear();
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.shared.release_write();
    }
}

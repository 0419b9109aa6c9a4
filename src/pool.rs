// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A bounded worker pool with a pending-task counter for quiescence
//! detection.
//!
//! `execute` enqueues a job and increments the pending counter before
//! returning; each worker decrements it once per job, after running to
//! completion (a panicking job is caught and logged, not propagated -
//! see the error policy note on `run_job`). `finish` blocks until the
//! counter reaches zero. Re-entrant `execute` calls from inside a running
//! job are safe: the increment happens synchronously on the calling
//! thread before the job returns, so it is always observed before that
//! job's own decrement.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Inner {
    queue: Mutex<VecDeque<Job>>,
    queue_cv: Condvar,
    pending: Mutex<usize>,
    pending_cv: Condvar,
    draining: Mutex<bool>,
}

pub struct WorkerPool {
    inner: Arc<Inner>,
    threads: Mutex<Option<Vec<JoinHandle<()>>>>,
}

impl WorkerPool {
    /// Spawn a pool of `n` worker threads. Out-of-range or zero counts are
    /// clamped to 1 silently, per the error-handling design.
    pub fn new(n: usize) -> Self {
        let n = n.max(1);
        let inner = Arc::new(Inner {
            queue: Mutex::new(VecDeque::new()),
            queue_cv: Condvar::new(),
            pending: Mutex::new(0),
            pending_cv: Condvar::new(),
            draining: Mutex::new(false),
        });

        let threads = (0..n)
            .map(|_| {
                let inner = Arc::clone(&inner);
                thread::spawn(move || worker_loop(inner))
            })
            .collect();

        WorkerPool {
            inner,
            threads: Mutex::new(Some(threads)),
        }
    }

    /// Enqueue a job. Non-blocking except for the brief queue-insertion
    /// lock; safe to call from any thread, including a worker running
    /// another job.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut pending = self.inner.pending.lock();
            *pending += 1;
        }
        {
            let mut queue = self.inner.queue.lock();
            queue.push_back(Box::new(job));
        }
        self.inner.queue_cv.notify_one();
    }

    /// Block until every enqueued job has completed. The pool remains
    /// usable after this returns.
    pub fn finish(&self) {
        let mut pending = self.inner.pending.lock();
        while *pending != 0 {
            self.inner.pending_cv.wait(&mut pending);
        }
    }

    /// Mark the pool terminating: no new jobs may usefully be enqueued
    /// (workers drain whatever remains, then stop) and join every worker
    /// thread. Idempotent - a second call observes no threads left to
    /// join and returns immediately.
    pub fn shutdown(&self) {
        *self.inner.draining.lock() = true;
        self.inner.queue_cv.notify_all();

        let handles = self.threads.lock().take();
        if let Some(handles) = handles {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// `finish()` followed by `shutdown()`.
    pub fn join(&self) {
        self.finish();
        self.shutdown();
    }
}

fn worker_loop(inner: Arc<Inner>) {
    loop {
        let job = {
            let mut queue = inner.queue.lock();
            loop {
                if let Some(job) = queue.pop_front() {
                    break Some(job);
                }
                if *inner.draining.lock() {
                    break None;
                }
                inner.queue_cv.wait(&mut queue);
            }
        };

        let Some(job) = job else { break };

        run_job(job);

        let mut pending = inner.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            inner.pending_cv.notify_all();
        }
    }
}

/// Run a job to completion, catching and logging a panic rather than
/// letting it tear down the worker thread. The pending counter is
/// decremented by the caller regardless of outcome.
fn run_job(job: Job) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("task panicked with a non-string payload");
        eprintln!("⚠️  worker task failed: {message}");
    }
}

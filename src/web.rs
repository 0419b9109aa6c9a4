// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded breadth-first crawl that feeds the shared index through the
//! same local-build-then-merge protocol as the corpus ingester.
//!
//! `Fetcher`, `LinkExtractor`, and `HtmlCleaner` are the three external
//! collaborators this subsystem consumes - HTML fetching over sockets,
//! link extraction, and HTML-to-text cleaning are all out of the core's
//! scope per the purpose statement; only the trait seam belongs here. A
//! minimal blocking `Fetcher` is provided via `ureq` when no richer one is
//! supplied, since this crate has no async runtime elsewhere to justify a
//! heavier HTTP client.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::index::InvertedIndex;
use crate::normalize;
use crate::pool::WorkerPool;
use crate::shared::SharedIndex;

/// Redirect cap for the built-in fetcher. Named per spec.md §4.I's
/// "e.g. 3" - see `DESIGN.md` Open Questions for why 3 was chosen.
pub const MAX_REDIRECTS: u8 = 3;

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub content_type: String,
    pub body: String,
    pub final_url: String,
}

pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchedPage, String>;
}

pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, html: &str, base_url: &str) -> Vec<String>;
}

pub trait HtmlCleaner: Send + Sync {
    fn clean(&self, html: &str) -> String;
}

#[cfg(feature = "web")]
pub struct UreqFetcher {
    agent: ureq::Agent,
}

#[cfg(feature = "web")]
impl Default for UreqFetcher {
    fn default() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .redirects(u32::from(MAX_REDIRECTS))
                .build(),
        }
    }
}

#[cfg(feature = "web")]
impl Fetcher for UreqFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedPage, String> {
        let response = self.agent.get(url).call().map_err(|e| e.to_string())?;
        let status = response.status();
        let content_type = response.content_type().to_string();
        let final_url = response.get_url().to_string();
        let body = response.into_string().map_err(|e| e.to_string())?;
        Ok(FetchedPage {
            status,
            content_type,
            body,
            final_url,
        })
    }
}

/// A minimal `href="..."` scanner, resolving relative links against the
/// page they were found on. Link extraction is explicitly out of this
/// system's scope (no interesting algorithm lives here) - this exists so
/// `-html` has a usable default without a parser dependency the rest of
/// the crate never otherwise needs.
#[derive(Debug, Default)]
pub struct DefaultLinkExtractor;

impl LinkExtractor for DefaultLinkExtractor {
    fn extract_links(&self, html: &str, base_url: &str) -> Vec<String> {
        let mut links = Vec::new();
        let mut rest = html;
        while let Some(start) = rest.find("href=") {
            rest = &rest[start + 5..];
            let quote = rest.chars().next();
            let (href, remainder) = match quote {
                Some(q @ ('"' | '\'')) => {
                    let body = &rest[1..];
                    match body.find(q) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => break,
                    }
                }
                _ => break,
            };
            rest = remainder;
            if href.starts_with("http://") || href.starts_with("https://") {
                links.push(href.to_string());
            } else if let Some(origin) = base_url.find("://").map(|i| {
                let after = &base_url[i + 3..];
                let end = after.find('/').map(|j| i + 3 + j).unwrap_or(base_url.len());
                &base_url[..end]
            }) {
                if href.starts_with('/') {
                    links.push(format!("{origin}{href}"));
                }
            }
        }
        links
    }
}

/// Strips tags down to their text content. HTML-to-text cleaning is
/// explicitly out of this system's scope; this is the trivial default.
#[derive(Debug, Default)]
pub struct DefaultHtmlCleaner;

impl HtmlCleaner for DefaultHtmlCleaner {
    fn clean(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out
    }
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub pages_indexed: usize,
    pub pages_failed: usize,
}

struct Crawler {
    visited: Mutex<HashSet<String>>,
    indexed: AtomicUsize,
    failed: AtomicUsize,
    max_visits: usize,
    shared: SharedIndex,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    cleaner: Arc<dyn HtmlCleaner>,
    pool: Arc<WorkerPool>,
}

impl Crawler {
    /// Mark `url` visited and dispatch a fetch task for it, unless it is
    /// already visited or the global visit-count budget is exhausted. The
    /// visited set's mutex is held only for this check-and-insert, never
    /// across the fetch itself. Holds its own `Arc<WorkerPool>` so a task
    /// can dispatch further tasks for the links it discovers.
    fn enqueue(self: &Arc<Self>, url: String) {
        {
            let mut visited = self.visited.lock();
            if visited.len() >= self.max_visits || visited.contains(&url) {
                return;
            }
            visited.insert(url.clone());
        }

        let this = Arc::clone(self);
        self.pool.execute(move || this.fetch_and_expand(url));
    }

    fn fetch_and_expand(self: Arc<Self>, url: String) {
        let page = match self.fetcher.fetch(&url) {
            Ok(page) => page,
            Err(reason) => {
                eprintln!("⚠️  fetch failed for {url}: {reason}");
                self.failed.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        if page.status != 200 || !page.content_type.contains("html") {
            return;
        }

        let cleaned = self.cleaner.clean(&page.body);
        let stems: Vec<String> = normalize::parse_with_positions(&cleaned)
            .into_iter()
            .map(|(stem, _)| stem)
            .collect();
        let mut local = InvertedIndex::new();
        local.add_all(stems, &page.final_url);
        self.shared.write().merge(&local);
        self.indexed.fetch_add(1, Ordering::Relaxed);

        for link in self.extractor.extract_links(&page.body, &page.final_url) {
            self.enqueue(link);
        }
    }
}

/// Crawl from `seed_url`, visiting at most `max_visits` distinct URLs,
/// feeding the shared index as each page is fetched. Blocks until the
/// frontier is exhausted or the visit budget is spent. Link discovery
/// order (and therefore crawl order) is not deterministic even with one
/// worker - only the final *set* of visited URLs is a function of the
/// seed and budget (spec.md §9 Open Questions).
pub fn crawl(
    seed_url: &str,
    max_visits: usize,
    pool: Arc<WorkerPool>,
    shared: SharedIndex,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    cleaner: Arc<dyn HtmlCleaner>,
) -> CrawlReport {
    let max_visits = max_visits.max(1);
    let crawler = Arc::new(Crawler {
        visited: Mutex::new(HashSet::new()),
        indexed: AtomicUsize::new(0),
        failed: AtomicUsize::new(0),
        max_visits,
        shared,
        fetcher,
        extractor,
        cleaner,
        pool: Arc::clone(&pool),
    });

    crawler.enqueue(seed_url.to_string());
    pool.finish();

    CrawlReport {
        pages_indexed: crawler.indexed.load(Ordering::Relaxed),
        pages_failed: crawler.failed.load(Ordering::Relaxed),
    }
}

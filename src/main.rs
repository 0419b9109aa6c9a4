// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `tfindex` CLI: ingest a text corpus and/or crawl a seed URL, run query
//! lines against the resulting index, and write the three canonical JSON
//! outputs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tfindex::cli::Args;
use tfindex::errors::IndexError;
use tfindex::{InvertedIndex, QueryProcessor, SharedIndex, WorkerPool};

fn main() {
    let args = Args::parse();
    let started = Instant::now();

    let pool = Arc::new(WorkerPool::new(args.threads));
    let shared = SharedIndex::new(InvertedIndex::new());

    if let Some(root) = &args.text {
        match tfindex::ingest::ingest_corpus(root, &pool, &shared) {
            Ok(report) => {
                if report.files_failed > 0 {
                    eprintln!(
                        "⚠️  {} file(s) failed to index, {} indexed",
                        report.files_failed, report.files_indexed
                    );
                } else {
                    eprintln!("✅ indexed {} file(s)", report.files_indexed);
                }
            }
            Err(e) => eprintln!("❌ {}", IndexError::InvalidRoot {
                path: root.clone(),
                source: e,
            }),
        }
    }

    #[cfg(feature = "web")]
    if let Some(seed) = &args.html {
        let fetcher = Arc::new(tfindex::web::UreqFetcher::default());
        let extractor = Arc::new(tfindex::web::DefaultLinkExtractor);
        let cleaner = Arc::new(tfindex::web::DefaultHtmlCleaner);
        let report = tfindex::web::crawl(
            seed,
            args.crawl,
            Arc::clone(&pool),
            shared.clone(),
            fetcher,
            extractor,
            cleaner,
        );
        eprintln!(
            "✅ crawled {} page(s), {} failed",
            report.pages_indexed, report.pages_failed
        );
    }

    #[cfg(not(feature = "web"))]
    if args.html.is_some() {
        eprintln!("⚠️  -html given but this build was compiled without the \"web\" feature");
    }

    if let Err(e) = write_json(&args.index, |w| {
        shared.read().view(|idx| tfindex::json::write_index(w, idx))
    }) {
        eprintln!("❌ {e}");
    }
    if let Err(e) = write_json(&args.counts, |w| {
        shared.read().view(|idx| tfindex::json::write_counts(w, idx))
    }) {
        eprintln!("❌ {e}");
    }

    if let Some(query_path) = &args.query {
        let processor = Arc::new(QueryProcessor::new());
        match processor.process_file(query_path, args.partial, &pool, &shared) {
            Ok(()) => {
                let results = processor.results(args.partial);
                if let Err(e) = write_json(&args.results, |w| {
                    tfindex::json::write_results(w, &results)
                }) {
                    eprintln!("❌ {e}");
                }
            }
            Err(e) => eprintln!(
                "❌ {}",
                IndexError::ReadFailed {
                    path: query_path.clone(),
                    source: e,
                }
            ),
        }
    }

    pool.join();

    println!("elapsed: {:.3}s", started.elapsed().as_secs_f64());
}

fn write_json(
    path: &Path,
    render: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> Result<(), IndexError> {
    let file = File::create(path).map_err(|source| IndexError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    render(&mut writer).map_err(|source| IndexError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| IndexError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

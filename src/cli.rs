// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Command-line surface: one flag struct covering corpus ingestion, query
//! processing, and the optional web crawl.
//!
//! Every flag is single-dash (`-text`, `-query`, ...) per the documented
//! invocation contract, which `clap`'s `long` attribute cannot express -
//! `long` always renders with a `--` prefix and `short` is restricted to a
//! single character, so neither covers a multi-character single-dash flag.
//! This module parses argv by hand instead; see `DESIGN.md` for why `clap`
//! was dropped for this one concern.

use std::path::PathBuf;
use std::process;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("flag {0} requires a value")]
    MissingValue(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Root directory of `.txt`/`.text` files to ingest.
    pub text: Option<PathBuf>,
    /// File of newline-delimited query lines to process.
    pub query: Option<PathBuf>,
    /// Treat query terms as prefixes instead of exact stems.
    pub partial: bool,
    /// Output path for the per-location token-count table.
    pub counts: PathBuf,
    /// Output path for the positional inverted index.
    pub index: PathBuf,
    /// Output path for query results.
    pub results: PathBuf,
    /// Worker pool size for ingestion, querying, and crawling.
    pub threads: usize,
    /// Seed URL for the optional web ingester.
    pub html: Option<String>,
    /// Maximum distinct URLs to visit during a web crawl.
    pub crawl: usize,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            text: None,
            query: None,
            partial: false,
            counts: PathBuf::from("counts.json"),
            index: PathBuf::from("index.json"),
            results: PathBuf::from("results.json"),
            threads: 5,
            html: None,
            crawl: 50,
        }
    }
}

impl Args {
    /// Parse `std::env::args()`, printing an error and exiting with status 2
    /// on a malformed invocation - the conventional CLI-parsing exit code.
    pub fn parse() -> Self {
        match Self::parse_from(std::env::args()) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("❌ {err}");
                process::exit(2);
            }
        }
    }

    /// Parse an argv-shaped iterator, the first item being the program name
    /// (mirroring `std::env::args()`'s own shape, and ignored).
    pub fn parse_from<I, T>(argv: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut args = Args::default();
        let mut rest = argv.into_iter().map(Into::into);
        rest.next(); // program name

        while let Some(flag) = rest.next() {
            match flag.as_str() {
                "-text" => args.text = Some(PathBuf::from(take_value(&mut rest, &flag)?)),
                "-query" => args.query = Some(PathBuf::from(take_value(&mut rest, &flag)?)),
                "-partial" => args.partial = true,
                "-counts" => args.counts = PathBuf::from(take_value(&mut rest, &flag)?),
                "-index" => args.index = PathBuf::from(take_value(&mut rest, &flag)?),
                "-results" => args.results = PathBuf::from(take_value(&mut rest, &flag)?),
                "-threads" => args.threads = take_parsed(&mut rest, &flag)?,
                "-html" => args.html = Some(take_value(&mut rest, &flag)?),
                "-crawl" => args.crawl = take_parsed(&mut rest, &flag)?,
                other => return Err(ArgsError::UnknownFlag(other.to_string())),
            }
        }

        Ok(args)
    }
}

fn take_value<I: Iterator<Item = String>>(rest: &mut I, flag: &str) -> Result<String, ArgsError> {
    rest.next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}

fn take_parsed<I: Iterator<Item = String>, N: std::str::FromStr>(
    rest: &mut I,
    flag: &str,
) -> Result<N, ArgsError> {
    let raw = take_value(rest, flag)?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidValue(flag.to_string(), raw))
}

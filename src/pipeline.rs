//! Search → fetch → extract pipeline.
//!
//! Runs each stage in order against a [`LiteratureSource`]. Sources follow the
//! degrade-to-empty contract, so the pipeline never fails; an error anywhere
//! shows up as fewer (or zero) rows.

use crate::entrez::{EntrezClient, RawRecord};
use crate::extract;
use crate::report::{self, ReportRow};
use async_trait::async_trait;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Console line for a run whose search returned nothing
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// A literature database that can search and batch-fetch records
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    /// Ordered ids matching `query`, at most `max_results`; empty on failure
    async fn search(&self, query: &str, max_results: u32) -> Vec<String>;

    /// Records for `ids` in one batch; empty on failure
    async fn fetch_details(&self, ids: &[String]) -> Vec<RawRecord>;
}

#[async_trait]
impl LiteratureSource for EntrezClient {
    async fn search(&self, query: &str, max_results: u32) -> Vec<String> {
        EntrezClient::search(self, query, max_results).await
    }

    async fn fetch_details(&self, ids: &[String]) -> Vec<RawRecord> {
        EntrezClient::fetch_details(self, ids).await
    }
}

/// Options for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub query: String,
    pub max_results: u32,
    /// Print progress lines to stdout
    pub verbose: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The search returned no ids; nothing was fetched
    NoResults,
    /// Rows for every record that could be extracted
    Rows(Vec<ReportRow>),
}

/// Extract rows from raw records, dropping the ones that fail
pub fn extract_rows(records: &[RawRecord]) -> Vec<ReportRow> {
    records
        .iter()
        .filter_map(|record| match extract::extract_row(record) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!(error = %e, "Error extracting information");
                None
            }
        })
        .collect()
}

/// Run the whole pipeline once
pub async fn run<S: LiteratureSource + ?Sized>(source: &S, options: &RunOptions) -> RunOutcome {
    if options.verbose {
        println!("Searching PubMed for: '{}'", options.query);
    }

    let ids = source.search(&options.query, options.max_results).await;

    if options.verbose {
        println!("Found {} articles. Fetching details...", ids.len());
    }

    if ids.is_empty() {
        return RunOutcome::NoResults;
    }

    let records = source.fetch_details(&ids).await;
    debug!(ids = ids.len(), records = records.len(), "Fetched records");

    let rows = extract_rows(&records);
    info!(records = records.len(), rows = rows.len(), "Extraction complete");

    RunOutcome::Rows(rows)
}

/// Present an outcome: the no-results line, or the report via [`report::emit_to`]
pub fn finish_to<W: Write>(out: &mut W, outcome: &RunOutcome, destination: Option<&Path>) {
    match outcome {
        RunOutcome::NoResults => {
            if let Err(e) = writeln!(out, "{}", NO_RESULTS_MESSAGE) {
                error!(error = %e, "Error printing results");
            }
        }
        RunOutcome::Rows(rows) => report::emit_to(out, rows, destination),
    }
}

/// [`finish_to`] with stdout as the console
pub fn finish(outcome: &RunOutcome, destination: Option<&Path>) {
    finish_to(&mut io::stdout().lock(), outcome, destination);
}

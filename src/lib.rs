//! # pubmedfetch
//!
//! Searches PubMed and reports articles with industry-affiliated authors.
//!
//! ## Modules
//!
//! - [`entrez`] - E-utilities search and batch fetch
//! - [`xml`] - Owned XML tree with optional accessors
//! - [`extract`] - Affiliation classification and row extraction
//! - [`report`] - CSV and console output
//! - [`pipeline`] - Search → fetch → extract control flow
//! - [`logging`] - Tracing subscriber setup (stderr)
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubmedfetch::entrez::{EntrezClient, EntrezConfig};
//! use pubmedfetch::pipeline::{self, RunOptions, RunOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EntrezClient::new(EntrezConfig::default())?;
//!     let options = RunOptions {
//!         query: "CRISPR therapy".to_string(),
//!         max_results: 10,
//!         verbose: false,
//!     };
//!     if let RunOutcome::Rows(rows) = pipeline::run(&client, &options).await {
//!         println!("Extracted {} rows", rows.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod entrez;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod xml;

pub use error::{PubmedError, Result};

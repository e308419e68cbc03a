//! pubmedfetch - find PubMed papers with non-academic authors
//!
//! ## Usage
//!
//! ```bash
//! pubmedfetch "cancer immunotherapy" -m 20 -f results.csv
//! pubmedfetch "CRISPR" --debug
//! ```

use anyhow::Result;
use clap::Parser;
use pubmedfetch::entrez::{EntrezClient, EntrezConfig, DEFAULT_EMAIL, DEFAULT_TIMEOUT_SECS};
use pubmedfetch::logging;
use pubmedfetch::pipeline::{self, RunOptions, RunOutcome};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

// ============================================================================
// CLI Definition
// ============================================================================

/// Fetch PubMed research papers with non-academic authors
#[derive(Parser)]
#[command(name = "pubmedfetch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// PubMed search query
    query: String,

    /// Max number of results to fetch
    #[arg(
        short = 'm',
        long = "max_results",
        visible_alias = "max-results",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_results: u32,

    /// Output CSV filename (prints to stdout if omitted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable debug information
    #[arg(short, long)]
    debug: bool,

    /// Contact email sent to NCBI with each request
    #[arg(long, env = "NCBI_EMAIL", default_value = DEFAULT_EMAIL)]
    email: String,

    /// NCBI API key
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// HTTP timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.debug);

    let config = EntrezConfig {
        email: cli.email,
        api_key: cli.api_key,
        timeout: Duration::from_secs(cli.timeout),
        ..Default::default()
    };

    let options = RunOptions {
        query: cli.query,
        max_results: cli.max_results,
        verbose: cli.debug,
    };

    let outcome = match EntrezClient::new(config) {
        Ok(client) => pipeline::run(&client, &options).await,
        Err(e) => {
            error!(error = %e, "Failed to create PubMed client");
            RunOutcome::NoResults
        }
    };

    pipeline::finish(&outcome, cli.file.as_deref());

    Ok(())
}

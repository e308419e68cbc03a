//! Error type shared by the search, fetch, extract and write stages.
//!
//! - search/fetch: `Network`, `Api`, `Parse`
//! - extract: `Validation`
//! - write: `Io`, `Csv`, `Json`
//!
//! `EntrezClient::search`, `EntrezClient::fetch_details`, `pipeline::extract_rows`
//! and `report::emit_to` catch these at their boundary and log them, so none of
//! them reaches the process exit status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PubmedError {
    /// E-utilities could not be reached, or the body could not be read
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response was not well-formed XML or lacked its root element
    #[error("Parse error: {0}")]
    Parse(String),

    /// Non-success HTTP status, or an `ERROR` element in an ESearch result
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status, 0 for an error document sent with 200
        code: i32,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid `EntrezConfig` (empty email, bad base URL) or HTTP client setup
    #[error("Config error: {0}")]
    Config(String),

    /// Record is not a `PubmedArticle`
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PubmedError>;

/// Turn a missing tree element into a `Parse` error
pub trait OptionExt<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| PubmedError::Parse(msg.to_string()))
    }
}

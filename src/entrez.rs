//! NCBI E-utilities client for PubMed.
//!
//! Two calls are used:
//! - ESearch: free-text query, bounded count, returns PMIDs
//! - EFetch: batch of PMIDs, returns `PubmedArticleSet` XML
//!
//! The plain `search` / `fetch_details` methods degrade to an empty result on
//! any failure and log it. The `try_*` variants surface the error instead.

use crate::error::{OptionExt, PubmedError, Result};
use crate::xml::{self, XmlNode};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// E-utilities base URL
pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

/// Tool name reported to NCBI
pub const DEFAULT_TOOL: &str = "pubmedfetch";

/// Contact email reported to NCBI when none is configured
pub const DEFAULT_EMAIL: &str = "pubmedfetch@example.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One article as returned by EFetch: a `PubmedArticle` element tree
pub type RawRecord = XmlNode;

/// Connection settings for the E-utilities API
#[derive(Debug, Clone)]
pub struct EntrezConfig {
    /// Base URL, must end with a slash
    pub base_url: Url,
    /// Value of the `tool` parameter
    pub tool: String,
    /// Value of the `email` parameter
    pub email: String,
    /// Optional NCBI API key
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tool: DEFAULT_TOOL.to_string(),
            email: DEFAULT_EMAIL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(EUTILS_BASE_URL) {
        Ok(url) => url,
        Err(_) => unreachable!("EUTILS_BASE_URL is a valid URL"),
    }
}

impl EntrezConfig {
    /// Parse and set a base URL, appending the trailing slash if missing
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        self.base_url = Url::parse(&normalized)
            .map_err(|e| PubmedError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        Ok(self)
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.base_url
            .join(name)
            .map_err(|e| PubmedError::Config(format!("Invalid endpoint {}: {}", name, e)))
    }
}

/// PubMed client over E-utilities
pub struct EntrezClient {
    client: reqwest::Client,
    config: EntrezConfig,
}

impl EntrezClient {
    /// Create a new client from explicit configuration
    pub fn new(config: EntrezConfig) -> Result<Self> {
        if config.email.trim().is_empty() {
            return Err(PubmedError::Config("email must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(format!(
                "{}/{} (mailto:{})",
                config.tool,
                env!("CARGO_PKG_VERSION"),
                config.email
            ))
            .timeout(config.timeout)
            .build()
            .map_err(|e| PubmedError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &EntrezConfig {
        &self.config
    }

    /// Parameters sent with every request
    fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("retmode", "xml".to_string()),
            ("tool", self.config.tool.clone()),
            ("email", self.config.email.clone()),
        ];
        if let Some(key) = &self.config.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    async fn get_xml(&self, endpoint: &str, params: &[(&'static str, String)]) -> Result<String> {
        let url = self.config.endpoint(endpoint)?;
        debug!(url = %url, "Sending E-utilities request");

        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PubmedError::Api {
                code: status.as_u16() as i32,
                message: format!("{} returned {}: {}", endpoint, status, error_text.trim()),
            });
        }

        Ok(response.text().await?)
    }

    /// Search PubMed, returning up to `max_results` PMIDs in ranked order
    pub async fn try_search(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        info!(query = query, max_results = max_results, "Searching PubMed");

        let mut params = self.common_params();
        params.push(("term", query.to_string()));
        params.push(("retmax", max_results.to_string()));

        let body = self.get_xml("esearch.fcgi", &params).await?;
        let mut ids = parse_search_response(&body)?;
        ids.truncate(max_results as usize);

        info!(count = ids.len(), "Search complete");
        Ok(ids)
    }

    /// Search PubMed; any failure is logged and yields an empty list
    pub async fn search(&self, query: &str, max_results: u32) -> Vec<String> {
        self.try_search(query, max_results)
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "Error during search");
                Vec::new()
            })
    }

    /// Fetch full records for a batch of PMIDs in one request
    pub async fn try_fetch_details(&self, ids: &[String]) -> Result<Vec<RawRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        info!(count = ids.len(), "Fetching article details");

        let mut params = self.common_params();
        params.push(("id", ids.join(",")));

        let body = self.get_xml("efetch.fcgi", &params).await?;
        let records = parse_fetch_response(&body)?;

        info!(requested = ids.len(), received = records.len(), "Fetch complete");
        Ok(records)
    }

    /// Fetch full records; any failure is logged and yields an empty list
    pub async fn fetch_details(&self, ids: &[String]) -> Vec<RawRecord> {
        self.try_fetch_details(ids).await.unwrap_or_else(|e| {
            error!(error = %e, "Error during fetch");
            Vec::new()
        })
    }
}

/// Parse an ESearch response into its ordered id list
pub fn parse_search_response(body: &str) -> Result<Vec<String>> {
    let root = xml::parse(body)?;
    if root.name != "eSearchResult" {
        return Err(PubmedError::Parse(format!(
            "expected eSearchResult, found <{}>",
            root.name
        )));
    }

    match root.child("IdList") {
        Some(list) => Ok(list
            .children_named("Id")
            .map(|id| id.text().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()),
        None => {
            let message = root
                .text_at(&["ERROR"])
                .unwrap_or_else(|| "response has no IdList".to_string());
            Err(PubmedError::Api { code: 0, message })
        }
    }
}

/// Parse an EFetch response into one record per article element
pub fn parse_fetch_response(body: &str) -> Result<Vec<RawRecord>> {
    let root = xml::parse(body)?;
    let root = Some(root)
        .filter(|r| r.name == "PubmedArticleSet")
        .ok_or_parse("expected PubmedArticleSet root element")?;

    Ok(root.elements().cloned().collect())
}

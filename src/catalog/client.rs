//! Catalog API client.
//!
//! [`CatalogClient`] is the seam between the fetcher and the remote catalog. The
//! default implementation, [`HttpCatalogClient`], issues
//! `GET <base>/volumes?key=..&q=..&startIndex=..&maxResults=..` with `reqwest`.
//! Tests substitute scripted clients.

use crate::domain::error::{BookscoutError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Default catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Per-request timeout for catalog calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of the catalog's `volumes` listing.
///
/// A missing or `null` `items` array means zero results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesPage {
    #[serde(default)]
    pub kind: String,

    /// Total matches reported by the catalog (approximate).
    #[serde(default)]
    pub total_items: u64,

    /// Raw volume objects, parsed leniently by the fetcher.
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
}

impl VolumesPage {
    /// Builds a page from raw items.
    #[must_use]
    pub fn with_items(items: Vec<serde_json::Value>) -> Self {
        Self {
            kind: "books#volumes".to_string(),
            total_items: items.len() as u64,
            items: Some(items),
        }
    }

    /// Consumes the page, returning its raw items (empty if absent).
    #[must_use]
    pub fn into_items(self) -> Vec<serde_json::Value> {
        self.items.unwrap_or_default()
    }
}

/// Remote catalog transport.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches one page of volumes matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`BookscoutError::FetchFailed`] on transport failure, non-success
    /// status or an undecodable body.
    async fn get_volumes(&self, query: &str, start_index: u32, max_results: u32) -> Result<VolumesPage>;
}

/// `reqwest`-backed catalog client.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCatalogClient {
    /// Creates a client for `base_url`, sending `api_key` as the `key` parameter when set.
    ///
    /// # Errors
    ///
    /// Returns [`BookscoutError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bookscout/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BookscoutError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Creates a client from the catalog settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`HttpCatalogClient::new`].
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.api_key.clone())
    }

    fn volumes_url(&self) -> String {
        format!("{}/volumes", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_volumes(&self, query: &str, start_index: u32, max_results: u32) -> Result<VolumesPage> {
        let url = self.volumes_url();

        let mut params: Vec<(&str, String)> = Vec::with_capacity(4);
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }
        params.push(("q", query.to_string()));
        params.push(("startIndex", start_index.to_string()));
        params.push(("maxResults", max_results.to_string()));

        tracing::debug!(url = %url, query = %query, start_index, max_results, "catalog request");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| BookscoutError::fetch_failed(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "catalog returned an error status");
            return Err(BookscoutError::fetch_failed(format!(
                "catalog returned {status}: {}",
                body.trim()
            )));
        }

        let page: VolumesPage = response
            .json()
            .await
            .map_err(|e| BookscoutError::fetch_failed(format!("failed to parse catalog response: {e}")))?;

        tracing::debug!(
            total_items = page.total_items,
            returned = page.items.as_ref().map_or(0, Vec::len),
            "catalog response"
        );
        Ok(page)
    }
}

//! Scraping API endpoints.

use crate::client::SerpBridgeClient;
use crate::error::SerpBridgeResult;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Scraping API for fetching and inspecting pages.
pub struct ScrapeApi<'a> {
    client: &'a SerpBridgeClient,
}

impl<'a> ScrapeApi<'a> {
    pub(crate) fn new(client: &'a SerpBridgeClient) -> Self {
        Self { client }
    }

    /// Download a page.
    pub async fn page(&self, request: &ScrapeRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("scrape_url", request).await
    }

    /// Links found on a page.
    pub async fn links(&self, url: &str, internal_only: bool) -> SerpBridgeResult<Value> {
        self.client
            .call_json(
                "extract_links",
                &json!({ "url": url, "internal_only": internal_only }),
            )
            .await
    }

    /// On-page SEO metadata.
    pub async fn metadata(&self, url: &str) -> SerpBridgeResult<Value> {
        self.client
            .call_json("get_page_metadata", &json!({ "url": url }))
            .await
    }
}

/// Page download options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_js: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_ms: Option<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub headers: BTreeMap<String, String>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn render_js(mut self, wait_for_ms: Option<u32>) -> Self {
        self.render_js = Some(true);
        self.wait_for_ms = wait_for_ms;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

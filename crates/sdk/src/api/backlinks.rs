//! Backlinks API endpoints.

use crate::client::SerpBridgeClient;
use crate::error::SerpBridgeResult;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Backlinks API for link profile data.
pub struct BacklinksApi<'a> {
    client: &'a SerpBridgeClient,
}

impl<'a> BacklinksApi<'a> {
    pub(crate) fn new(client: &'a SerpBridgeClient) -> Self {
        Self { client }
    }

    /// List backlinks pointing to a target.
    pub async fn list(&self, request: &BacklinksRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("get_backlinks", request).await
    }

    /// Aggregate backlink profile of a domain.
    pub async fn summary(&self, domain: &str) -> SerpBridgeResult<Value> {
        self.client
            .call_json("get_backlinks_summary", &json!({ "domain": domain }))
            .await
    }

    /// Domains linking to the target.
    pub async fn referring_domains(&self, domain: &str, limit: Option<u32>) -> SerpBridgeResult<Value> {
        self.client
            .call_json(
                "get_referring_domains",
                &json!({ "domain": domain, "limit": limit }),
            )
            .await
    }

    /// Most frequent anchor texts.
    pub async fn anchors(&self, domain: &str, limit: Option<u32>) -> SerpBridgeResult<Value> {
        self.client
            .call_json("get_anchor_texts", &json!({ "domain": domain, "limit": limit }))
            .await
    }
}

/// Scope of a backlink lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklinkMode {
    Domain,
    Subdomain,
    Url,
}

/// Request to list backlinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklinksRequest {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<BacklinkMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl BacklinksRequest {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            mode: None,
            limit: None,
        }
    }
}

//! Domain API endpoints.

use crate::client::SerpBridgeClient;
use crate::error::SerpBridgeResult;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Domains API for per-domain overviews.
pub struct DomainsApi<'a> {
    client: &'a SerpBridgeClient,
}

impl<'a> DomainsApi<'a> {
    pub(crate) fn new(client: &'a SerpBridgeClient) -> Self {
        Self { client }
    }

    /// Domain overview.
    pub async fn info(&self, domain: &str) -> SerpBridgeResult<Value> {
        self.client
            .call_json("get_domain_info", &json!({ "domain": domain }))
            .await
    }

    /// Authority and trust scores.
    pub async fn authority(&self, domain: &str) -> SerpBridgeResult<Value> {
        self.client
            .call_json("get_domain_authority", &json!({ "domain": domain }))
            .await
    }

    /// Organic keywords of a domain.
    pub async fn keywords(&self, request: &DomainListRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("get_domain_keywords", request).await
    }

    /// Organic competitors of a domain.
    pub async fn competitors(&self, request: &DomainListRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("get_domain_competitors", request).await
    }

    /// WHOIS record.
    pub async fn whois(&self, domain: &str) -> SerpBridgeResult<Value> {
        self.client
            .call_json("get_whois", &json!({ "domain": domain }))
            .await
    }
}

/// Paged, localized per-domain listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainListRequest {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl DomainListRequest {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            country: None,
            limit: None,
        }
    }
}

//! SERP API endpoints.

use crate::client::SerpBridgeClient;
use crate::error::SerpBridgeResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SERP API for live search results.
pub struct SerpApi<'a> {
    client: &'a SerpBridgeClient,
}

impl<'a> SerpApi<'a> {
    pub(crate) fn new(client: &'a SerpBridgeClient) -> Self {
        Self { client }
    }

    /// Fetch one results page.
    pub async fn fetch(&self, query: &SerpQuery) -> SerpBridgeResult<Value> {
        self.client.call_json("fetch_serp", query).await
    }

    /// Fetch results for several queries at once.
    pub async fn fetch_batch(&self, request: &SerpBatchRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("fetch_serp_batch", request).await
    }

    /// Position of a domain for a keyword.
    pub async fn check_rank(&self, request: &RankCheckRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("check_rank", request).await
    }
}

/// Emulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
}

/// A single search query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl SerpQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    pub fn num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }
}

/// Several queries sharing locale settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpBatchRequest {
    pub queries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

/// Rank lookup for a domain and keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankCheckRequest {
    pub domain: String,
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerpBridgeError;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> SerpBridgeClient {
        SerpBridgeClient::builder()
            .base_url(server.uri())
            .api_key("sk-test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_query_serializes_to_tool_arguments() {
        let query = SerpQuery::new("coffee").device(Device::Mobile).num(20);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, json!({ "query": "coffee", "device": "mobile", "num": 20 }));
    }

    #[tokio::test]
    async fn test_fetch_maps_query_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/serp"))
            .and(query_param("q", "coffee"))
            .and(query_param("hl", "it"))
            .and(query_param("device", "mobile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "organic": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client
            .serp()
            .fetch(&SerpQuery::new("coffee").language("it").device(Device::Mobile))
            .await
            .unwrap();
        assert_eq!(result, json!({ "organic": [] }));
    }

    #[tokio::test]
    async fn test_batch_posts_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/serp/batch"))
            .and(body_json(json!({ "queries": ["a", "b"], "country": "fr" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": 2 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let request = SerpBatchRequest {
            queries: vec!["a".to_string(), "b".to_string()],
            country: Some("fr".to_string()),
            language: None,
            device: None,
        };
        let result = client.serp().fetch_batch(&request).await.unwrap();
        assert_eq!(result["results"], 2);
    }

    #[tokio::test]
    async fn test_out_of_range_depth_is_rejected_locally() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        let request = RankCheckRequest {
            domain: "example.com".to_string(),
            keyword: "coffee".to_string(),
            country: None,
            depth: Some(5),
        };
        let result = client.serp().check_rank(&request).await;
        assert!(matches!(result, Err(SerpBridgeError::InvalidArguments(_))));
    }
}

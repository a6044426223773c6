//! Keyword research API endpoints.

use crate::client::SerpBridgeClient;
use crate::error::SerpBridgeResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keywords API for keyword research.
pub struct KeywordsApi<'a> {
    client: &'a SerpBridgeClient,
}

impl<'a> KeywordsApi<'a> {
    pub(crate) fn new(client: &'a SerpBridgeClient) -> Self {
        Self { client }
    }

    /// Keyword ideas for a seed keyword.
    pub async fn suggestions(&self, query: &KeywordQuery) -> SerpBridgeResult<Value> {
        self.client.call_json("keyword_suggestions", query).await
    }

    /// Search volume for a list of keywords.
    pub async fn volume(&self, request: &KeywordListRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("keyword_volume", request).await
    }

    /// Ranking difficulty for a list of keywords.
    pub async fn difficulty(&self, request: &KeywordListRequest) -> SerpBridgeResult<Value> {
        self.client.call_json("keyword_difficulty", request).await
    }

    /// "People also ask" questions.
    pub async fn questions(&self, query: &KeywordQuery) -> SerpBridgeResult<Value> {
        let mut query = query.clone();
        query.limit = None;
        self.client.call_json("related_questions", &query).await
    }

    /// Autocomplete suggestions for a partial query.
    pub async fn autocomplete(
        &self,
        query: &str,
        country: Option<&str>,
        language: Option<&str>,
    ) -> SerpBridgeResult<Value> {
        self.client
            .call_json(
                "autocomplete",
                &serde_json::json!({ "query": query, "country": country, "language": language }),
            )
            .await
    }
}

/// Seed keyword with locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordQuery {
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl KeywordQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            country: None,
            language: None,
            limit: None,
        }
    }
}

/// Batch of keywords for volume/difficulty lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordListRequest {
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl KeywordListRequest {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            country: None,
        }
    }
}

//! HTTP transport layer for the serpbridge SDK.

use crate::config::ClientConfig;
use crate::error::{SerpBridgeError, SerpBridgeResult};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serpbridge_core::{ApiToken, HttpMethod, UpstreamRequest};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Successful upstream response, body kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> SerpBridgeResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// HTTP transport for making upstream API requests.
///
/// Every call issues exactly one request; failures are not retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> SerpBridgeResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the full URL for a request: base URL, encoded path segments and
    /// query string.
    pub(crate) fn build_url(&self, request: &UpstreamRequest) -> SerpBridgeResult<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SerpBridgeError::Config("base URL cannot carry a path".to_string())
            })?;
            segments.pop_if_empty();
            segments.extend(request.segments.iter());
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Send a request with the given bearer token.
    pub async fn send(
        &self,
        request: &UpstreamRequest,
        token: &ApiToken,
    ) -> SerpBridgeResult<UpstreamResponse> {
        let url = self.build_url(request)?;
        debug!(method = %request.method, path = %request.path(), "Upstream request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        builder = builder.header(header::AUTHORIZATION, token.bearer());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                path = %request.path(),
                "Upstream request failed"
            );
            return Err(SerpBridgeError::from_response(status, &body));
        }

        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> SerpBridgeError {
    if err.is_timeout() {
        SerpBridgeError::Timeout
    } else {
        SerpBridgeError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_transport(base_url: &str) -> HttpTransport {
        let config = ClientConfig::new(Url::parse(base_url).unwrap());
        HttpTransport::new(Arc::new(config)).unwrap()
    }

    fn token() -> ApiToken {
        ApiToken::new("sk-test-key").unwrap()
    }

    fn get(segments: &[&str], query: &[(&str, &str)]) -> UpstreamRequest {
        UpstreamRequest {
            method: HttpMethod::Get,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_get_request_with_query_and_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/serp"))
            .and(query_param("q", "rust"))
            .and(query_param("num", "10"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results":[1,2]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&format!("{}/v1", server.uri()));
        let response = transport
            .send(&get(&["serp"], &[("q", "rust"), ("num", "10")]), &token())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"results":[1,2]}"#);
    }

    #[tokio::test]
    async fn test_post_request_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/keywords/volume"))
            .and(body_json(json!({ "keywords": ["seo", "sem"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&format!("{}/v1/", server.uri()));
        let request = UpstreamRequest {
            method: HttpMethod::Post,
            segments: vec!["keywords".to_string(), "volume".to_string()],
            query: vec![],
            body: Some(json!({ "keywords": ["seo", "sem"] })),
        };

        let response = transport.send(&request, &token()).await.unwrap();
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_body_is_passed_through_verbatim() {
        let server = MockServer::start().await;
        let raw = "{ \"b\": 2,\n  \"a\": 1 }";

        Mock::given(method("GET"))
            .and(path("/account/usage"))
            .respond_with(ResponseTemplate::new(200).set_body_string(raw))
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let response = transport
            .send(&get(&["account", "usage"], &[]), &token())
            .await
            .unwrap();
        assert_eq!(response.body, raw);
    }

    #[tokio::test]
    async fn test_error_status_is_relayed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/domains/example.com"))
            .respond_with(ResponseTemplate::new(404).set_body_string("domain not tracked"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let result = transport
            .send(&get(&["domains", "example.com"], &[]), &token())
            .await;

        match result {
            Err(SerpBridgeError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "domain not tracked");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_errors_are_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/serp"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let transport = create_transport(&server.uri());
        let result = transport.send(&get(&["serp"], &[]), &token()).await;
        assert_eq!(result.unwrap_err().status(), Some(503));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let mut config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
        config.timeout = Duration::from_millis(50);
        let transport = HttpTransport::new(Arc::new(config)).unwrap();

        let result = transport.send(&get(&["serp"], &[]), &token()).await;
        assert!(matches!(result, Err(SerpBridgeError::Timeout)));
    }

    #[test]
    fn test_build_url_encodes_segments() {
        let transport = create_transport("http://localhost:8080/v1");
        let url = transport
            .build_url(&get(&["domains", "a b/c", "whois"], &[("q", "x&y")]))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/domains/a%20b%2Fc/whois?q=x%26y"
        );
    }

    #[test]
    fn test_build_url_without_base_path() {
        let transport = create_transport("http://localhost:8080");
        let url = transport.build_url(&get(&["serp"], &[])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/serp");
    }
}

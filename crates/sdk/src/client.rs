//! Main client for the serpbridge SDK.

use crate::api::*;
use crate::config::{default_user_agent, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::{SerpBridgeError, SerpBridgeResult};
use crate::transport::{HttpTransport, UpstreamResponse};
use serde_json::Value;
use serpbridge_core::{build_request, lookup, ApiToken, EndpointSpec};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Environment variable holding the upstream API key.
pub const ENV_API_KEY: &str = "SERPBRIDGE_API_KEY";
/// Environment variable overriding the upstream base URL.
pub const ENV_BASE_URL: &str = "SERPBRIDGE_API_BASE_URL";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SERPBRIDGE_TIMEOUT_SECS";

/// Main client for the upstream SEO data API.
#[derive(Debug, Clone)]
pub struct SerpBridgeClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl SerpBridgeClient {
    /// Create a new client builder.
    pub fn builder() -> SerpBridgeClientBuilder {
        SerpBridgeClientBuilder::new()
    }

    /// Build a client from `SERPBRIDGE_*` environment variables.
    pub fn from_env() -> SerpBridgeResult<Self> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            builder = builder.api_key(key);
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                SerpBridgeError::Config(format!("{} must be a number of seconds", ENV_TIMEOUT_SECS))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Create a client from configuration.
    fn from_config(config: ClientConfig) -> SerpBridgeResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a default API key is configured.
    pub fn has_default_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Call a catalog tool by name using the configured API key.
    pub async fn call(&self, tool: &str, arguments: &Value) -> SerpBridgeResult<UpstreamResponse> {
        self.call_with_token(tool, arguments, None).await
    }

    /// Call a catalog tool by name with an explicit API key.
    ///
    /// `None` falls back to the configured key.
    pub async fn call_with_token(
        &self,
        tool: &str,
        arguments: &Value,
        token: Option<&ApiToken>,
    ) -> SerpBridgeResult<UpstreamResponse> {
        let spec = lookup(tool).ok_or_else(|| SerpBridgeError::UnknownTool(tool.to_string()))?;
        self.execute(spec, arguments, token).await
    }

    /// Map the arguments onto `spec` and send exactly one upstream request.
    pub async fn execute(
        &self,
        spec: &EndpointSpec,
        arguments: &Value,
        token: Option<&ApiToken>,
    ) -> SerpBridgeResult<UpstreamResponse> {
        let token = token
            .or(self.config.api_key.as_ref())
            .ok_or(SerpBridgeError::MissingCredential)?;
        let request = build_request(spec, arguments)?;
        self.http.send(&request, token).await
    }

    /// Get the backlinks API.
    pub fn backlinks(&self) -> BacklinksApi<'_> {
        BacklinksApi::new(self)
    }

    /// Get the SERP API.
    pub fn serp(&self) -> SerpApi<'_> {
        SerpApi::new(self)
    }

    /// Get the domains API.
    pub fn domains(&self) -> DomainsApi<'_> {
        DomainsApi::new(self)
    }

    /// Get the scraping API.
    pub fn scrape(&self) -> ScrapeApi<'_> {
        ScrapeApi::new(self)
    }

    /// Get the keywords API.
    pub fn keywords(&self) -> KeywordsApi<'_> {
        KeywordsApi::new(self)
    }

    /// Get the account API.
    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    /// Call a tool with serializable arguments and decode the JSON response.
    pub(crate) async fn call_json<A: serde::Serialize>(
        &self,
        tool: &str,
        arguments: &A,
    ) -> SerpBridgeResult<Value> {
        let arguments = serde_json::to_value(arguments)?;
        self.call(tool, &arguments).await?.json()
    }
}

/// Builder for creating a SerpBridgeClient.
pub struct SerpBridgeClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl SerpBridgeClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL of the upstream API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the default API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> SerpBridgeResult<SerpBridgeClient> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SerpBridgeError::Config(format!(
                "unsupported base URL scheme: {}",
                base_url.scheme()
            )));
        }

        let mut config = ClientConfig::new(base_url);
        config.api_key = self.api_key.and_then(ApiToken::new);
        config.timeout = self.timeout;
        config.user_agent = self.user_agent.unwrap_or_else(default_user_agent);

        SerpBridgeClient::from_config(config)
    }
}

impl Default for SerpBridgeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_builder_defaults() {
        let client = SerpBridgeClient::builder().build().unwrap();
        assert_eq!(client.config().base_url.as_str(), DEFAULT_BASE_URL);
        assert!(!client.has_default_key());
        assert_eq!(client.config().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builder_rejects_bad_urls() {
        assert!(matches!(
            SerpBridgeClient::builder().base_url("not a url").build(),
            Err(SerpBridgeError::InvalidUrl(_))
        ));
        assert!(matches!(
            SerpBridgeClient::builder().base_url("ftp://example.com").build(),
            Err(SerpBridgeError::Config(_))
        ));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let client = SerpBridgeClient::builder().api_key("   ").build().unwrap();
        assert!(!client.has_default_key());
    }

    #[tokio::test]
    async fn test_call_uses_default_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/backlinks/summary"))
            .and(query_param("domain", "example.com"))
            .and(header("Authorization", "Bearer default-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"backlinks\":42}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SerpBridgeClient::builder()
            .base_url(server.uri())
            .api_key("default-key")
            .build()
            .unwrap();

        let response = client
            .call("get_backlinks_summary", &json!({ "domain": "example.com" }))
            .await
            .unwrap();
        assert_eq!(response.body, "{\"backlinks\":42}");
    }

    #[tokio::test]
    async fn test_explicit_token_overrides_default() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/account/usage"))
            .and(header("Authorization", "Bearer caller-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SerpBridgeClient::builder()
            .base_url(server.uri())
            .api_key("default-key")
            .build()
            .unwrap();

        let token = ApiToken::new("caller-key").unwrap();
        client
            .call_with_token("get_account_usage", &Value::Null, Some(&token))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_credential_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = SerpBridgeClient::builder()
            .base_url(server.uri())
            .build()
            .unwrap();

        let result = client.call("get_account_usage", &Value::Null).await;
        assert!(matches!(result, Err(SerpBridgeError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_invalid_arguments_send_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = SerpBridgeClient::builder()
            .base_url(server.uri())
            .api_key("k")
            .build()
            .unwrap();

        let result = client.call("fetch_serp", &json!({})).await;
        assert!(matches!(result, Err(SerpBridgeError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let client = SerpBridgeClient::builder().api_key("k").build().unwrap();
        let result = client.call("get_weather", &json!({})).await;
        assert!(matches!(result, Err(SerpBridgeError::UnknownTool(name)) if name == "get_weather"));
    }
}

//! Configuration types for the serpbridge SDK.

use serpbridge_core::ApiToken;
use std::time::Duration;
use url::Url;

/// Default base URL of the upstream API.
pub const DEFAULT_BASE_URL: &str = "https://api.serpbridge.dev/v1/";

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the upstream API, always ending in `/`.
    pub base_url: Url,
    /// Default API key, used when a call does not bring its own.
    pub api_key: Option<ApiToken>,
    /// Request timeout.
    pub timeout: Duration,
    /// `User-Agent` sent upstream.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("serpbridge/{}", env!("CARGO_PKG_VERSION"))
}

/// Ensure the base path ends with a slash so relative paths append to it
/// instead of replacing its last segment.
pub fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_new() {
        let url = Url::parse("https://example.com/v1/").unwrap();
        let config = ClientConfig::new(url.clone());

        assert_eq!(config.base_url, url);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("serpbridge/"));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = normalize_base_url(Url::parse("https://example.com/api/v2").unwrap());
        assert_eq!(url.as_str(), "https://example.com/api/v2/");

        let url = normalize_base_url(Url::parse("https://example.com").unwrap());
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_base_url_drops_query() {
        let url = normalize_base_url(Url::parse("https://example.com/v1?debug=1#x").unwrap());
        assert_eq!(url.as_str(), "https://example.com/v1/");
    }

    #[test]
    fn test_default_base_url_parses() {
        let url = Url::parse(DEFAULT_BASE_URL).unwrap();
        assert_eq!(normalize_base_url(url.clone()), url);
    }
}

//! Error types for the serpbridge SDK.

use serpbridge_core::ArgumentError;

/// Result type for SDK operations.
pub type SerpBridgeResult<T> = Result<T, SerpBridgeError>;

/// Error types that can occur when calling the upstream API.
#[derive(Debug, thiserror::Error)]
pub enum SerpBridgeError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream API answered with a non-success status.
    #[error("Upstream API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream request timed out.
    #[error("Request timed out")]
    Timeout,

    /// No API key was supplied by the caller or the configuration.
    #[error("Missing API credential")]
    MissingCredential,

    /// Tool name not present in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments do not match the endpoint's schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] ArgumentError),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SerpBridgeError {
    /// Create an API error from a status code and response body.
    ///
    /// The body text is kept as-is; an empty body falls back to the
    /// canonical reason phrase.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        } else {
            body.to_string()
        };
        Self::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status of the upstream response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_response_keeps_body() {
        let err = SerpBridgeError::from_response(StatusCode::PAYMENT_REQUIRED, "{\"error\":\"out of credits\"}");
        assert_eq!(err.status(), Some(402));
        assert_eq!(
            err.to_string(),
            "Upstream API error (status 402): {\"error\":\"out of credits\"}"
        );
    }

    #[test]
    fn test_from_response_empty_body() {
        let err = SerpBridgeError::from_response(StatusCode::BAD_GATEWAY, "  ");
        assert_eq!(err.to_string(), "Upstream API error (status 502): Bad Gateway");
    }

    #[test]
    fn test_status_only_for_api_errors() {
        assert_eq!(SerpBridgeError::Timeout.status(), None);
        assert_eq!(SerpBridgeError::MissingCredential.status(), None);
    }
}

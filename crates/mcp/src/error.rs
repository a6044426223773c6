//! Tool execution errors and their JSON-RPC mapping.

use crate::protocol::JsonRpcError;
use serde_json::json;
use serpbridge_sdk::SerpBridgeError;

/// Failure of a single `tools/call`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments did not match the tool's input schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// No bearer token on the request and no fallback key configured.
    #[error("Missing API credential")]
    Unauthorized,

    /// The upstream API answered with a non-success status.
    #[error("Upstream API error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// The upstream request did not complete in time.
    #[error("Upstream request timed out")]
    Timeout,

    /// Transport or other unexpected failure.
    #[error("{0}")]
    Internal(String),
}

impl From<SerpBridgeError> for ToolError {
    fn from(err: SerpBridgeError) -> Self {
        match err {
            SerpBridgeError::InvalidArguments(e) => Self::InvalidArguments(e.to_string()),
            SerpBridgeError::MissingCredential => Self::Unauthorized,
            SerpBridgeError::Api { status, message } => Self::Upstream { status, message },
            SerpBridgeError::Timeout => Self::Timeout,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl ToolError {
    pub fn to_rpc_error(&self) -> JsonRpcError {
        match self {
            Self::InvalidArguments(_) => JsonRpcError::invalid_params(self.to_string()),
            Self::Unauthorized => JsonRpcError::unauthorized(self.to_string()),
            Self::Upstream { status, message } => JsonRpcError::internal_error(self.to_string())
                .with_data(json!({ "status": status, "body": message })),
            Self::Timeout | Self::Internal(_) => JsonRpcError::internal_error(self.to_string()),
        }
    }
}

//! Account API endpoints.

use crate::client::SerpBridgeClient;
use crate::error::SerpBridgeResult;
use serde_json::Value;

/// Account API for credit usage.
pub struct AccountApi<'a> {
    client: &'a SerpBridgeClient,
}

impl<'a> AccountApi<'a> {
    pub(crate) fn new(client: &'a SerpBridgeClient) -> Self {
        Self { client }
    }

    /// Remaining credits and usage of the calling key.
    pub async fn usage(&self) -> SerpBridgeResult<Value> {
        self.client.call("get_account_usage", &Value::Null).await?.json()
    }
}

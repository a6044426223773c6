// Tools backed by one upstream REST endpoint each

use crate::context::RequestContext;
use crate::error::ToolError;
use crate::protocol::{CallToolResult, ToolAnnotations, ToolSchema};
use crate::tools::{Tool, ToolRegistry};
use serde_json::Value;
use serpbridge_core::{catalog, EndpointSpec, ToolCategory};
use serpbridge_sdk::SerpBridgeClient;
use std::sync::Arc;

/// One catalog entry exposed as an MCP tool.
///
/// A call maps the arguments onto the endpoint, sends exactly one request and
/// returns the upstream body untouched as a single text item.
pub struct UpstreamTool {
    spec: &'static EndpointSpec,
    client: Arc<SerpBridgeClient>,
}

impl UpstreamTool {
    pub fn new(spec: &'static EndpointSpec, client: Arc<SerpBridgeClient>) -> Self {
        Self { spec, client }
    }

    pub fn spec(&self) -> &'static EndpointSpec {
        self.spec
    }
}

#[async_trait::async_trait]
impl Tool for UpstreamTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.spec.name.to_string(),
            title: Some(self.spec.title.to_string()),
            description: self.spec.description.to_string(),
            input_schema: self.spec.input_schema(),
            annotations: Some(ToolAnnotations {
                title: Some(self.spec.title.to_string()),
                read_only_hint: true,
                open_world_hint: true,
            }),
        }
    }

    async fn execute(
        &self,
        arguments: Value,
        ctx: &RequestContext,
    ) -> Result<CallToolResult, ToolError> {
        let response = self
            .client
            .execute(self.spec, &arguments, ctx.token.as_ref())
            .await?;
        tracing::debug!(status = response.status, bytes = response.body.len(), "upstream ok");
        Ok(CallToolResult::text(response.body))
    }

    fn category(&self) -> ToolCategory {
        self.spec.category
    }
}

/// Registry holding the whole catalog, in catalog order.
pub fn upstream_registry(client: Arc<SerpBridgeClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for spec in catalog() {
        registry.register(Arc::new(UpstreamTool::new(spec, client.clone())));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serpbridge_core::ApiToken;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>) -> Arc<SerpBridgeClient> {
        let mut builder = SerpBridgeClient::builder().base_url(server.uri());
        if let Some(key) = key {
            builder = builder.api_key(key);
        }
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_registry_covers_catalog() {
        let client = Arc::new(SerpBridgeClient::builder().build().unwrap());
        let registry = upstream_registry(client);
        assert_eq!(registry.len(), catalog().len());

        let schemas = registry.list_schemas();
        for (schema, spec) in schemas.iter().zip(catalog()) {
            assert_eq!(schema.name, spec.name);
            assert_eq!(schema.input_schema, spec.input_schema());
            let annotations = schema.annotations.as_ref().unwrap();
            assert!(annotations.read_only_hint);
            assert!(annotations.open_world_hint);
        }
    }

    #[tokio::test]
    async fn test_body_is_returned_verbatim() {
        let server = MockServer::start().await;
        let body = "{\"domain\":\"example.com\",  \"rank\": 12}";

        Mock::given(method("GET"))
            .and(path("/domains/example.com"))
            .and(header("authorization", "Bearer caller-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let registry = upstream_registry(client_for(&server, Some("server-key")));
        let tool = registry.get("get_domain_info").unwrap();
        let ctx = RequestContext::default().with_token(ApiToken::new("caller-token").unwrap());

        let result = tool.execute(json!({ "domain": "example.com" }), &ctx).await.unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content, vec![crate::protocol::ToolContent::text(body)]);
    }

    #[tokio::test]
    async fn test_post_tool_sends_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/keywords/volume"))
            .and(body_json(json!({ "keywords": ["a", "b"] })))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let registry = upstream_registry(client_for(&server, Some("server-key")));
        let tool = registry.get("keyword_volume").unwrap();
        tool.execute(json!({ "keywords": ["a", "b"] }), &RequestContext::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_no_credential_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let registry = upstream_registry(client_for(&server, None));
        let tool = registry.get("get_account_usage").unwrap();
        let err = tool
            .execute(Value::Null, &RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Unauthorized));
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "x"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let registry = upstream_registry(client_for(&server, Some("k")));
        let tool = registry.get("fetch_serp").unwrap();
        let err = tool
            .execute(json!({ "query": "x", "bogus": 1 }), &RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}

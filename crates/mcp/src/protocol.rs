// MCP protocol types and definitions (JSON-RPC 2.0 over stdio or HTTP)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Most recent protocol revision this server speaks
pub const PROTOCOL_VERSION_LATEST: &str = "2025-06-18";

/// All protocol revisions accepted during `initialize`, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// JSON-RPC 2.0 Request (a notification when `id` is absent)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: impl Serialize) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params: serde_json::to_value(params).ok(),
        }
    }

    pub fn notification(method: impl Into<String>, params: impl Serialize) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: method.into(),
            params: serde_json::to_value(params).ok(),
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: impl Into<Value>, result: impl Serialize) -> Self {
        let id = id.into();
        match serde_json::to_value(result) {
            Ok(result) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(result),
                error: None,
            },
            Err(e) => Self::error(
                id,
                JsonRpcError::internal_error(format!("Failed to serialize result: {}", e)),
            ),
        }
    }

    pub fn error(id: impl Into<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const UNAUTHORIZED: i32 = -32001;
pub const NOT_INITIALIZED: i32 = -32002;

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self::custom(PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::custom(INVALID_REQUEST, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::custom(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::custom(METHOD_NOT_FOUND, format!("Unknown tool: {}", name))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::custom(INVALID_PARAMS, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::custom(INTERNAL_ERROR, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::custom(UNAUTHORIZED, message)
    }

    pub fn not_initialized() -> Self {
        Self::custom(NOT_INITIALIZED, "Server not initialized")
    }

    pub fn custom(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A decoded inbound message
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcRequest),
    /// Response to a server-initiated request; this server never sends any,
    /// so these are accepted and dropped
    Response,
}

/// Classify a single JSON value received from a client.
///
/// Batches are not supported and yield an invalid-request error.
pub fn parse_message(value: Value) -> Result<IncomingMessage, JsonRpcError> {
    let Value::Object(ref obj) = value else {
        return Err(if value.is_array() {
            JsonRpcError::invalid_request("Batch requests are not supported")
        } else {
            JsonRpcError::invalid_request("Invalid Request")
        });
    };

    if !obj.contains_key("method") {
        if obj.contains_key("result") || obj.contains_key("error") {
            return Ok(IncomingMessage::Response);
        }
        return Err(JsonRpcError::invalid_request("Missing method"));
    }

    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|e| JsonRpcError::invalid_request(format!("Invalid Request: {}", e)))?;

    if request.jsonrpc != "2.0" {
        return Err(JsonRpcError::invalid_request("Unsupported jsonrpc version"));
    }

    Ok(if request.is_notification() {
        IncomingMessage::Notification(request)
    } else {
        IncomingMessage::Request(request)
    })
}

/// Best-effort request id, for error replies to malformed messages
pub fn request_id(value: &Value) -> Value {
    value.get("id").cloned().unwrap_or(Value::Null)
}

// MCP-specific protocol messages

/// Tool definition for MCP
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub input_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

/// Behavioural hints shown to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub read_only_hint: bool,
    pub open_world_hint: bool,
}

/// List tools response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    pub tools: Vec<ToolSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Call tool request params
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Call tool response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: Some(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Initialize request params
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Initialize response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Pick the protocol revision for a session: the client's if supported,
/// otherwise the latest one we speak.
pub fn negotiate_protocol_version(requested: &str) -> &'static str {
    SUPPORTED_PROTOCOL_VERSIONS
        .iter()
        .find(|v| **v == requested)
        .copied()
        .unwrap_or(PROTOCOL_VERSION_LATEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_and_notification() {
        let msg = parse_message(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})).unwrap();
        assert!(matches!(msg, IncomingMessage::Request(r) if r.method == "ping"));

        let msg = parse_message(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .unwrap();
        assert!(matches!(msg, IncomingMessage::Notification(_)));

        let msg = parse_message(json!({"jsonrpc": "2.0", "id": 7, "result": {}})).unwrap();
        assert!(matches!(msg, IncomingMessage::Response));
    }

    #[test]
    fn test_parse_rejects_batches_and_garbage() {
        let err = parse_message(json!([{"jsonrpc": "2.0", "id": 1, "method": "ping"}])).unwrap_err();
        assert_eq!(err.code, INVALID_REQUEST);

        let err = parse_message(json!("hello")).unwrap_err();
        assert_eq!(err.code, INVALID_REQUEST);

        let err = parse_message(json!({"jsonrpc": "1.0", "id": 1, "method": "ping"})).unwrap_err();
        assert_eq!(err.code, INVALID_REQUEST);

        let err = parse_message(json!({"jsonrpc": "2.0", "id": 1})).unwrap_err();
        assert_eq!(err.code, INVALID_REQUEST);
    }

    #[test]
    fn test_call_tool_result_wire_format() {
        let value = serde_json::to_value(CallToolResult::text("{\"a\":1}")).unwrap();
        assert_eq!(
            value,
            json!({
                "content": [{ "type": "text", "text": "{\"a\":1}" }],
                "isError": false
            })
        );
    }

    #[test]
    fn test_tool_schema_wire_format() {
        let schema = ToolSchema {
            name: "fetch_serp".to_string(),
            title: Some("Search results".to_string()),
            description: "d".to_string(),
            input_schema: json!({"type": "object"}),
            annotations: Some(ToolAnnotations {
                title: None,
                read_only_hint: true,
                open_world_hint: true,
            }),
        };
        let value = serde_json::to_value(schema).unwrap();
        assert_eq!(value["inputSchema"], json!({"type": "object"}));
        assert_eq!(value["annotations"]["readOnlyHint"], true);
        assert!(value.get("input_schema").is_none());
    }

    #[test]
    fn test_initialize_params_are_lenient() {
        let params: InitializeParams =
            serde_json::from_value(json!({ "protocolVersion": "2025-03-26" })).unwrap();
        assert_eq!(params.protocol_version, "2025-03-26");
        assert!(params.client_info.is_none());
    }

    #[test]
    fn test_negotiate_protocol_version() {
        assert_eq!(negotiate_protocol_version("2024-11-05"), "2024-11-05");
        assert_eq!(negotiate_protocol_version("1999-01-01"), PROTOCOL_VERSION_LATEST);
    }

    #[test]
    fn test_error_response_serialization() {
        let resp = JsonRpcResponse::error(json!(3), JsonRpcError::unknown_tool("nope"));
        let value = serde_json::to_value(resp).unwrap();
        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(value["error"]["message"], "Unknown tool: nope");
        assert!(value.get("result").is_none());
    }
}

// MCP server: session lifecycle and method dispatch

use crate::context::RequestContext;
use crate::protocol::*;
use crate::tools::ToolRegistry;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Instrument;

/// Lifecycle phase of one MCP session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for `initialize`
    New,
    /// `initialize` answered, `notifications/initialized` not seen yet
    Initialized,
    Ready,
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    protocol_version: Option<&'static str>,
    client_info: Option<ClientInfo>,
}

/// State of one client connection (stdio process or HTTP session).
///
/// The lock is only taken for phase bookkeeping and is never held across a
/// tool call.
#[derive(Debug)]
pub struct McpSession {
    state: Mutex<SessionState>,
}

impl McpSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState {
                phase: SessionPhase::New,
                protocol_version: None,
                client_info: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase
    }

    /// Tool calls are accepted once `initialize` has been answered
    pub fn is_initialized(&self) -> bool {
        self.phase() != SessionPhase::New
    }

    pub fn protocol_version(&self) -> Option<&'static str> {
        self.state().protocol_version
    }

    pub fn client_info(&self) -> Option<ClientInfo> {
        self.state().client_info.clone()
    }
}

impl Default for McpSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Protocol front end shared by every transport.
///
/// Holds no per-caller state: credentials arrive with each request in a
/// [`RequestContext`].
pub struct McpServer {
    info: ServerInfo,
    instructions: Option<String>,
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            info: ServerInfo {
                name: "serpbridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "SEO and search data tools: backlinks, live SERPs, domain metrics, \
                 page scraping and keyword research. Results are the raw JSON of the \
                 upstream API."
                    .to_string(),
            ),
            registry: Arc::new(registry),
        }
    }

    pub fn with_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.info = ServerInfo {
            name: name.into(),
            version: version.into(),
        };
        self
    }

    pub fn with_instructions(mut self, instructions: Option<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn supports_protocol_version(version: &str) -> bool {
        SUPPORTED_PROTOCOL_VERSIONS.contains(&version)
    }

    /// Handle one raw JSON value. Used by transports that do no framing of
    /// their own.
    pub async fn handle_message(
        &self,
        session: &McpSession,
        message: Value,
        ctx: &RequestContext,
    ) -> Option<JsonRpcResponse> {
        let id = request_id(&message);
        match parse_message(message) {
            Ok(IncomingMessage::Request(req)) | Ok(IncomingMessage::Notification(req)) => {
                self.handle(session, req, ctx).await
            }
            Ok(IncomingMessage::Response) => {
                tracing::debug!("ignoring client response");
                None
            }
            Err(error) => Some(JsonRpcResponse::error(id, error)),
        }
    }

    /// Dispatch one request or notification. Notifications never produce a
    /// response.
    pub async fn handle(
        &self,
        session: &McpSession,
        request: JsonRpcRequest,
        ctx: &RequestContext,
    ) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(session, &request);
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => self.initialize(session, request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(session),
            "tools/call" => self.call_tool(session, request.params, ctx).await,
            other => {
                tracing::debug!(method = other, "unknown method");
                Err(JsonRpcError::method_not_found(other))
            }
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_notification(&self, session: &McpSession, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => {
                let mut state = session.state();
                if state.phase == SessionPhase::Initialized {
                    state.phase = SessionPhase::Ready;
                    tracing::debug!("session ready");
                }
            }
            other => tracing::debug!(method = other, "ignoring notification"),
        }
    }

    fn initialize(&self, session: &McpSession, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)))?;

        let version = negotiate_protocol_version(&params.protocol_version);
        {
            let mut state = session.state();
            if state.phase != SessionPhase::New {
                return Err(JsonRpcError::invalid_request("Session already initialized"));
            }
            state.phase = SessionPhase::Initialized;
            state.protocol_version = Some(version);
            state.client_info = params.client_info.clone();
        }

        tracing::info!(
            client = params.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown"),
            requested = %params.protocol_version,
            negotiated = version,
            "session initialized"
        );

        let result = InitializeResult {
            protocol_version: version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
            instructions: self.instructions.clone(),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }

    fn list_tools(&self, session: &McpSession) -> Result<Value, JsonRpcError> {
        if !session.is_initialized() {
            return Err(JsonRpcError::not_initialized());
        }
        let result = ListToolsResult {
            tools: self.registry.list_schemas(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }

    async fn call_tool(
        &self,
        session: &McpSession,
        params: Option<Value>,
        ctx: &RequestContext,
    ) -> Result<Value, JsonRpcError> {
        if !session.is_initialized() {
            return Err(JsonRpcError::not_initialized());
        }

        let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::unknown_tool(&params.name))?;

        let span = tracing::info_span!(
            "tool_call",
            tool = %params.name,
            session = ctx.session_id.as_ref().map(|s| s.as_str()).unwrap_or("-"),
        );

        let arguments = params.arguments.unwrap_or(Value::Null);
        let outcome = async {
            let started = std::time::Instant::now();
            let outcome = tool.execute(arguments, ctx).await;
            match &outcome {
                Ok(_) => tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "tool call ok"),
                Err(e) => tracing::warn!(error = %e, "tool call failed"),
            }
            outcome
        }
        .instrument(span)
        .await;

        let result = outcome.map_err(|e| e.to_rpc_error())?;
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
    }
}

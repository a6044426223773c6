// Streamable HTTP transport for MCP (JSON responses, no SSE stream)

use super::{ApiError, ApiResult, AppState};
use crate::middleware::CallerToken;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::Value;
use serpbridge_core::SessionId;
use serpbridge_mcp::protocol::{parse_message, request_id, IncomingMessage, JsonRpcError, JsonRpcResponse};
use serpbridge_mcp::{McpServer, RequestContext};

pub const SESSION_HEADER: &str = "mcp-session-id";
pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn jsonrpc_response(resp: JsonRpcResponse, session_id: Option<&SessionId>) -> Response {
    let mut response = (StatusCode::OK, Json(resp)).into_response();
    if let Some(value) = session_id.and_then(|sid| HeaderValue::from_str(sid.as_str()).ok()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// POST: one JSON-RPC message per request
pub async fn handle_post(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerToken>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    if let Some(version) = header_str(&headers, PROTOCOL_VERSION_HEADER) {
        if !McpServer::supports_protocol_version(version) {
            return Err(ApiError::bad_request(format!(
                "Unsupported MCP-Protocol-Version: {}",
                version
            )));
        }
    }

    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, JsonRpcError::parse_error().with_data(e.to_string().into())))?;
    let id = request_id(&value);
    let message = parse_message(value)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e).with_id(id.clone()))?;

    let session_header = header_str(&headers, SESSION_HEADER);

    // Initialize without a session header starts a new session
    if let (IncomingMessage::Request(request), None) = (&message, session_header) {
        if request.method == "initialize" {
            let Some((session_id, session)) = state.sessions.create().await else {
                return Err(ApiError::too_many_sessions().with_id(id));
            };
            let ctx = RequestContext::new(caller.0, Some(session_id.clone()));
            let resp = state.mcp.handle(&session, request.clone(), &ctx).await;

            return Ok(match resp {
                Some(resp) if resp.error.is_none() => {
                    tracing::info!(session = %session_id, "session created");
                    jsonrpc_response(resp, Some(&session_id))
                }
                Some(resp) => {
                    state.sessions.remove(session_id.as_str()).await;
                    jsonrpc_response(resp, None)
                }
                None => StatusCode::ACCEPTED.into_response(),
            });
        }
    }

    // Other messages require a session
    let Some(sid) = session_header else {
        return Err(ApiError::bad_request("Missing Mcp-Session-Id header").with_id(id));
    };
    let Some(session) = state.sessions.get(sid).await else {
        return Err(ApiError::session_not_found().with_id(id));
    };
    let session_id = SessionId::new(sid);
    let ctx = RequestContext::new(caller.0, Some(session_id.clone()));

    match message {
        IncomingMessage::Response => Ok(StatusCode::ACCEPTED.into_response()),
        IncomingMessage::Notification(notification) => {
            state.mcp.handle(&session, notification, &ctx).await;
            Ok(StatusCode::ACCEPTED.into_response())
        }
        IncomingMessage::Request(request) => Ok(match state.mcp.handle(&session, request, &ctx).await {
            Some(resp) => jsonrpc_response(resp, Some(&session_id)),
            None => StatusCode::ACCEPTED.into_response(),
        }),
    }
}

/// GET would open a server-to-client SSE stream, which this server does not offer
pub async fn handle_get() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST, DELETE")],
        "SSE stream not supported",
    )
}

/// DELETE terminates a session
pub async fn handle_delete(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let Some(sid) = header_str(&headers, SESSION_HEADER) else {
        return Err(ApiError::bad_request("Missing Mcp-Session-Id header"));
    };
    if state.sessions.remove(sid).await {
        tracing::info!(session = sid, "session terminated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::session_not_found())
    }
}

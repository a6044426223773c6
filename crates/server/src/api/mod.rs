use crate::middleware::{require_bearer, AuthPolicy};
use crate::sessions::SessionStore;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use serpbridge_mcp::protocol::{JsonRpcError, JsonRpcResponse};
use serpbridge_mcp::McpServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

pub mod mcp;

/// Serve over plain HTTP until shutdown
pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::shutdown_signal())
        .await?;

    Ok(())
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: Arc<McpServer>,
    pub sessions: Arc<SessionStore>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(mcp: McpServer) -> Self {
        Self {
            mcp: Arc::new(mcp),
            sessions: Arc::new(SessionStore::new()),
            started_at: Utc::now(),
        }
    }

    /// Cap the number of concurrently open sessions
    pub fn with_session_limit(mut self, limit: usize) -> Self {
        self.sessions = Arc::new(SessionStore::with_limit(limit));
        self
    }
}

/// Create the HTTP router: the MCP endpoint behind bearer auth plus health
pub fn create_router(state: AppState, mcp_path: &str, auth: AuthPolicy) -> Router {
    let mcp_routes = Router::new()
        .route(
            mcp_path,
            post(mcp::handle_post)
                .get(mcp::handle_get)
                .delete(mcp::handle_delete),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_bearer));

    Router::new()
        .route("/health", get(health_check))
        .merge(mcp_routes)
        // Middleware; default spans leave headers out so tokens stay out of logs
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "serpbridge",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.len().await,
        "started_at": state.started_at.to_rfc3339(),
    }))
}

/// Transport-level failure answered with a JSON-RPC error body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    id: Value,
    error: JsonRpcError,
}

impl ApiError {
    pub fn new(status: StatusCode, error: JsonRpcError) -> Self {
        Self {
            status,
            id: Value::Null,
            error,
        }
    }

    pub fn with_id(mut self, id: Value) -> Self {
        self.id = id;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, JsonRpcError::invalid_request(message))
    }

    pub fn too_many_sessions() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            JsonRpcError::internal_error("Too many open sessions"),
        )
    }

    pub fn session_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            JsonRpcError::invalid_request("Session not found"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(JsonRpcResponse::error(self.id, self.error))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

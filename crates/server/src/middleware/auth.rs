use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serpbridge_core::ApiToken;
use serpbridge_mcp::protocol::{JsonRpcError, JsonRpcResponse};
use serde_json::Value;

/// Bearer token the caller presented, if any. Inserted into request
/// extensions by [`require_bearer`].
#[derive(Debug, Clone, Default)]
pub struct CallerToken(pub Option<ApiToken>);

/// Whether requests without a bearer token may fall back to the server key
#[derive(Debug, Clone, Copy)]
pub struct AuthPolicy {
    pub has_fallback_key: bool,
}

/// Extract the bearer token from the authorization header
pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<ApiToken> {
    let auth_header = headers.get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    ApiToken::from_authorization(auth_str)
}

/// Bearer enforcement middleware.
///
/// A request without an Authorization header is rejected unless the server
/// has its own upstream key configured. A header that is present but not a
/// usable bearer token is always rejected.
pub async fn require_bearer(
    State(policy): State<AuthPolicy>,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = req.headers().contains_key(header::AUTHORIZATION);
    let token = extract_token_from_headers(req.headers());

    if presented && token.is_none() {
        tracing::debug!("rejecting malformed authorization header");
        return unauthorized();
    }

    if token.is_none() && !policy.has_fallback_key {
        tracing::debug!("rejecting request without bearer token");
        return unauthorized();
    }

    req.extensions_mut().insert(CallerToken(token));
    next.run(req).await
}

fn unauthorized() -> Response {
    let body = JsonRpcResponse::error(
        Value::Null,
        JsonRpcError::unauthorized("Missing or invalid Authorization bearer token"),
    );
    let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

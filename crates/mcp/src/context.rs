// Per-request context handed to tools

use serpbridge_core::{ApiToken, SessionId};

/// Everything a tool call needs to know about the caller.
///
/// Built fresh for every inbound request; nothing in here outlives it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Bearer token from the inbound `Authorization` header, if any
    pub token: Option<ApiToken>,
    pub session_id: Option<SessionId>,
}

impl RequestContext {
    pub fn new(token: Option<ApiToken>, session_id: Option<SessionId>) -> Self {
        Self { token, session_id }
    }

    pub fn with_token(mut self, token: ApiToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

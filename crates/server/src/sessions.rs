use serpbridge_core::SessionId;
use serpbridge_mcp::McpSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default bound on concurrently open sessions
pub const MAX_SESSIONS: usize = 10_000;

/// Live MCP sessions of the HTTP transport.
///
/// Ids are random v4 UUIDs and are never handed out twice; a removed id
/// stays unknown. The store holds at most `limit` sessions at a time.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<McpSession>>>,
    limit: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limit(MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            limit,
        }
    }

    /// Open a new session, or `None` when the store is full
    pub async fn create(&self) -> Option<(SessionId, Arc<McpSession>)> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.limit {
            tracing::warn!(limit = self.limit, "session limit reached");
            return None;
        }

        let session = Arc::new(McpSession::new());
        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }
        sessions.insert(id.clone(), session.clone());
        Some((id, session))
    }

    pub async fn get(&self, id: &str) -> Option<Arc<McpSession>> {
        self.sessions.read().await.get(&SessionId::new(id)).cloned()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions
            .write()
            .await
            .remove(&SessionId::new(id))
            .is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let (a, session_a) = store.create().await.unwrap();
        let (b, _) = store.create().await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);

        let found = store.get(a.as_str()).await.unwrap();
        assert!(Arc::ptr_eq(&found, &session_a));

        assert!(store.remove(a.as_str()).await);
        assert!(!store.remove(a.as_str()).await);
        assert!(store.get(a.as_str()).await.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_limit_refuses_new_sessions_until_one_closes() {
        let store = SessionStore::with_limit(2);
        let (a, _) = store.create().await.unwrap();
        store.create().await.unwrap();

        assert!(store.create().await.is_none());
        assert_eq!(store.len().await, 2);

        assert!(store.remove(a.as_str()).await);
        assert!(store.create().await.is_some());
    }
}

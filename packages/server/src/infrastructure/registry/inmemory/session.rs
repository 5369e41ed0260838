//! InMemory Session Registry 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{SessionId, SessionRegistry, User};

/// インメモリ Session Registry 実装
///
/// キーをまたぐトランザクションは不要なため、単一の RwLock で十分です。
#[derive(Default)]
pub struct InMemorySessionRegistry {
    sessions: RwLock<HashMap<SessionId, User>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存されているセッション数
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn save(&self, session_id: SessionId, user: User) -> Option<User> {
        let previous = self.sessions.write().await.insert(session_id.clone(), user);
        tracing::debug!("Saved session '{}'", session_id);
        previous
    }

    async fn lookup(&self, session_id: &SessionId) -> Option<User> {
        self.sessions.read().await.get(session_id).cloned()
    }

    async fn remove(&self, session_id: &SessionId) -> Option<User> {
        let removed = self.sessions.write().await.remove(session_id);
        if removed.is_some() {
            tracing::debug!("Removed session '{}'", session_id);
        }
        removed
    }
}

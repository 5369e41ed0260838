//! WebSocket を使った Broadcaster 実装
//!
//! ## 責務
//!
//! - 接続（セッション）ごとの `UnboundedSender` を管理
//! - トピックの購読管理と、購読者への一斉配信
//! - ユーザー ID → セッションの紐付けと、個別キューへの配信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信内容は `OutboundFrame`（destination + body）の JSON です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{BroadcastError, Broadcaster, SessionId, Topic, UserId, UserQueue},
    infrastructure::dto::websocket::OutboundFrame,
};

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Default)]
struct Connections {
    /// Key: session, Value: 送信チャンネル
    senders: HashMap<SessionId, PusherChannel>,
    /// Key: topic, Value: 購読しているセッション（購読順）
    subscriptions: HashMap<Topic, Vec<SessionId>>,
    /// Key: user, Value: そのユーザーが join したセッション
    users: HashMap<UserId, SessionId>,
}

/// WebSocket を使った Broadcaster 実装
///
/// ## 使用例
///
/// ```ignore
/// let broadcaster = WebSocketBroadcaster::new();
/// let (tx, rx) = mpsc::unbounded_channel();
/// broadcaster.register_session(session_id.clone(), tx).await;
/// broadcaster.subscribe(&session_id, Topic::Messages(RoomId::new(5))).await;
/// broadcaster.publish(Topic::Messages(RoomId::new(5)), "{\"message\":\"hi\"}").await?;
/// ```
#[derive(Default)]
pub struct WebSocketBroadcaster {
    connections: Mutex<Connections>,
}

impl WebSocketBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい接続を登録
    pub async fn register_session(&self, session_id: SessionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Session '{}' registered to broadcaster", session_id);
        connections.senders.insert(session_id, sender);
    }

    /// 接続を登録解除し、購読とユーザーの紐付けもすべて破棄
    pub async fn unregister_session(&self, session_id: &SessionId) {
        let mut connections = self.connections.lock().await;
        connections.senders.remove(session_id);
        connections.subscriptions.retain(|_, subscribers| {
            subscribers.retain(|id| id != session_id);
            !subscribers.is_empty()
        });
        connections.users.retain(|_, id| id != session_id);
        tracing::debug!("Session '{}' unregistered from broadcaster", session_id);
    }

    /// トピックを購読（重複購読は無視）
    pub async fn subscribe(&self, session_id: &SessionId, topic: Topic) {
        let mut connections = self.connections.lock().await;
        if !connections.senders.contains_key(session_id) {
            tracing::warn!("Unknown session '{}' tried to subscribe to {}", session_id, topic);
            return;
        }
        let subscribers = connections.subscriptions.entry(topic).or_default();
        if !subscribers.contains(session_id) {
            subscribers.push(session_id.clone());
            tracing::debug!("Session '{}' subscribed to {}", session_id, topic);
        }
    }

    /// トピックの購読を解除
    pub async fn unsubscribe(&self, session_id: &SessionId, topic: Topic) {
        let mut connections = self.connections.lock().await;
        if let Some(subscribers) = connections.subscriptions.get_mut(&topic) {
            subscribers.retain(|id| id != session_id);
            if subscribers.is_empty() {
                connections.subscriptions.remove(&topic);
            }
            tracing::debug!("Session '{}' unsubscribed from {}", session_id, topic);
        }
    }

    /// ユーザーの個別キューをセッションに紐付け（既存の紐付けは上書き）
    pub async fn bind_user(&self, user_id: UserId, session_id: SessionId) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("User '{}' bound to session '{}'", user_id, session_id);
        connections.users.insert(user_id, session_id);
    }

    /// トピックの購読者数
    pub async fn subscriber_count(&self, topic: Topic) -> usize {
        let connections = self.connections.lock().await;
        connections.subscriptions.get(&topic).map_or(0, Vec::len)
    }

    fn encode(destination: String, payload: &str) -> Result<String, BroadcastError> {
        serde_json::to_string(&OutboundFrame {
            destination,
            body: payload,
        })
        .map_err(|e| BroadcastError::PushFailed(e.to_string()))
    }
}

#[async_trait]
impl Broadcaster for WebSocketBroadcaster {
    async fn publish(&self, topic: Topic, payload: &str) -> Result<(), BroadcastError> {
        let frame = Self::encode(topic.to_string(), payload)?;
        let connections = self.connections.lock().await;

        let Some(subscribers) = connections.subscriptions.get(&topic) else {
            tracing::debug!("No subscribers for {}", topic);
            return Ok(());
        };

        for session_id in subscribers {
            match connections.senders.get(session_id) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!("Failed to push {} to session '{}': {}", topic, session_id, e);
                    }
                }
                None => {
                    tracing::warn!("Session '{}' not found during publish, skipping", session_id);
                }
            }
        }
        tracing::debug!("Published to {} ({} subscribers)", topic, subscribers.len());

        Ok(())
    }

    async fn send_to_user(
        &self,
        user_id: &UserId,
        queue: UserQueue,
        payload: &str,
    ) -> Result<(), BroadcastError> {
        let frame = Self::encode(queue.to_string(), payload)?;
        let connections = self.connections.lock().await;

        let sender = connections
            .users
            .get(user_id)
            .and_then(|session_id| connections.senders.get(session_id))
            .ok_or_else(|| BroadcastError::UserNotConnected(user_id.to_string()))?;

        sender
            .send(frame)
            .map_err(|e| BroadcastError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed {} to user '{}'", queue, user_id);
        Ok(())
    }
}

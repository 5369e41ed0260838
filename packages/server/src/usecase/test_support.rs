//! UseCase テスト用のヘルパー

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastError, Broadcaster, RoomId, ScreenName, Timestamp, Topic, User, UserId, UserQueue,
};

/// 配信内容を (宛先, 本文) として記録する Broadcaster
#[derive(Default)]
pub(crate) struct RecordingBroadcaster {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingBroadcaster {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 記録された全ての配信
    pub(crate) async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    /// 指定した宛先への配信本文
    pub(crate) async fn sent_to(&self, destination: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == destination)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn publish(&self, topic: Topic, payload: &str) -> Result<(), BroadcastError> {
        self.sent
            .lock()
            .await
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }

    async fn send_to_user(
        &self,
        user_id: &UserId,
        queue: UserQueue,
        payload: &str,
    ) -> Result<(), BroadcastError> {
        self.sent
            .lock()
            .await
            .push((format!("{queue}@{user_id}"), payload.to_string()));
        Ok(())
    }
}

pub(crate) fn user(id: &str, name: &str, room: i64) -> User {
    User::new(
        UserId::new(id.to_string()).unwrap(),
        ScreenName::new(name.to_string()).unwrap(),
        RoomId::new(room),
        Timestamp::new(1000),
    )
}

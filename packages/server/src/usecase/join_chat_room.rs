//! UseCase: 入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatRoomUseCase::execute() メソッド
//! - セッションの保存、入室、結果通知と在室者リストの配信
//!
//! ### なぜこのテストが必要か
//! - 満室のルームに入れないこと、拒否時に他の在室者へ配信しないことを保証
//! - 範囲外のルーム ID では何も通知しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：入室成功
//! - 異常系：満室、範囲外のルーム ID
//! - エッジケース：同じセッションでの再 join

use std::sync::Arc;

use serde_json::json;

use crate::domain::{
    Broadcaster, JoinOutcome, RoomRegistry, SessionId, SessionRegistry, User, UserQueue,
};

use super::{leave_chat_room::LeaveChatRoomUseCase, occupants::publish_occupant_names};

/// 満室時に返す理由
const ROOM_FULL_MESSAGE: &str = "Chatroom is full";

/// 入室のユースケース
pub struct JoinChatRoomUseCase {
    /// SessionRegistry（セッション管理の抽象化）
    sessions: Arc<dyn SessionRegistry>,
    /// RoomRegistry（在室者管理の抽象化）
    rooms: Arc<dyn RoomRegistry>,
    /// Broadcaster（配信の抽象化）
    broadcaster: Arc<dyn Broadcaster>,
    /// 同じセッションで再 join したときの退室処理
    leave: Arc<LeaveChatRoomUseCase>,
}

impl JoinChatRoomUseCase {
    /// 新しい JoinChatRoomUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRegistry>,
        rooms: Arc<dyn RoomRegistry>,
        broadcaster: Arc<dyn Broadcaster>,
        leave: Arc<LeaveChatRoomUseCase>,
    ) -> Self {
        Self {
            sessions,
            rooms,
            broadcaster,
            leave,
        }
    }

    /// 入室を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - join を受け取った接続のセッション
    /// * `user` - join リクエストから作られたユーザー
    ///
    /// # Returns
    ///
    /// * `JoinOutcome::Success` - 入室した（本人に成功通知、ルームに在室者リストを配信）
    /// * `JoinOutcome::RoomFull` - 満室（本人にだけ失敗通知）
    /// * `JoinOutcome::InvalidRoomId` - ルーム ID が範囲外（通知なし）
    pub async fn execute(&self, session_id: SessionId, user: User) -> JoinOutcome {
        // 1. セッションを保存（以前のユーザーがいれば先に退室させる）
        if let Some(previous) = self.sessions.save(session_id.clone(), user.clone()).await {
            tracing::info!(
                "Session '{}' joins again, '{}' leaves room {} first",
                session_id,
                previous.screen_name,
                previous.room_id
            );
            self.leave.execute(&previous).await;
        }

        // 2. 入室（容量チェックと追加は Registry 内でアトミックに行われる）
        let outcome = self.rooms.join(user.clone()).await;

        // 3. 通知
        match outcome {
            JoinOutcome::Success => {
                tracing::info!("'{}' joined room {}", user.screen_name, user.room_id);
                self.acknowledge(&user, json!({ "status": "success" })).await;
                publish_occupant_names(self.rooms.as_ref(), self.broadcaster.as_ref(), user.room_id)
                    .await;
            }
            JoinOutcome::RoomFull => {
                tracing::info!(
                    "Room {} is full, '{}' cannot join",
                    user.room_id,
                    user.screen_name
                );
                self.acknowledge(
                    &user,
                    json!({ "status": "fail", "message": ROOM_FULL_MESSAGE }),
                )
                .await;
            }
            JoinOutcome::InvalidRoomId => {
                tracing::warn!(
                    "Dropped join of '{}': invalid room id {}",
                    user.screen_name,
                    user.room_id
                );
            }
        }

        outcome
    }

    /// 本人の個別キューに join の結果を送る
    async fn acknowledge(&self, user: &User, body: serde_json::Value) {
        if let Err(e) = self
            .broadcaster
            .send_to_user(&user.id, UserQueue::JoinResponse, &body.to_string())
            .await
        {
            tracing::warn!("Failed to acknowledge join of '{}': {}", user.screen_name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RoomId,
        infrastructure::registry::{InMemoryRoomRegistry, InMemorySessionRegistry},
        usecase::test_support::{RecordingBroadcaster, user},
    };

    struct Fixture {
        sessions: Arc<InMemorySessionRegistry>,
        rooms: Arc<InMemoryRoomRegistry>,
        broadcaster: Arc<RecordingBroadcaster>,
        usecase: JoinChatRoomUseCase,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(InMemorySessionRegistry::new());
        let rooms = Arc::new(InMemoryRoomRegistry::new());
        let broadcaster = RecordingBroadcaster::new();
        let leave = Arc::new(LeaveChatRoomUseCase::new(rooms.clone(), broadcaster.clone()));
        let usecase =
            JoinChatRoomUseCase::new(sessions.clone(), rooms.clone(), broadcaster.clone(), leave);
        Fixture {
            sessions,
            rooms,
            broadcaster,
            usecase,
        }
    }

    fn session(id: &str) -> SessionId {
        SessionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_success_acknowledges_and_broadcasts() {
        // テスト項目: 入室成功時に本人へ成功通知、ルームへ在室者リストが配信される
        // given (前提条件):
        let f = fixture();
        let alice = user("u-a", "alice", 5);

        // when (操作):
        let result = f.usecase.execute(session("s1"), alice.clone()).await;

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::Success);
        assert_eq!(f.sessions.lookup(&session("s1")).await, Some(alice));
        assert_eq!(
            f.broadcaster.sent().await,
            vec![
                (
                    "/user/queue/joinResponse@u-a".to_string(),
                    r#"{"status":"success"}"#.to_string()
                ),
                ("/topic/chatroomUsers5".to_string(), r#"["alice"]"#.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_join_full_room_notifies_requester_only() {
        // テスト項目: 満室時は本人にだけ失敗通知し、他の在室者には配信しない
        // given (前提条件):
        let f = fixture();
        f.usecase.execute(session("s1"), user("u-a", "alice", 5)).await;
        f.usecase.execute(session("s2"), user("u-b", "bob", 5)).await;
        let before = f.broadcaster.sent().await.len();

        // when (操作):
        let result = f.usecase.execute(session("s3"), user("u-c", "carol", 5)).await;

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::RoomFull);
        let sent = f.broadcaster.sent().await;
        assert_eq!(
            sent[before..],
            [(
                "/user/queue/joinResponse@u-c".to_string(),
                r#"{"message":"Chatroom is full","status":"fail"}"#.to_string()
            )]
        );
        let names: Vec<String> = f
            .rooms
            .occupants(RoomId::new(5))
            .await
            .into_iter()
            .map(|u| u.screen_name.as_str().to_string())
            .collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_join_invalid_room_is_silently_dropped() {
        // テスト項目: 範囲外のルーム ID では通知せず、ルームテーブルも変わらない
        // given (前提条件):
        let f = fixture();

        // when (操作):
        let result = f.usecase.execute(session("s1"), user("u-a", "alice", 1000)).await;

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::InvalidRoomId);
        assert!(f.broadcaster.sent().await.is_empty());
        assert!(f.rooms.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejoin_on_same_session_leaves_previous_room() {
        // テスト項目: 同じセッションで再 join すると以前のルームから退室する
        // given (前提条件):
        let f = fixture();
        let first = user("u-a", "alice", 5);
        f.usecase.execute(session("s1"), first.clone()).await;

        // when (操作):
        let second = user("u-a2", "alice", 7);
        let result = f.usecase.execute(session("s1"), second.clone()).await;

        // then (期待する結果):
        assert_eq!(result, JoinOutcome::Success);
        assert!(f.rooms.occupants(RoomId::new(5)).await.is_empty());
        assert_eq!(f.rooms.occupants(RoomId::new(7)).await, vec![second.clone()]);
        assert_eq!(f.sessions.lookup(&session("s1")).await, Some(second));
        assert_eq!(
            f.broadcaster.sent_to("/topic/chatroomUserLeave5").await,
            ["alice"]
        );
    }
}

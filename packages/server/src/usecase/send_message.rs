//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージのルームトピックへの中継
//!
//! ### なぜこのテストが必要か
//! - 送信者がどのルームに在室しているかに関係なく、宛先ルームに中継されることを確認
//!   （在室チェックは行わない）
//! - join していないセッションからの送信が破棄されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室しているルームへの送信
//! - エッジケース：在室していないルームへの送信、未知のセッションからの送信

use std::sync::Arc;

use crate::domain::{Broadcaster, ChatMessage, SessionId, SessionRegistry, Topic, User};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// SessionRegistry（セッション管理の抽象化）
    sessions: Arc<dyn SessionRegistry>,
    /// Broadcaster（配信の抽象化）
    broadcaster: Arc<dyn Broadcaster>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(sessions: Arc<dyn SessionRegistry>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            sessions,
            broadcaster,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - メッセージを受け取った接続のセッション
    /// * `message` - メッセージ（Domain Model）
    /// * `json_message` - 中継する JSON（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 中継した
    /// * `Err(SendMessageError::UnknownSession)` - セッションにユーザーがいないため破棄した
    pub async fn execute(
        &self,
        session_id: &SessionId,
        message: &ChatMessage,
        json_message: &str,
    ) -> Result<(), SendMessageError> {
        let sender = self
            .sessions
            .lookup(session_id)
            .await
            .ok_or(SendMessageError::UnknownSession)?;

        self.relay(message, &sender, json_message).await
    }

    /// 宛先ルームのメッセージトピックにそのまま中継
    ///
    /// 送信者が宛先ルームに在室しているかは確認しません。
    pub async fn relay(
        &self,
        message: &ChatMessage,
        sender: &User,
        json_message: &str,
    ) -> Result<(), SendMessageError> {
        tracing::debug!(
            "'{}' (room {}) sends message '{}' to room {}",
            sender.screen_name,
            sender.room_id,
            message.id,
            message.room_id
        );

        self.broadcaster
            .publish(Topic::Messages(message.room_id), json_message)
            .await
            .map_err(|e| SendMessageError::BroadcastFailed(e.to_string()))
    }
}

//! UseCase: 切断処理
//!
//! 接続が閉じたときに UI 層のライフサイクルフックから一度だけ呼ばれます。
//! セッションの対応を先に取り除くため、同じセッションの切断が重なっても
//! 退室処理は一度しか走りません。

use std::sync::Arc;

use crate::domain::{SessionId, SessionRegistry, User};

use super::{error::DisconnectError, leave_chat_room::LeaveChatRoomUseCase};

/// 切断のユースケース
pub struct DisconnectSessionUseCase {
    /// SessionRegistry（セッション管理の抽象化）
    sessions: Arc<dyn SessionRegistry>,
    /// 退室処理
    leave: Arc<LeaveChatRoomUseCase>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(sessions: Arc<dyn SessionRegistry>, leave: Arc<LeaveChatRoomUseCase>) -> Self {
        Self { sessions, leave }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - セッションに紐付いていたユーザー（退室処理済み）
    /// * `Err(DisconnectError::UnknownSession)` - join せずに切断した
    pub async fn execute(&self, session_id: &SessionId) -> Result<User, DisconnectError> {
        let user = self
            .sessions
            .remove(session_id)
            .await
            .ok_or(DisconnectError::UnknownSession)?;

        self.leave.execute(&user).await;
        tracing::info!("Session '{}' of '{}' cleaned up", session_id, user.screen_name);

        Ok(user)
    }
}

//! UseCase: 退室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatRoomUseCase::execute() メソッド
//! - 在室者からの削除と、在室者リスト・退室通知の配信
//!
//! ### なぜこのテストが必要か
//! - 退室したユーザーが在室者リストから確実に消えることを保証
//! - 在室していないユーザーの退室（join 拒否後の切断など）で失敗しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室者の退室と配信
//! - エッジケース：在室していないユーザー、2 回目の退室

use std::sync::Arc;

use crate::domain::{Broadcaster, LeaveOutcome, RoomRegistry, Topic, User};

use super::occupants::publish_occupant_names;

/// 退室のユースケース
pub struct LeaveChatRoomUseCase {
    /// RoomRegistry（在室者管理の抽象化）
    rooms: Arc<dyn RoomRegistry>,
    /// Broadcaster（配信の抽象化）
    broadcaster: Arc<dyn Broadcaster>,
}

impl LeaveChatRoomUseCase {
    /// 新しい LeaveChatRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRegistry>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { rooms, broadcaster }
    }

    /// 退室を実行
    ///
    /// 在室者リストと退室者の表示名を配信します。
    /// 在室していなかった場合（満室で拒否された後の切断など）もログを残して同じく配信します。
    pub async fn execute(&self, user: &User) -> LeaveOutcome {
        let outcome = self.rooms.leave(user).await;
        match outcome {
            LeaveOutcome::Removed => {
                tracing::info!("'{}' left room {}", user.screen_name, user.room_id);
            }
            LeaveOutcome::NotPresent => {
                tracing::info!(
                    "'{}' was not in room {}, announcing departure anyway",
                    user.screen_name,
                    user.room_id
                );
            }
        }

        // 1. 在室者リストを更新
        publish_occupant_names(self.rooms.as_ref(), self.broadcaster.as_ref(), user.room_id)
            .await;

        // 2. 退室者の表示名を通知
        if let Err(e) = self
            .broadcaster
            .publish(Topic::UserLeft(user.room_id), user.screen_name.as_str())
            .await
        {
            tracing::warn!("Failed to broadcast departure of '{}': {}", user.screen_name, e);
        }

        outcome
    }
}

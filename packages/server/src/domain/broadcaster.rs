//! Broadcaster trait 定義
//!
//! トピック購読者への一斉配信と、特定ユーザーへの個別配信のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（`WebSocketBroadcaster`）。

use std::{fmt, str::FromStr};

use async_trait::async_trait;

use super::{BroadcastError, RoomId, UserId, ValueObjectError};

const CHATROOM_PREFIX: &str = "/topic/chatroom";
const USERS_SUFFIX: &str = "Users";
const USER_LEAVE_SUFFIX: &str = "UserLeave";

/// ルームごとの配信トピック
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// チャットメッセージ（`/topic/chatroom{id}`）
    Messages(RoomId),
    /// 在室者の表示名リスト（`/topic/chatroomUsers{id}`）
    Occupants(RoomId),
    /// 退室したユーザーの表示名（`/topic/chatroomUserLeave{id}`）
    UserLeft(RoomId),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Messages(id) => write!(f, "{CHATROOM_PREFIX}{id}"),
            Topic::Occupants(id) => write!(f, "{CHATROOM_PREFIX}{USERS_SUFFIX}{id}"),
            Topic::UserLeft(id) => write!(f, "{CHATROOM_PREFIX}{USER_LEAVE_SUFFIX}{id}"),
        }
    }
}

impl FromStr for Topic {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ValueObjectError::UnknownTopic(s.to_string());
        let rest = s.strip_prefix(CHATROOM_PREFIX).ok_or_else(unknown)?;

        // "UserLeave" は "Users" と先頭が重なるため先に判定する
        let (make, digits): (fn(RoomId) -> Topic, &str) =
            if let Some(digits) = rest.strip_prefix(USER_LEAVE_SUFFIX) {
                (Topic::UserLeft, digits)
            } else if let Some(digits) = rest.strip_prefix(USERS_SUFFIX) {
                (Topic::Occupants, digits)
            } else {
                (Topic::Messages, rest)
            };

        // ルーム ID 部分は数字のみ（符号・空白は不可）
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unknown());
        }
        let id = digits.parse::<i64>().map_err(|_| unknown())?;
        Ok(make(RoomId::new(id)))
    }
}

/// ユーザー個別のキュー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserQueue {
    /// join の結果通知（`/user/queue/joinResponse`）
    JoinResponse,
}

impl fmt::Display for UserQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserQueue::JoinResponse => f.write_str("/user/queue/joinResponse"),
        }
    }
}

/// Broadcaster trait
///
/// 配信はベストエフォート。受信確認や再送は行いません。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// トピックの全購読者に配信
    ///
    /// 購読者がいない場合も成功として扱います。
    async fn publish(&self, topic: Topic, payload: &str) -> Result<(), BroadcastError>;

    /// 特定ユーザーの個別キューに配信
    async fn send_to_user(
        &self,
        user_id: &UserId,
        queue: UserQueue,
        payload: &str,
    ) -> Result<(), BroadcastError>;
}

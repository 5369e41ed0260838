//! Entities
//!
//! `User` is recreated on every join and never updated in place.

use super::value_object::{RoomId, ScreenName, Timestamp, UserId};

/// ルームに参加しているユーザー
///
/// ## 等価性
///
/// `leave` は値の一致で占有者を探すため、全フィールドで比較します。
/// 同じ ID でも別の join で作られた User は別物として扱われます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub screen_name: ScreenName,
    pub room_id: RoomId,
    pub joined_at: Timestamp,
}

impl User {
    pub fn new(id: UserId, screen_name: ScreenName, room_id: RoomId, joined_at: Timestamp) -> Self {
        Self {
            id,
            screen_name,
            room_id,
            joined_at,
        }
    }
}

/// ルームに中継されるチャットメッセージ
///
/// 中継時にはクライアントから受け取った内容をそのまま転送します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// クライアントが付与したメッセージ ID
    pub id: String,
    /// 宛先ルーム
    pub room_id: RoomId,
    /// 送信者の表示名（クライアント申告値）
    pub sender: String,
    pub message: String,
}

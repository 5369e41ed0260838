//! UseCase 層のエラー定義

use thiserror::Error;

/// メッセージ送信のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// セッションにユーザーが紐付いていない（送信は破棄される）
    #[error("session has no joined user")]
    UnknownSession,

    /// 配信に失敗
    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// 切断処理のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisconnectError {
    /// セッションにユーザーが紐付いていない（join せずに切断した）
    #[error("session has no joined user")]
    UnknownSession,
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GetRoomDetailError {
    /// ルーム ID が範囲外
    #[error("room id {0} is out of range")]
    InvalidRoomId(i64),

    /// ルームのエントリが存在しない
    #[error("room {0} not found")]
    RoomNotFound(i64),
}

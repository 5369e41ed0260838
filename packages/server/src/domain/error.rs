//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成に失敗した場合のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId が空
    #[error("user id must not be empty")]
    UserIdEmpty,

    /// SessionId が空
    #[error("session id must not be empty")]
    SessionIdEmpty,

    /// ScreenName が空（空白のみを含む）
    #[error("screen name must not be blank")]
    ScreenNameEmpty,

    /// ScreenName が長すぎる
    #[error("screen name is too long: {0} characters (max {max})", max = super::value_object::ScreenName::MAX_LEN)]
    ScreenNameTooLong(usize),

    /// トピック名として解釈できない
    #[error("unknown topic: '{0}'")]
    UnknownTopic(String),
}

/// Broadcaster による配信に失敗した場合のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BroadcastError {
    /// 宛先ユーザーに紐づく接続が存在しない
    #[error("no connection bound to user '{0}'")]
    UserNotConnected(String),

    /// チャンネルへの送信に失敗
    #[error("push failed: {0}")]
    PushFailed(String),
}

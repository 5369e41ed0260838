//! Registry trait 定義
//!
//! ルームの在室者とセッションの対応を管理するストアのインターフェース。
//! UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
//!
//! ## 並行性
//!
//! 実装は任意の数の同時呼び出しに耐える必要があります。
//! 特に `RoomRegistry::join` の「容量チェック + 追加」は単一のクリティカルセクションで
//! 行わなければなりません（別々に呼ぶと容量を超える競合が起きる）。

use async_trait::async_trait;

use super::{RoomId, SessionId, User};

/// ルームあたりの最大在室人数
pub const ROOM_CAPACITY: usize = 2;

/// `RoomRegistry::join` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// 在室者リストの末尾に追加された
    Success,
    /// 満室のため追加されなかった（状態は変更されない）
    RoomFull,
    /// ルーム ID が範囲外（状態は変更されない）
    InvalidRoomId,
}

/// `RoomRegistry::leave` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 在室者リストから削除された
    Removed,
    /// 在室者リストに存在しなかった
    NotPresent,
}

/// Room Registry trait
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// ユーザーを `user.room_id` のルームに追加
    ///
    /// ルームのエントリは最初の join 時に作成されます。
    async fn join(&self, user: User) -> JoinOutcome;

    /// ユーザーを自身のルームから削除（値の一致で検索）
    ///
    /// 存在しない場合も失敗しません。空になったルームのエントリは残ります。
    async fn leave(&self, user: &User) -> LeaveOutcome;

    /// ルームの在室者を参加順に取得（エントリがなければ空）
    async fn occupants(&self, room_id: RoomId) -> Vec<User>;

    /// エントリが存在するか（空のルームも含む）
    async fn contains_room(&self, room_id: RoomId) -> bool;

    /// 全ルームと在室者をルーム ID 順に取得
    async fn rooms(&self) -> Vec<(RoomId, Vec<User>)>;
}

/// Session Registry trait
///
/// セッション ID とユーザーの 1 対 1 の対応。キー単位の操作のみアトミックであればよい。
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// 対応を保存（既存の対応は上書き）し、上書きされたユーザーを返す
    async fn save(&self, session_id: SessionId, user: User) -> Option<User>;

    /// 対応するユーザーを取得
    async fn lookup(&self, session_id: &SessionId) -> Option<User>;

    /// 対応を削除（存在しなければ何もしない）し、削除されたユーザーを返す
    async fn remove(&self, session_id: &SessionId) -> Option<User>;
}

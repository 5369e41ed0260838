//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//!
//! ## ロックの構成
//!
//! ```text
//! RwLock<HashMap<RoomId, Arc<Mutex<Vec<User>>>>>
//!   外側: エントリの遅延作成のみ（書き込みロックは新規ルーム作成時だけ）
//!   内側: ルームごとの在室者リスト（容量チェック + 追加、検索 + 削除）
//! ```
//!
//! 別のルームへの join は互いにブロックしません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    JoinOutcome, LeaveOutcome, RoomId, RoomRegistry, User, registry::ROOM_CAPACITY,
};

type Occupants = Arc<Mutex<Vec<User>>>;

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    rooms: RwLock<HashMap<RoomId, Occupants>>,
    capacity: usize,
}

impl InMemoryRoomRegistry {
    /// 定員 `ROOM_CAPACITY` の Registry を作成
    pub fn new() -> Self {
        Self::with_capacity(ROOM_CAPACITY)
    }

    /// 定員を指定して作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// 既存のエントリを取得
    async fn entry(&self, room_id: RoomId) -> Option<Occupants> {
        self.rooms.read().await.get(&room_id).cloned()
    }

    /// エントリを取得し、なければ作成
    async fn entry_or_create(&self, room_id: RoomId) -> Occupants {
        if let Some(occupants) = self.entry(room_id).await {
            return occupants;
        }

        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id)
            .or_insert_with(|| {
                tracing::debug!("Room {} created", room_id);
                Arc::new(Mutex::new(Vec::with_capacity(self.capacity)))
            })
            .clone()
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, user: User) -> JoinOutcome {
        let room_id = user.room_id;
        if !room_id.is_valid() {
            tracing::warn!("Invalid room id {}, '{}' cannot join", room_id, user.screen_name);
            return JoinOutcome::InvalidRoomId;
        }

        let room = self.entry_or_create(room_id).await;
        let mut occupants = room.lock().await;
        if occupants.len() >= self.capacity {
            tracing::debug!("Room {} is full, '{}' cannot join", room_id, user.screen_name);
            return JoinOutcome::RoomFull;
        }

        tracing::debug!("'{}' joined room {}", user.screen_name, room_id);
        occupants.push(user);
        JoinOutcome::Success
    }

    async fn leave(&self, user: &User) -> LeaveOutcome {
        let Some(room) = self.entry(user.room_id).await else {
            tracing::debug!(
                "Room {} has no entry, nothing to remove for '{}'",
                user.room_id,
                user.screen_name
            );
            return LeaveOutcome::NotPresent;
        };

        let mut occupants = room.lock().await;
        match occupants.iter().position(|occupant| occupant == user) {
            Some(index) => {
                occupants.remove(index);
                tracing::debug!("Removed '{}' from room {}", user.screen_name, user.room_id);
                LeaveOutcome::Removed
            }
            None => {
                tracing::debug!("'{}' was not in room {}", user.screen_name, user.room_id);
                LeaveOutcome::NotPresent
            }
        }
    }

    async fn occupants(&self, room_id: RoomId) -> Vec<User> {
        match self.entry(room_id).await {
            Some(room) => room.lock().await.clone(),
            None => Vec::new(),
        }
    }

    async fn contains_room(&self, room_id: RoomId) -> bool {
        self.rooms.read().await.contains_key(&room_id)
    }

    async fn rooms(&self) -> Vec<(RoomId, Vec<User>)> {
        let entries: Vec<(RoomId, Occupants)> = {
            let rooms = self.rooms.read().await;
            rooms.iter().map(|(id, room)| (*id, room.clone())).collect()
        };

        let mut snapshot = Vec::with_capacity(entries.len());
        for (room_id, room) in entries {
            snapshot.push((room_id, room.lock().await.clone()));
        }
        snapshot.sort_by_key(|(room_id, _)| *room_id);
        snapshot
    }
}

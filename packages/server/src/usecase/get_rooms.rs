//! UseCase: ルーム一覧・詳細の取得（HTTP の参照用エンドポイント向け）

use std::sync::Arc;

use crate::domain::{RoomId, RoomRegistry, User};

use super::error::GetRoomDetailError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    rooms: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(rooms: Arc<dyn RoomRegistry>) -> Self {
        Self { rooms }
    }

    /// 全ルーム（空のルームを含む）と在室者をルーム ID 順に返す
    pub async fn execute(&self) -> Vec<(RoomId, Vec<User>)> {
        self.rooms.rooms().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomRegistry>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, room_id: i64) -> Result<(RoomId, Vec<User>), GetRoomDetailError> {
        let room_id = RoomId::new(room_id);
        if !room_id.is_valid() {
            return Err(GetRoomDetailError::InvalidRoomId(room_id.value()));
        }
        if !self.rooms.contains_room(room_id).await {
            return Err(GetRoomDetailError::RoomNotFound(room_id.value()));
        }
        Ok((room_id, self.rooms.occupants(room_id).await))
    }
}

//! Conversion logic between DTOs and domain entities.

use heya_shared::time::{Clock, millis_to_rfc3339};

use crate::domain::{
    ChatMessage, RoomId, ScreenName, Timestamp, User, UserId, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// DTO → Domain Entity
// ========================================

impl ws::JoinRequest {
    /// Build the `User` for this join.
    ///
    /// A missing `userId` gets a generated one; `joined_at` always comes from `clock`.
    pub fn into_user(self, clock: &dyn Clock) -> Result<User, ValueObjectError> {
        let id = match self.user_id {
            Some(id) => UserId::new(id)?,
            None => UserId::generate(),
        };
        Ok(User::new(
            id,
            ScreenName::new(self.screen_name)?,
            RoomId::new(self.room_id),
            Timestamp::new(clock.now_millis()),
        ))
    }
}

impl From<ws::SendRequest> for ChatMessage {
    fn from(dto: ws::SendRequest) -> Self {
        Self {
            id: dto.id,
            room_id: RoomId::new(dto.room_id),
            sender: dto.sender,
            message: dto.message,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<User> for http::UserDetailDto {
    fn from(model: User) -> Self {
        Self {
            user_id: model.id.into_string(),
            screen_name: model.screen_name.as_str().to_string(),
            joined_at: millis_to_rfc3339(model.joined_at.value()),
        }
    }
}

impl From<(RoomId, Vec<User>)> for http::RoomSummaryDto {
    fn from((room_id, users): (RoomId, Vec<User>)) -> Self {
        Self {
            id: room_id.value(),
            occupants: users
                .into_iter()
                .map(|user| user.screen_name.as_str().to_string())
                .collect(),
        }
    }
}

impl From<(RoomId, Vec<User>)> for http::RoomDetailDto {
    fn from((room_id, users): (RoomId, Vec<User>)) -> Self {
        Self {
            id: room_id.value(),
            users: users.into_iter().map(Into::into).collect(),
        }
    }
}

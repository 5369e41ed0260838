//! HTTP API response DTOs.

use serde::Serialize;

/// `GET /api/rooms` item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummaryDto {
    pub id: i64,
    /// Screen names in join order
    pub occupants: Vec<String>,
}

/// `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomDetailDto {
    pub id: i64,
    pub users: Vec<UserDetailDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailDto {
    pub user_id: String,
    pub screen_name: String,
    /// RFC 3339, `null` if the timestamp cannot be represented
    pub joined_at: Option<String>,
}

//! Infrastructure layer: concrete registries, the WebSocket broadcaster and wire DTOs.

pub mod broadcaster;
pub mod dto;
pub mod registry;

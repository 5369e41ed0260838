//! UseCase layer: the join / leave / disconnect / send flows and room inspection.
//!
//! Each use case holds `Arc<dyn ...>` handles to the registries and the broadcaster,
//! built once at process start and shared by every connection.

mod disconnect_session;
mod error;
mod get_rooms;
mod join_chat_room;
mod leave_chat_room;
mod occupants;
mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{DisconnectError, GetRoomDetailError, SendMessageError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_chat_room::JoinChatRoomUseCase;
pub use leave_chat_room::LeaveChatRoomUseCase;
pub use send_message::SendMessageUseCase;

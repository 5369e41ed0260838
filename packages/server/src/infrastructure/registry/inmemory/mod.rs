mod room;
mod session;

pub use room::InMemoryRoomRegistry;
pub use session::InMemorySessionRegistry;

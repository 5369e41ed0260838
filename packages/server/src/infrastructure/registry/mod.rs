//! Registry 実装
//!
//! - `inmemory`: プロセス内の HashMap を使った実装（再起動で消える）

pub mod inmemory;

pub use inmemory::{InMemoryRoomRegistry, InMemorySessionRegistry};

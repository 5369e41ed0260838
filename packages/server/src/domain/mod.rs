//! Domain layer: value objects, entities and the interfaces the use cases depend on.
//!
//! Concrete implementations live in the infrastructure layer (dependency inversion).

pub mod broadcaster;
pub mod entity;
pub mod error;
pub mod registry;
pub mod value_object;

pub use broadcaster::{Broadcaster, Topic, UserQueue};
pub use entity::{ChatMessage, User};
pub use error::{BroadcastError, ValueObjectError};
pub use registry::{JoinOutcome, LeaveOutcome, RoomRegistry, SessionRegistry};
pub use value_object::{RoomId, ScreenName, SessionId, Timestamp, UserId};

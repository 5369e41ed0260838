//! WebSocket chat room server implementation.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::dispatch::{DispatchError, Dispatcher};
pub use handler::websocket::on_disconnect;
pub use server::Server;
pub use state::AppState;

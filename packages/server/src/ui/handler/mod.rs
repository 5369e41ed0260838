//! Request handlers: WebSocket frames and HTTP endpoints.

pub mod dispatch;
pub mod http;
pub mod websocket;

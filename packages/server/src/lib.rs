//! Chat room server library.
//!
//! Clients connect over WebSocket, join numbered rooms that hold at most two users,
//! and exchange messages through per-room topics. Room state is also exposed
//! read-only over HTTP.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

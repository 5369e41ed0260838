//! Utilities shared between Heya packages.

pub mod logger;
pub mod time;

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame timestamps, wall clock, ISO-8601 formatting)
//! - Input events (key names to game actions)
//! - Storage (LocalStorage on web, nothing natively)

pub mod input;
pub mod storage;
pub mod time;

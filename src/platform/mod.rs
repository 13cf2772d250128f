//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input sampling (keys held, pointer clicks)
//! - Wall-clock time for the frame driver
//! - Logging setup on the web

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputState, Key, Viewport};

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

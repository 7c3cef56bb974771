//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall clock time
//! - Input translation (keys, pointer, touch joystick)
//!
//! Storage backends live in [`crate::persistence::storage`].

pub mod input;

pub use input::{DirectionKeys, is_pause_key, joystick_direction, pointer_direction};

/// Current Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

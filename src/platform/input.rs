//! Input translation
//!
//! Turns raw keyboard, pointer and touch state into the normalized
//! `(dx, dy)` direction the simulation reads once per tick. Screen
//! coordinates: +y points down.

use glam::Vec2;

/// Pointer closer than this to the player means "stay put"
pub const POINTER_DEAD_ZONE: f32 = 5.0;

/// Pointer distance at which the player moves at full speed
pub const POINTER_FULL_SPEED_DISTANCE: f32 = 100.0;

/// Knob travel of the virtual joystick
pub const JOYSTICK_MAX_DISTANCE: f32 = 35.0;

/// Held arrow keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl DirectionKeys {
    /// Record a key press or release. Returns false for non-arrow keys.
    pub fn set(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowLeft" => &mut self.left,
            "ArrowRight" => &mut self.right,
            "ArrowUp" => &mut self.up,
            "ArrowDown" => &mut self.down,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Opposite keys cancel; diagonals are normalized by the player
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Keys that toggle pause while a game is on
pub fn is_pause_key(key: &str) -> bool {
    matches!(key, "Escape" | "p" | "P" | " ")
}

/// Steer toward the pointer, slowing down as it gets close
pub fn pointer_direction(player: Vec2, pointer: Vec2) -> Vec2 {
    let delta = pointer - player;
    let distance = delta.length();
    if !distance.is_finite() || distance <= POINTER_DEAD_ZONE {
        return Vec2::ZERO;
    }
    let scale = (distance / POINTER_FULL_SPEED_DISTANCE).min(1.0);
    delta / distance * scale
}

/// Direction from a joystick drag, `offset` being touch minus base center.
///
/// The knob is held to the joystick's travel, so the result has length at
/// most 1.
pub fn joystick_direction(offset: Vec2) -> Vec2 {
    if !offset.is_finite() {
        return Vec2::ZERO;
    }
    offset.clamp_length_max(JOYSTICK_MAX_DISTANCE) / JOYSTICK_MAX_DISTANCE
}

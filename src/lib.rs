//! Dots Arena - a survival arena simulation
//!
//! One player dot dodges a swarm of enemy dots that grows faster, smarter and
//! more erratic the longer the run lasts.
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (agents, collisions, levels, lifecycle)
//! - `settings`: Data-driven arena and difficulty configuration
//! - `highscores`: Local leaderboard
//! - `persistence`: Score records, sinks and the player profile
//! - `platform`: Translation of raw input into a direction vector

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, PersistenceError};
pub use highscores::HighScores;
pub use settings::GameSettings;

/// Game configuration constants
pub mod consts {
    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults (units per tick)
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Enemy dot radius
    pub const ENEMY_RADIUS: f32 = 25.0;

    /// Fraction of the summed radii that counts as a hit (forgiving)
    pub const COLLISION_FORGIVENESS: f32 = 0.85;

    /// Per-tick blend factor for trackers steering toward the player
    pub const TRACKING_STRENGTH: f32 = 0.02;

    /// Speed multiplier while bursting
    pub const BURST_MULTIPLIER: f32 = 1.8;
    /// Burst length (ms)
    pub const BURST_DURATION_MS: f64 = 800.0;

    /// Direction change roll window (ms) and success chance
    pub const DIRECTION_CHANGE_INTERVAL_MS: f64 = 2000.0;
    pub const DIRECTION_CHANGE_CHANCE: f32 = 0.3;

    /// Speed burst roll window (ms) and success chance
    pub const SPEED_BURST_INTERVAL_MS: f64 = 3000.0;
    pub const SPEED_BURST_CHANCE: f32 = 0.25;

    /// Countdown starts here and steps down once per second
    pub const COUNTDOWN_FROM: u32 = 4;
    pub const COUNTDOWN_STEP_MS: f64 = 1000.0;
    /// How long "GO" stays up before the run begins
    pub const COUNTDOWN_GO_MS: f64 = 500.0;

    /// Host tick rate the per-tick speeds are tuned for
    pub const TICKS_PER_SECOND: f64 = 60.0;
}

/// Round seconds to two decimals (score precision)
#[inline]
pub fn round_score(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

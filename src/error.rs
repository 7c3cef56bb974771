//! Error types
//!
//! The simulation itself never fails; only building it from configuration and
//! talking to storage can.

use thiserror::Error;

/// Problems found while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The level table has no tiers at all.
    #[error("level table is empty")]
    EmptyLevelTable,

    /// Tier levels must be numbered 1..N in order.
    #[error("tier at position {index} has level {found}, expected {expected}")]
    LevelOutOfSequence {
        index: usize,
        expected: u32,
        found: u32,
    },

    /// The first tier must begin at elapsed time zero.
    #[error("first tier starts at {0}s, must start at 0s")]
    FirstTierNotAtZero(f64),

    /// Tier start times must be strictly increasing.
    #[error("level {level} starts at {time_start}s, not after previous tier at {previous}s")]
    UnsortedTiers {
        level: u32,
        time_start: f64,
        previous: f64,
    },

    /// A tier may never have fewer enemies than the one before it.
    #[error("level {level} has {enemy_count} enemies, fewer than previous tier's {previous}")]
    DecreasingEnemyCount {
        level: u32,
        enemy_count: usize,
        previous: usize,
    },

    /// More trackers than enemies.
    #[error("level {level} has {tracker_count} trackers but only {enemy_count} enemies")]
    TooManyTrackers {
        level: u32,
        tracker_count: usize,
        enemy_count: usize,
    },

    /// Enemy speed must be finite and positive.
    #[error("level {level} has invalid speed {speed}")]
    InvalidSpeed { level: u32, speed: f32 },

    /// Arena or agent dimensions that cannot host a game.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Config file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config JSON could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while storing scores or the player profile.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

//! Game settings
//!
//! Arena dimensions, dot sizes and speeds, countdown length and the level
//! table. Stored as JSON; every field is optional and falls back to the
//! stock value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::LevelTable;

/// Tunable game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Dots ===
    /// Player collision radius
    pub player_radius: f32,
    /// Player speed (units per tick)
    pub player_speed: f32,
    /// Enemy collision radius
    pub enemy_radius: f32,

    // === Flow ===
    /// First number shown by the countdown
    pub countdown_from: u32,
    /// Fixed RNG seed; random per run when absent
    pub seed: Option<u64>,

    // === Difficulty ===
    pub levels: LevelTable,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            enemy_radius: ENEMY_RADIUS,

            countdown_from: COUNTDOWN_FROM,
            seed: None,

            levels: LevelTable::standard(),
        }
    }
}

impl GameSettings {
    /// Check that the arena can hold the dots and every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("enemy_radius", self.enemy_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidSettings(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let largest = self.player_radius.max(self.enemy_radius) * 2.0;
        if self.arena_width < largest || self.arena_height < largest {
            return Err(ConfigError::InvalidSettings(format!(
                "arena {}x{} is too small for dots of diameter {}",
                self.arena_width, self.arena_height, largest
            )));
        }

        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults (with a warning) on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }
}

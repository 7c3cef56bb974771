//! Session state and lifecycle types
//!
//! Everything a running session owns lives in [`GameSession`]; the engine in
//! `tick` is the only thing that mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::player::Player;

/// Rectangular play field, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a circle's center so the whole circle is inside the arena
    #[inline]
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, (self.width - radius).max(radius)),
            pos.y.clamp(radius, (self.height - radius).max(radius)),
        )
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start request
    Idle,
    /// Counting down before the run; `remaining == 0` means "GO" is showing
    Countdown { remaining: u32, step_began_at: f64 },
    /// Active gameplay
    Running,
    /// Frozen; `since` is when the pause began
    Paused { since: f64 },
    /// Run ended by a collision; terminal until reset
    GameOver,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }
}

/// Final stats of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub player_name: String,
    pub country_code: String,
    /// Survival time in seconds
    pub elapsed_secs: f64,
    pub level: u32,
}

/// Discrete happenings a renderer or UI can react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Countdown number to show
    Countdown { remaining: u32 },
    /// Countdown reached zero
    Go,
    /// Run began
    Started,
    LevelUp { level: u32, spawned: usize },
    BurstStarted { enemy: usize },
    BurstEnded { enemy: usize },
    Paused,
    Resumed { paused_ms: f64 },
    GameOver(RunSummary),
    Reset,
}

/// One game session: the player, the swarm and all timers.
///
/// Times are host timestamps in milliseconds; `elapsed_secs` is survival time
/// with paused stretches excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    pub arena: Arena,
    pub player: Player,
    /// Live enemies; index order is spawn order and tracker priority
    pub enemies: Vec<Enemy>,
    pub enemy_radius: f32,
    pub player_name: String,
    pub country_code: String,
    /// Start of the run, shifted forward by every pause
    pub start_time: f64,
    pub elapsed_secs: f64,
    /// 1-based, never decreases within a run
    pub current_level: u32,
    pub last_direction_change_time: f64,
    pub last_speed_burst_time: f64,
    /// Total time (ms) spent paused this run
    pub paused_ms_total: f64,
    /// Running tick counter (excludes countdown and paused time)
    pub ticks: u64,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(arena: Arena, player: Player, enemy_radius: f32) -> Self {
        Self {
            phase: GamePhase::Idle,
            arena,
            player,
            enemies: Vec::new(),
            enemy_radius,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            country_code: UNKNOWN_COUNTRY.to_string(),
            start_time: 0.0,
            elapsed_secs: 0.0,
            current_level: 1,
            last_direction_change_time: 0.0,
            last_speed_burst_time: 0.0,
            paused_ms_total: 0.0,
            ticks: 0,
            events: Vec::new(),
        }
    }

    /// Summary of the run so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            player_name: self.player_name.clone(),
            country_code: self.country_code.clone(),
            elapsed_secs: self.elapsed_secs,
            level: self.current_level,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Name used when the player leaves it blank
pub const DEFAULT_PLAYER_NAME: &str = "Player";
/// Region code for unknown or invalid regions
pub const UNKNOWN_COUNTRY: &str = "XX";

/// Trim a player name, falling back to the default when blank
pub fn normalize_player_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Two ASCII letters, uppercased; anything else is unknown
pub fn normalize_country_code(code: &str) -> String {
    let code = code.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        code.to_ascii_uppercase()
    } else {
        UNKNOWN_COUNTRY.to_string()
    }
}

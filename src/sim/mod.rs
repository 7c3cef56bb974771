//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in from the host as a timestamp per tick
//! - Injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod enemy;
pub mod levels;
pub mod player;
pub mod progression;
pub mod rng;
pub mod state;
pub mod tick;

pub use autopilot::flee_direction;
pub use collision::{circles_collide, first_hit, player_hit};
pub use enemy::{Enemy, initial_swarm, roll_direction_change, roll_speed_burst, spawn_at_edge, step_all};
pub use levels::{LevelConfig, LevelTable};
pub use player::Player;
pub use progression::{assign_trackers, update_enemy_speeds};
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use state::{
    Arena, DEFAULT_PLAYER_NAME, GameEvent, GamePhase, GameSession, RunSummary, UNKNOWN_COUNTRY,
    normalize_country_code, normalize_player_name,
};
pub use tick::{Engine, TickInput};

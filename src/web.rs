//! Browser binding
//!
//! A JavaScript renderer owns the animation frame loop and calls
//! [`WebEngine::tick`] once per frame, then reads positions from the flat
//! buffers and reacts to the JSON events.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::GameSettings;
use crate::highscores::{HighScores, Leaderboard};
use crate::persistence::load_or_create_player_id;
use crate::persistence::storage::LocalStorage;
use crate::platform::{DirectionKeys, is_pause_key, joystick_direction, pointer_direction};
use crate::sim::{Engine, GameEvent, GamePhase, TickInput};

/// Module init: logging and panic messages go to the browser console
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Browser entropy without going through getrandom
fn browser_seed() -> u64 {
    js_sys::Math::random().to_bits() ^ js_sys::Date::now().to_bits().rotate_left(32)
}

fn events_json(events: &[GameEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|e| {
        log::error!("Failed to encode events: {}", e);
        "[]".to_string()
    })
}

/// Which input device currently steers the player
#[derive(Debug, Clone, Copy)]
enum Steering {
    Keys,
    Pointer(Vec2),
    Joystick(Vec2),
}

#[wasm_bindgen]
pub struct WebEngine {
    engine: Engine,
    keys: DirectionKeys,
    steering: Steering,
    player_id: String,
}

#[wasm_bindgen]
impl WebEngine {
    /// Create an engine from optional settings JSON
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WebEngine, JsError> {
        let settings = match settings_json {
            Some(json) => GameSettings::from_json(&json)?,
            None => GameSettings::default(),
        };

        let mut storage = LocalStorage;
        let player_id =
            load_or_create_player_id(&mut storage, &mut Pcg32::seed_from_u64(browser_seed()));

        let mut engine = Engine::from_settings(settings, browser_seed());
        engine.set_player_id(player_id.clone());
        engine.set_score_sink(Box::new(Leaderboard::open(storage)));

        log::info!("Dots Arena ready");
        Ok(Self {
            engine,
            keys: DirectionKeys::default(),
            steering: Steering::Keys,
            player_id,
        })
    }

    // === Lifecycle ===
    // Requests return their events as a JSON array right away,
    // so a host that has stopped ticking still hears about them.

    pub fn start_game(&mut self, player_name: &str, country_code: &str) -> String {
        self.engine
            .request_start(player_name, country_code, js_sys::Date::now());
        self.drain_events()
    }

    pub fn pause(&mut self) -> String {
        self.engine.request_pause(js_sys::Date::now());
        self.drain_events()
    }

    pub fn resume(&mut self) -> String {
        self.engine.request_resume(js_sys::Date::now());
        self.drain_events()
    }

    pub fn toggle_pause(&mut self) -> String {
        self.engine.toggle_pause(js_sys::Date::now());
        self.drain_events()
    }

    pub fn reset(&mut self) -> String {
        self.clear_input();
        self.engine.reset();
        self.drain_events()
    }

    pub fn restart(&mut self) -> String {
        self.clear_input();
        self.engine.restart(js_sys::Date::now());
        self.drain_events()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.engine.resize(width, height);
    }

    /// Advance one frame; returns the frame's events as a JSON array
    pub fn tick(&mut self) -> String {
        let input = TickInput {
            direction: self.direction(),
        };
        let events = self.engine.tick(&input, js_sys::Date::now());
        if events.iter().any(|e| matches!(e, GameEvent::GameOver(_))) {
            self.clear_input();
        }
        events_json(&events)
    }

    // === Input ===

    /// Keyboard event. Returns true when the key was used (caller should
    /// prevent the default action). A pause toggle's events come out of the
    /// next `tick` or `take_events`.
    pub fn key_event(&mut self, key: &str, pressed: bool) -> bool {
        if self.keys.set(key, pressed) {
            self.steering = Steering::Keys;
            return true;
        }
        if pressed && is_pause_key(key) {
            let phase = self.engine.phase();
            if matches!(phase, GamePhase::Running | GamePhase::Paused { .. }) {
                self.engine.toggle_pause(js_sys::Date::now());
                return true;
            }
        }
        false
    }

    /// Events queued since the last tick, as a JSON array
    pub fn take_events(&mut self) -> String {
        self.drain_events()
    }

    /// Mouse position in arena coordinates
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.steering = Steering::Pointer(Vec2::new(x, y));
    }

    pub fn pointer_leave(&mut self) {
        if matches!(self.steering, Steering::Pointer(_)) {
            self.steering = Steering::Keys;
        }
    }

    /// Touch offset from the joystick base center
    pub fn joystick_move(&mut self, dx: f32, dy: f32) {
        self.steering = Steering::Joystick(Vec2::new(dx, dy));
    }

    pub fn joystick_end(&mut self) {
        self.steering = Steering::Keys;
    }

    // === Read-back ===

    pub fn phase(&self) -> String {
        match self.engine.phase() {
            GamePhase::Idle => "idle",
            GamePhase::Countdown { .. } => "countdown",
            GamePhase::Running => "running",
            GamePhase::Paused { .. } => "paused",
            GamePhase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.engine.elapsed_secs()
    }

    pub fn level(&self) -> u32 {
        self.engine.session().current_level
    }

    /// Running ticks this run (f64 so JS gets a plain number)
    pub fn ticks(&self) -> f64 {
        self.engine.ticks() as f64
    }

    pub fn player_id(&self) -> String {
        self.player_id.clone()
    }

    /// `[x, y, radius]`
    pub fn player_state(&self) -> Vec<f32> {
        let player = &self.engine.session().player;
        vec![player.pos.x, player.pos.y, player.radius]
    }

    /// `[x, y, radius, flags]` per enemy; flags bit 0 = tracker, bit 1 = bursting
    pub fn enemy_states(&self) -> Vec<f32> {
        let enemies = &self.engine.session().enemies;
        let mut out = Vec::with_capacity(enemies.len() * 4);
        for enemy in enemies {
            let flags = u8::from(enemy.is_tracker) | (u8::from(enemy.is_bursting) << 1);
            out.extend_from_slice(&[enemy.pos.x, enemy.pos.y, enemy.radius, f32::from(flags)]);
        }
        out
    }

    /// Stored leaderboard as JSON
    pub fn leaderboard_json(&self) -> String {
        let scores = HighScores::load(&LocalStorage);
        serde_json::to_string(&scores.top()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Player's best survival time, or a negative number when there is none
    pub fn personal_best(&self) -> f64 {
        HighScores::load(&LocalStorage)
            .personal_best(&self.player_id)
            .map(|e| e.score)
            .unwrap_or(-1.0)
    }
}

impl WebEngine {
    fn direction(&self) -> Vec2 {
        match self.steering {
            Steering::Keys => self.keys.direction(),
            Steering::Pointer(at) => pointer_direction(self.engine.session().player.pos, at),
            Steering::Joystick(offset) => joystick_direction(offset),
        }
    }

    fn drain_events(&mut self) -> String {
        events_json(&self.engine.take_events())
    }

    fn clear_input(&mut self) {
        self.keys.clear();
        self.steering = Steering::Keys;
    }
}

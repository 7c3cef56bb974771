//! Tick-driven engine
//!
//! [`Engine`] owns one [`GameSession`] and advances it once per host frame.
//! The host supplies the current timestamp (ms) and the latest input; the
//! engine answers with the events that happened during that frame.

use glam::Vec2;

use super::collision::first_hit;
use super::enemy::{initial_swarm, roll_direction_change, roll_speed_burst, step_all};
use super::levels::{LevelConfig, LevelTable};
use super::player::Player;
use super::progression;
use super::rng::{PcgSource, RandomSource};
use super::state::{
    Arena, GameEvent, GamePhase, GameSession, RunSummary, normalize_country_code,
    normalize_player_name,
};
use crate::consts::*;
use crate::persistence::{ScoreRecord, ScoreSink};
use crate::settings::GameSettings;

/// Input sampled for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Desired movement; components in [-1, 1], longer vectors are shortened
    pub direction: Vec2,
}

impl TickInput {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self {
            direction: Vec2::new(dx, dy),
        }
    }
}

/// The simulation engine: session, difficulty table, random source and the
/// optional score sink notified on game over.
pub struct Engine<R: RandomSource = PcgSource> {
    session: GameSession,
    levels: LevelTable,
    settings: GameSettings,
    rng: R,
    sink: Option<Box<dyn ScoreSink>>,
    player_id: String,
}

impl Engine<PcgSource> {
    /// Engine with a PCG source seeded from settings, or from `fallback_seed`
    pub fn from_settings(settings: GameSettings, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        log::info!("Engine seeded with {}", seed);
        Self::new(settings, PcgSource::new(seed))
    }
}

impl<R: RandomSource> Engine<R> {
    pub fn new(settings: GameSettings, rng: R) -> Self {
        let arena = Arena::new(settings.arena_width, settings.arena_height);
        let player = Player::new(
            Player::spawn_point(&arena),
            settings.player_radius,
            settings.player_speed,
        );
        let session = GameSession::new(arena, player, settings.enemy_radius);
        let mut engine = Self {
            session,
            levels: settings.levels.clone(),
            settings,
            rng,
            sink: None,
            player_id: String::new(),
        };
        engine.layout();
        engine
    }

    /// Where finished runs get reported
    pub fn set_score_sink(&mut self, sink: Box<dyn ScoreSink>) {
        self.sink = Some(sink);
    }

    /// Stable id attached to score records
    pub fn set_player_id(&mut self, id: impl Into<String>) {
        self.player_id = id.into();
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Tier for the session's current level
    pub fn current_tier(&self) -> &LevelConfig {
        self.levels.get(self.session.current_level)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.session.elapsed_secs
    }

    /// Running ticks so far this run
    pub fn ticks(&self) -> u64 {
        self.session.ticks
    }

    /// Events queued by requests since the last tick. Hosts that stop
    /// ticking (e.g. while paused) drain them here.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.session.take_events()
    }

    /// Put player and tier-1 swarm in their starting spots and clear timers
    fn layout(&mut self) {
        let session = &mut self.session;
        session.player.pos = Player::spawn_point(&session.arena);
        session.enemies = initial_swarm(
            self.levels.first(),
            &session.arena,
            session.enemy_radius,
            &mut self.rng,
        );
        session.start_time = 0.0;
        session.elapsed_secs = 0.0;
        session.current_level = 1;
        session.last_direction_change_time = 0.0;
        session.last_speed_burst_time = 0.0;
        session.paused_ms_total = 0.0;
        session.ticks = 0;
    }

    /// Idle → Countdown. Ignored in every other phase.
    pub fn request_start(&mut self, player_name: &str, country_code: &str, now: f64) {
        if self.session.phase != GamePhase::Idle {
            log::warn!("Start request ignored in {:?}", self.session.phase);
            return;
        }

        self.layout();
        self.session.player_name = normalize_player_name(player_name);
        self.session.country_code = normalize_country_code(country_code);
        self.session.phase = GamePhase::Countdown {
            remaining: self.settings.countdown_from,
            step_began_at: now,
        };
        log::info!(
            "Countdown started for {} ({})",
            self.session.player_name,
            self.session.country_code
        );

        if self.settings.countdown_from == 0 {
            self.session.emit(GameEvent::Go);
        } else {
            self.session.emit(GameEvent::Countdown {
                remaining: self.settings.countdown_from,
            });
        }
    }

    /// Countdown → Running right away, for hosts that run their own countdown
    pub fn complete_countdown(&mut self, now: f64) {
        if matches!(self.session.phase, GamePhase::Countdown { .. }) {
            self.begin_running(now);
        }
    }

    fn begin_running(&mut self, now: f64) {
        let session = &mut self.session;
        session.phase = GamePhase::Running;
        session.start_time = now;
        session.elapsed_secs = 0.0;
        session.current_level = 1;
        session.last_direction_change_time = now;
        session.last_speed_burst_time = now;
        session.paused_ms_total = 0.0;
        session.ticks = 0;
        session.emit(GameEvent::Started);
        log::info!("Run started");
    }

    /// Running → Paused. No-op in any other phase.
    pub fn request_pause(&mut self, now: f64) {
        if !self.session.phase.is_running() {
            log::debug!("Pause ignored in {:?}", self.session.phase);
            return;
        }
        self.session.phase = GamePhase::Paused { since: now };
        self.session.emit(GameEvent::Paused);
        log::info!("Paused at {:.2}s", self.session.elapsed_secs);
    }

    /// Paused → Running, shifting every timer past the paused stretch so
    /// survival time and cooldowns only count running time.
    pub fn request_resume(&mut self, now: f64) {
        let GamePhase::Paused { since } = self.session.phase else {
            log::debug!("Resume ignored in {:?}", self.session.phase);
            return;
        };

        let paused_ms = (now - since).max(0.0);
        let session = &mut self.session;
        session.start_time += paused_ms;
        session.last_direction_change_time += paused_ms;
        session.last_speed_burst_time += paused_ms;
        session.paused_ms_total += paused_ms;
        for enemy in session.enemies.iter_mut().filter(|e| e.is_bursting) {
            enemy.burst_end_time += paused_ms;
        }
        session.phase = GamePhase::Running;
        session.emit(GameEvent::Resumed { paused_ms });
        log::info!("Resumed after {:.0}ms", paused_ms);
    }

    /// Pause if running, resume if paused
    pub fn toggle_pause(&mut self, now: f64) {
        match self.session.phase {
            GamePhase::Running => self.request_pause(now),
            GamePhase::Paused { .. } => self.request_resume(now),
            _ => {}
        }
    }

    /// Any phase → Idle with a fresh tier-1 layout. Keeps name and region.
    pub fn reset(&mut self) {
        self.session.phase = GamePhase::Idle;
        self.layout();
        self.session.emit(GameEvent::Reset);
        log::info!("Session reset");
    }

    /// Reset and start a new countdown for the same player
    pub fn restart(&mut self, now: f64) {
        let name = self.session.player_name.clone();
        let country = self.session.country_code.clone();
        self.reset();
        self.request_start(&name, &country, now);
    }

    /// Change the arena size. An idle session is laid out again; otherwise
    /// the player is pulled back inside and enemies bounce in on their own.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.arena = Arena::new(width, height);
        if self.session.phase == GamePhase::Idle {
            self.layout();
        } else {
            let player = &mut self.session.player;
            player.pos = self.session.arena.clamp_circle(player.pos, player.radius);
        }
    }

    /// Advance one host frame and return the events it produced
    pub fn tick(&mut self, input: &TickInput, now: f64) -> Vec<GameEvent> {
        match self.session.phase {
            GamePhase::Countdown { .. } => self.advance_countdown(now),
            GamePhase::Running => self.run_frame(input, now),
            GamePhase::Idle | GamePhase::Paused { .. } | GamePhase::GameOver => {}
        }
        self.session.take_events()
    }

    /// Step the countdown one number per elapsed second, then hold "GO"
    fn advance_countdown(&mut self, now: f64) {
        while let GamePhase::Countdown {
            remaining,
            step_began_at,
        } = self.session.phase
        {
            if remaining > 0 {
                if now - step_began_at < COUNTDOWN_STEP_MS {
                    return;
                }
                let remaining = remaining - 1;
                self.session.phase = GamePhase::Countdown {
                    remaining,
                    step_began_at: step_began_at + COUNTDOWN_STEP_MS,
                };
                self.session.emit(if remaining > 0 {
                    GameEvent::Countdown { remaining }
                } else {
                    GameEvent::Go
                });
            } else {
                if now - step_began_at < COUNTDOWN_GO_MS {
                    return;
                }
                self.begin_running(now);
            }
        }
    }

    fn run_frame(&mut self, input: &TickInput, now: f64) {
        let session = &mut self.session;
        session.ticks += 1;
        session.elapsed_secs = ((now - session.start_time) / 1000.0).max(0.0);

        session.player.update(input.direction, &session.arena);

        let player_pos = session.player.pos;
        for enemy in step_all(&mut session.enemies, player_pos, &session.arena, now) {
            session.emit(GameEvent::BurstEnded { enemy });
        }

        let tier = self.levels.get(session.current_level);
        if tier.direction_change {
            roll_direction_change(
                &mut session.enemies,
                &mut session.last_direction_change_time,
                now,
                &mut self.rng,
            );
        }
        if tier.speed_burst {
            if let Some(enemy) = roll_speed_burst(
                &mut session.enemies,
                &mut session.last_speed_burst_time,
                now,
                &mut self.rng,
            ) {
                session.emit(GameEvent::BurstStarted { enemy });
            }
        }

        progression::check(session, &self.levels, &mut self.rng);

        if let Some(enemy) = first_hit(&session.player, &session.enemies) {
            log::debug!("Player hit by enemy {}", enemy);
            self.game_over();
        }
    }

    /// Running → GameOver: report the run and tell the UI
    fn game_over(&mut self) {
        self.session.phase = GamePhase::GameOver;
        let summary = self.session.summary();
        log::info!(
            "Game over: {} survived {:.2}s, reached level {}",
            summary.player_name,
            summary.elapsed_secs,
            summary.level
        );
        self.report(&summary);
        self.session.emit(GameEvent::GameOver(summary));
    }

    /// Hand the score to the sink. Failures are logged and otherwise ignored.
    fn report(&mut self, summary: &RunSummary) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let record = ScoreRecord::from_summary(&self.player_id, summary);
        if let Err(e) = sink.submit(record) {
            log::warn!("Failed to save score: {}", e);
        }
    }
}

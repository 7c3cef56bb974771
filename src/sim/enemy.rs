//! Enemy dot behavior
//!
//! Every tick each enemy runs, in order: burst expiry, tracker homing,
//! integration and wall bounce. After the per-agent pass the swarm-wide
//! random rolls (direction change, speed burst) run on their own cooldowns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::levels::LevelConfig;
use super::rng::RandomSource;
use super::state::Arena;
use crate::consts::*;

/// An enemy dot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Steers toward the player instead of flying straight
    pub is_tracker: bool,
    /// Cruise speed set by the current tier
    pub base_speed: f32,
    pub is_bursting: bool,
    /// Host timestamp (ms) when the current burst ends
    pub burst_end_time: f64,
}

impl Enemy {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, base_speed: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            is_tracker: false,
            base_speed,
            is_bursting: false,
            burst_end_time: 0.0,
        }
    }

    /// Enemy at `pos` heading along `angle` at `speed`
    pub fn with_heading(pos: Vec2, angle: f32, radius: f32, speed: f32) -> Self {
        Self::new(pos, Vec2::from_angle(angle) * speed, radius, speed)
    }

    /// Speed this enemy should currently travel at
    #[inline]
    pub fn target_speed(&self) -> f32 {
        if self.is_bursting {
            self.base_speed * BURST_MULTIPLIER
        } else {
            self.base_speed
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Scale velocity to `speed`, keeping its direction. A stopped enemy stays
    /// stopped.
    pub fn rescale(&mut self, speed: f32) {
        self.vel = self.vel.normalize_or_zero() * speed;
    }

    /// Adopt a new cruise speed, keeping direction and any active burst
    pub fn set_base_speed(&mut self, speed: f32) {
        self.base_speed = speed;
        self.rescale(self.target_speed());
    }

    /// End an expired burst. Returns true if the burst ended this call.
    pub fn expire_burst(&mut self, now: f64) -> bool {
        if self.is_bursting && now > self.burst_end_time {
            self.is_bursting = false;
            self.rescale(self.base_speed);
            return true;
        }
        false
    }

    /// Turn gradually toward `target`, then restore the full target speed
    pub fn home_toward(&mut self, target: Vec2) {
        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist <= 0.0 {
            return;
        }

        let desired = to_target / dist * self.base_speed;
        self.vel += (desired - self.vel) * TRACKING_STRENGTH;

        if self.vel.length_squared() > 0.0 {
            self.vel = self.vel.normalize() * self.target_speed();
        }
    }

    /// Advance position by one tick of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Reflect off the arena walls. The enemy always ends fully inside, with
    /// velocity pointing away from any wall it touched.
    pub fn bounce(&mut self, arena: &Arena) {
        let r = self.radius;

        if self.pos.x - r < 0.0 {
            self.pos.x = r;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x + r > arena.width {
            self.pos.x = arena.width - r;
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y - r < 0.0 {
            self.pos.y = r;
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y + r > arena.height {
            self.pos.y = arena.height - r;
            self.vel.y = -self.vel.y.abs();
        }
    }

    /// One tick of per-agent behavior. Returns true if a burst expired.
    pub fn step(&mut self, player_pos: Vec2, arena: &Arena, now: f64) -> bool {
        let burst_ended = self.expire_burst(now);
        if self.is_tracker {
            self.home_toward(player_pos);
        }
        self.integrate();
        self.bounce(arena);
        burst_ended
    }

    /// Start a burst lasting until `now + BURST_DURATION_MS`
    pub fn start_burst(&mut self, now: f64) {
        self.is_bursting = true;
        self.burst_end_time = now + BURST_DURATION_MS;
        self.rescale(self.target_speed());
    }

    /// Point in a uniformly random direction at the current target speed
    pub fn randomize_heading<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let angle = rng.next_angle();
        self.vel = Vec2::from_angle(angle) * self.target_speed();
    }
}

/// Run the per-agent pass over the whole swarm.
/// Returns the indices whose bursts expired.
pub fn step_all(enemies: &mut [Enemy], player_pos: Vec2, arena: &Arena, now: f64) -> Vec<usize> {
    enemies
        .iter_mut()
        .enumerate()
        .filter_map(|(i, enemy)| enemy.step(player_pos, arena, now).then_some(i))
        .collect()
}

/// Periodic direction-change roll.
///
/// Once more than the cooldown has passed since `last_roll`, roll once; on
/// success a random enemy gets a random heading. The cooldown restarts
/// whether or not the roll succeeded. Returns the enemy that turned.
pub fn roll_direction_change<R: RandomSource + ?Sized>(
    enemies: &mut [Enemy],
    last_roll: &mut f64,
    now: f64,
    rng: &mut R,
) -> Option<usize> {
    if now - *last_roll <= DIRECTION_CHANGE_INTERVAL_MS {
        return None;
    }
    *last_roll = now;

    if rng.next_unit() >= DIRECTION_CHANGE_CHANCE || enemies.is_empty() {
        return None;
    }
    let idx = rng.next_index(enemies.len());
    enemies[idx].randomize_heading(rng);
    log::debug!("Enemy {} changed direction", idx);
    Some(idx)
}

/// Periodic speed-burst roll; same cooldown rules as direction changes.
/// Only enemies that are not already bursting are eligible.
pub fn roll_speed_burst<R: RandomSource + ?Sized>(
    enemies: &mut [Enemy],
    last_roll: &mut f64,
    now: f64,
    rng: &mut R,
) -> Option<usize> {
    if now - *last_roll <= SPEED_BURST_INTERVAL_MS {
        return None;
    }
    *last_roll = now;

    if rng.next_unit() >= SPEED_BURST_CHANCE {
        return None;
    }
    let idle: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_bursting)
        .map(|(i, _)| i)
        .collect();
    if idle.is_empty() {
        return None;
    }
    let idx = idle[rng.next_index(idle.len())];
    enemies[idx].start_burst(now);
    log::debug!("Enemy {} bursting until {:.0}", idx, enemies[idx].burst_end_time);
    Some(idx)
}

/// Fixed starting spots as fractions of the arena: the first four form a
/// wide box, the next four sit at the edge midpoints.
const LAYOUT: [(f32, f32); 8] = [
    (0.2, 0.12),
    (0.8, 0.12),
    (0.2, 0.55),
    (0.8, 0.55),
    (0.5, 0.08),
    (0.5, 0.65),
    (0.1, 0.35),
    (0.9, 0.35),
];

/// Opening swarm for a fresh session. Enemies beyond the fixed layout spawn
/// on an edge.
pub fn initial_swarm<R: RandomSource + ?Sized>(
    tier: &LevelConfig,
    arena: &Arena,
    radius: f32,
    rng: &mut R,
) -> Vec<Enemy> {
    (0..tier.enemy_count)
        .map(|i| {
            let mut enemy = match LAYOUT.get(i) {
                Some(&(fx, fy)) => {
                    let pos = arena.clamp_circle(Vec2::new(arena.width * fx, arena.height * fy), radius);
                    Enemy::with_heading(pos, rng.next_angle(), radius, tier.speed)
                }
                None => spawn_at_edge(tier.speed, arena, radius, rng),
            };
            enemy.is_tracker = i < tier.tracker_count;
            enemy
        })
        .collect()
}

/// New enemy on a random arena edge, heading inward with some sideways drift
pub fn spawn_at_edge<R: RandomSource + ?Sized>(
    speed: f32,
    arena: &Arena,
    radius: f32,
    rng: &mut R,
) -> Enemy {
    let edge = rng.next_index(4);
    let along = rng.next_unit();
    let drift = (rng.next_unit() - 0.5) * speed;

    let (pos, vel) = match edge {
        // Top
        0 => (
            Vec2::new(arena.width * along, radius),
            Vec2::new(drift, speed),
        ),
        // Right
        1 => (
            Vec2::new(arena.width - radius, arena.height * along),
            Vec2::new(-speed, drift),
        ),
        // Bottom
        2 => (
            Vec2::new(arena.width * along, arena.height - radius),
            Vec2::new(drift, -speed),
        ),
        // Left
        _ => (
            Vec2::new(radius, arena.height * along),
            Vec2::new(speed, drift),
        ),
    };

    Enemy::new(
        arena.clamp_circle(pos, radius),
        vel.normalize_or_zero() * speed,
        radius,
        speed,
    )
}

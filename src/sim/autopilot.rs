//! Autopilot
//!
//! Flee-the-swarm steering used for demo/idle play and headless runs. Looks
//! a few ticks ahead along each enemy's velocity and pushes away from the
//! ones that will be close, with soft walls and a weak pull to the middle.

use glam::Vec2;

use super::state::GameSession;

/// Ticks of enemy motion to look ahead
const LOOKAHEAD_TICKS: f32 = 12.0;

/// Enemies farther than this (in dot radii, center to center) are ignored
const DANGER_RADII: f32 = 6.0;

/// Distance from a wall (in player radii) where the wall starts pushing
const WALL_MARGIN_RADII: f32 = 2.5;

const CENTER_PULL: f32 = 0.15;

/// Direction the player should move this tick (length 0..=1)
pub fn flee_direction(session: &GameSession) -> Vec2 {
    let player = &session.player;
    let danger = DANGER_RADII * (player.radius + session.enemy_radius);

    let mut push = Vec2::ZERO;
    for enemy in &session.enemies {
        // Closest of current and predicted position
        let predicted = enemy.pos + enemy.vel * LOOKAHEAD_TICKS;
        for at in [enemy.pos, predicted] {
            let away = player.pos - at;
            let dist = away.length();
            if dist >= danger {
                continue;
            }
            let weight = (danger - dist) / danger;
            push += away.normalize_or(Vec2::Y) * weight * weight;
        }
    }

    let size = session.arena.size();
    let (width, height) = (size.x, size.y);
    let margin = WALL_MARGIN_RADII * player.radius;
    let wall = |dist_to_wall: f32| ((margin - dist_to_wall) / margin).max(0.0);
    push.x += wall(player.pos.x) - wall(width - player.pos.x);
    push.y += wall(player.pos.y) - wall(height - player.pos.y);

    let center = size * 0.5;
    let to_center = center - player.pos;
    let max_dim = width.max(height);
    if max_dim > 0.0 {
        push += to_center / max_dim * CENTER_PULL;
    }

    if push.length_squared() < 1e-6 {
        Vec2::ZERO
    } else {
        push.clamp_length_max(1.0)
    }
}

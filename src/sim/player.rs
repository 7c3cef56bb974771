//! Player dot movement

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Arena;

/// The player-controlled dot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Collision radius, supplied by whoever draws the dot
    pub radius: f32,
    /// Units moved per tick at full input
    pub speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self { pos, radius, speed }
    }

    /// Starting spot: horizontally centered, a bit above the middle
    pub fn spawn_point(arena: &Arena) -> Vec2 {
        Vec2::new(arena.width / 2.0, arena.height * 0.35)
    }

    /// Move by one tick of input and keep the dot inside the arena.
    ///
    /// Input longer than 1 is scaled back to unit length so diagonals are not
    /// faster than straight moves.
    pub fn update(&mut self, direction: Vec2, arena: &Arena) {
        let mut direction = if direction.is_finite() {
            direction
        } else {
            Vec2::ZERO
        };
        if direction.length_squared() > 1.0 {
            direction = direction.normalize();
        }

        self.pos += direction * self.speed;
        self.pos = arena.clamp_circle(self.pos, self.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    #[test]
    fn test_moves_by_speed() {
        let mut player = Player::new(Vec2::new(400.0, 300.0), 20.0, 5.0);
        player.update(Vec2::new(1.0, 0.0), &arena());
        assert_eq!(player.pos, Vec2::new(405.0, 300.0));

        player.update(Vec2::new(0.0, -0.5), &arena());
        assert_eq!(player.pos, Vec2::new(405.0, 297.5));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut player = Player::new(Vec2::new(400.0, 300.0), 20.0, 5.0);
        player.update(Vec2::new(1.0, 1.0), &arena());
        let moved = player.pos - Vec2::new(400.0, 300.0);
        assert!((moved.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamped_at_edges() {
        let mut player = Player::new(Vec2::new(22.0, 590.0), 20.0, 5.0);
        player.update(Vec2::new(-1.0, 1.0), &arena());
        assert_eq!(player.pos.x, 20.0);
        assert_eq!(player.pos.y, 580.0);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), 20.0, 5.0);
        player.update(Vec2::new(f32::NAN, 1.0), &arena());
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            dx in -50.0f32..50.0,
            dy in -50.0f32..50.0,
        ) {
            let arena = arena();
            let mut player = Player::new(Vec2::new(x, y), 20.0, 5.0);
            for _ in 0..5 {
                player.update(Vec2::new(dx, dy), &arena);
                prop_assert!(player.pos.x >= 20.0 && player.pos.x <= 780.0);
                prop_assert!(player.pos.y >= 20.0 && player.pos.y <= 580.0);
            }
        }
    }
}

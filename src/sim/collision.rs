//! Player/enemy collision detection
//!
//! Dots are circles. A hit needs the centers to be closer than a forgiving
//! fraction of the summed radii, so a visible touch lands a moment before the
//! run ends.

use glam::Vec2;

use super::enemy::Enemy;
use super::player::Player;
use crate::consts::COLLISION_FORGIVENESS;

/// Do two circles overlap enough to count as a hit?
#[inline]
pub fn circles_collide(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < COLLISION_FORGIVENESS * (a_radius + b_radius)
}

/// Index of the first enemy touching the player
pub fn first_hit(player: &Player, enemies: &[Enemy]) -> Option<usize> {
    enemies
        .iter()
        .position(|e| circles_collide(player.pos, player.radius, e.pos, e.radius))
}

/// True if any enemy touches the player
pub fn player_hit(player: &Player, enemies: &[Enemy]) -> bool {
    first_hit(player, enemies).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn enemy_at(pos: Vec2) -> Enemy {
        Enemy::new(pos, Vec2::new(1.0, 0.0), 25.0, 1.0)
    }

    #[test]
    fn test_hit_inside_forgiving_radius() {
        // 0.85 * (20 + 25) = 38.25
        let player = Player::new(Vec2::new(100.0, 100.0), 20.0, 5.0);
        let enemies = vec![enemy_at(Vec2::new(138.0, 100.0))];
        assert!(player_hit(&player, &enemies));
    }

    #[test]
    fn test_visual_overlap_is_not_yet_a_hit() {
        let player = Player::new(Vec2::new(100.0, 100.0), 20.0, 5.0);
        let enemies = vec![enemy_at(Vec2::new(140.0, 100.0))];
        assert!(!player_hit(&player, &enemies));
    }

    #[test]
    fn test_exact_threshold_is_a_miss() {
        let player = Player::new(Vec2::ZERO, 20.0, 5.0);
        let threshold = COLLISION_FORGIVENESS * (20.0 + 25.0);
        let enemies = vec![enemy_at(Vec2::new(threshold, 0.0))];
        assert!(!player_hit(&player, &enemies));
    }

    #[test]
    fn test_no_enemies_no_hit() {
        let player = Player::new(Vec2::new(100.0, 100.0), 20.0, 5.0);
        assert!(!player_hit(&player, &[]));
    }

    #[test]
    fn test_first_hit_reports_index() {
        let player = Player::new(Vec2::new(100.0, 100.0), 20.0, 5.0);
        let enemies = vec![
            enemy_at(Vec2::new(400.0, 400.0)),
            enemy_at(Vec2::new(110.0, 110.0)),
            enemy_at(Vec2::new(100.0, 100.0)),
        ];
        assert_eq!(first_hit(&player, &enemies), Some(1));
    }

    proptest! {
        #[test]
        fn prop_hit_matches_distance_rule(
            px in 0.0f32..500.0,
            py in 0.0f32..500.0,
            ex in 0.0f32..500.0,
            ey in 0.0f32..500.0,
        ) {
            let player = Player::new(Vec2::new(px, py), 20.0, 5.0);
            let enemies = vec![enemy_at(Vec2::new(ex, ey))];
            let dist = Vec2::new(px, py).distance(Vec2::new(ex, ey));
            prop_assert_eq!(player_hit(&player, &enemies), dist < 0.85 * 45.0);
        }
    }
}

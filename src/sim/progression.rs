//! Level progression
//!
//! Survival time moves the session up the level table one tier at a time.
//! Each level-up tops the swarm up to the tier's size, retunes every enemy's
//! speed and hands tracker duty to the oldest enemies.

use super::enemy::{Enemy, spawn_at_edge};
use super::levels::LevelTable;
use super::rng::RandomSource;
use super::state::{GameEvent, GameSession};

/// Set every enemy's cruise speed, keeping direction and burst state
pub fn update_enemy_speeds(enemies: &mut [Enemy], speed: f32) {
    for enemy in enemies {
        enemy.set_base_speed(speed);
    }
}

/// Exactly the first `count` enemies (spawn order) become trackers
pub fn assign_trackers(enemies: &mut [Enemy], count: usize) {
    for (i, enemy) in enemies.iter_mut().enumerate() {
        enemy.is_tracker = i < count;
    }
}

/// Advance at most one level if the next tier's start time has been reached.
///
/// Returns the new level when a level-up happened. A tick that jumps past
/// several thresholds still only climbs one tier; later ticks catch up.
pub fn check<R: RandomSource + ?Sized>(
    session: &mut GameSession,
    levels: &LevelTable,
    rng: &mut R,
) -> Option<u32> {
    let next = levels.next_after(session.current_level)?;
    if session.elapsed_secs < next.time_start {
        return None;
    }

    session.current_level = next.level;

    let mut spawned = 0;
    while session.enemies.len() < next.enemy_count {
        let enemy = spawn_at_edge(next.speed, &session.arena, session.enemy_radius, rng);
        session.enemies.push(enemy);
        spawned += 1;
    }

    update_enemy_speeds(&mut session.enemies, next.speed);
    assign_trackers(&mut session.enemies, next.tracker_count);

    log::info!(
        "Level {} at {:.2}s: {} enemies (+{}), speed {}, {} trackers",
        next.level,
        session.elapsed_secs,
        session.enemies.len(),
        spawned,
        next.speed,
        next.tracker_count
    );
    session.emit(GameEvent::LevelUp {
        level: next.level,
        spawned,
    });

    Some(next.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::levels::LevelConfig;
    use crate::sim::player::Player;
    use crate::sim::rng::PcgSource;
    use crate::sim::state::Arena;
    use glam::Vec2;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn session_with(levels: &LevelTable, rng: &mut PcgSource) -> GameSession {
        let arena = Arena::new(800.0, 600.0);
        let player = Player::new(Player::spawn_point(&arena), 20.0, 5.0);
        let mut session = GameSession::new(arena, player, 25.0);
        session.enemies = crate::sim::enemy::initial_swarm(levels.first(), &arena, 25.0, rng);
        session
    }

    fn two_tier() -> LevelTable {
        LevelTable::new(vec![
            LevelConfig {
                level: 1,
                time_start: 0.0,
                enemy_count: 4,
                speed: 2.5,
                tracker_count: 0,
                direction_change: false,
                speed_burst: false,
            },
            LevelConfig {
                level: 2,
                time_start: 8.0,
                enemy_count: 4,
                speed: 3.2,
                tracker_count: 0,
                direction_change: false,
                speed_burst: false,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_level_two_at_eight_seconds() {
        let levels = two_tier();
        let mut rng = PcgSource::new(5);
        let mut session = session_with(&levels, &mut rng);

        session.elapsed_secs = 7.99;
        assert_eq!(check(&mut session, &levels, &mut rng), None);
        assert_eq!(session.current_level, 1);

        session.elapsed_secs = 8.0;
        assert_eq!(check(&mut session, &levels, &mut rng), Some(2));
        assert_eq!(session.current_level, 2);
        assert_eq!(session.enemies.len(), 4);
        for enemy in &session.enemies {
            assert!((enemy.speed() - 3.2).abs() < EPS);
            assert_eq!(enemy.base_speed, 3.2);
        }
        assert_eq!(
            session.take_events(),
            vec![GameEvent::LevelUp { level: 2, spawned: 0 }]
        );

        // Top of the table: nothing further
        session.elapsed_secs = 500.0;
        assert_eq!(check(&mut session, &levels, &mut rng), None);
    }

    #[test]
    fn test_level_up_spawns_and_assigns_trackers() {
        let levels = LevelTable::standard();
        let mut rng = PcgSource::new(9);
        let mut session = session_with(&levels, &mut rng);
        // Jump straight to just before level 5 (6 enemies, 1 tracker)
        session.current_level = 4;
        session.elapsed_secs = 45.0;

        assert_eq!(check(&mut session, &levels, &mut rng), Some(5));
        assert_eq!(session.enemies.len(), 6);
        assert!(session.enemies[0].is_tracker);
        assert!(session.enemies[1..].iter().all(|e| !e.is_tracker));
        for enemy in &session.enemies {
            assert!((enemy.speed() - 4.2).abs() < EPS);
        }
    }

    #[test]
    fn test_single_step_per_check() {
        let levels = LevelTable::standard();
        let mut rng = PcgSource::new(2);
        let mut session = session_with(&levels, &mut rng);
        session.elapsed_secs = 100.0;

        assert_eq!(check(&mut session, &levels, &mut rng), Some(2));
        assert_eq!(check(&mut session, &levels, &mut rng), Some(3));
        assert_eq!(session.current_level, 3);
        assert_eq!(session.enemies.len(), 5);
    }

    #[test]
    fn test_speed_update_keeps_burst_multiplier() {
        let mut enemies = vec![
            Enemy::with_heading(Vec2::new(100.0, 100.0), 0.3, 25.0, 2.0),
            Enemy::with_heading(Vec2::new(200.0, 100.0), 2.1, 25.0, 2.0),
        ];
        enemies[1].start_burst(0.0);
        update_enemy_speeds(&mut enemies, 5.0);
        assert!((enemies[0].speed() - 5.0).abs() < EPS);
        assert!((enemies[1].speed() - 9.0).abs() < EPS);
    }

    #[test]
    fn test_assign_trackers_clears_others() {
        let mut enemies: Vec<Enemy> = (0..5)
            .map(|i| Enemy::with_heading(Vec2::new(100.0, 100.0), i as f32, 25.0, 2.0))
            .collect();
        for e in &mut enemies {
            e.is_tracker = true;
        }
        assign_trackers(&mut enemies, 2);
        let flags: Vec<bool> = enemies.iter().map(|e| e.is_tracker).collect();
        assert_eq!(flags, vec![true, true, false, false, false]);
    }

    proptest! {
        #[test]
        fn prop_speed_update_sets_magnitude_and_keeps_direction(
            angle in -3.1f32..3.1,
            start in 0.5f32..10.0,
            speed in 0.5f32..10.0,
        ) {
            let mut enemies = vec![Enemy::with_heading(Vec2::new(50.0, 50.0), angle, 25.0, start)];
            let before = enemies[0].vel.normalize();
            update_enemy_speeds(&mut enemies, speed);
            prop_assert!((enemies[0].speed() - speed).abs() < 1e-3);
            prop_assert!(enemies[0].vel.normalize().dot(before) > 0.9999);
        }
    }
}

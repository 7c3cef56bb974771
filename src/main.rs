//! Dots Arena entry point
//!
//! Native: headless runner. Plays one session on a virtual 60 Hz clock with
//! the autopilot steering, logs every event and records the score in the
//! local leaderboard.
//!
//! Usage: `dots-arena [settings.json] [player-name] [country]`
//!
//! The web build is driven from JavaScript through `dots_arena::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dots_arena::consts::TICKS_PER_SECOND;
    use dots_arena::highscores::{HighScores, Leaderboard, format_age};
    use dots_arena::persistence::{FileStorage, load_or_create_player_id};
    use dots_arena::platform::now_ms;
    use dots_arena::sim::{Engine, GameEvent, GamePhase, TickInput, flee_direction};
    use dots_arena::{ConfigError, GameSettings};

    /// Where the player id and leaderboard are kept, unless overridden
    const DEFAULT_DATA_DIR: &str = ".dots-arena";

    /// Virtual time after which a run that is still going gets stopped
    const MAX_RUN_SECS: f64 = 600.0;

    pub fn run() -> Result<(), ConfigError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => GameSettings::load(&path)?,
            None => GameSettings::default(),
        };
        let player_name = args.next().unwrap_or_else(|| "Autopilot".to_string());
        let country = args.next().unwrap_or_default();

        let data_dir =
            std::env::var("DOTS_ARENA_DATA").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let mut storage = FileStorage::new(&data_dir);
        let player_id = load_or_create_player_id(&mut storage, &mut rand::rng());

        // Low bits of the wall clock are plenty for a demo seed
        let seed = now_ms().to_bits();
        let mut engine = Engine::from_settings(settings, seed);
        engine.set_player_id(player_id.clone());
        engine.set_score_sink(Box::new(Leaderboard::open(storage.clone())));

        let frame_ms = 1000.0 / TICKS_PER_SECOND;
        let mut now = 0.0;
        engine.request_start(&player_name, &country, now);

        loop {
            let input = TickInput {
                direction: flee_direction(engine.session()),
            };
            for event in engine.tick(&input, now) {
                log_event(&event);
            }

            if engine.phase() == GamePhase::GameOver {
                log::info!("Run lasted {} ticks", engine.ticks());
                break;
            }
            if engine.elapsed_secs() >= MAX_RUN_SECS {
                log::info!(
                    "Stopping after {:.0}s of virtual time ({} ticks)",
                    MAX_RUN_SECS,
                    engine.ticks()
                );
                engine.request_pause(now);
                break;
            }
            now += frame_ms;
        }

        print_leaderboard(&HighScores::load(&storage), &player_id);
        Ok(())
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Countdown { remaining } => log::info!("{}...", remaining),
            GameEvent::Go => log::info!("GO!"),
            GameEvent::LevelUp { level, spawned } => {
                log::info!("LEVEL {} (+{} enemies)", level, spawned)
            }
            GameEvent::BurstStarted { enemy } => log::debug!("Enemy {} bursting", enemy),
            GameEvent::BurstEnded { enemy } => log::debug!("Enemy {} calmed down", enemy),
            GameEvent::GameOver(summary) => log::info!(
                "Final: {:.2}s, level {}",
                summary.elapsed_secs,
                summary.level
            ),
            // Lifecycle transitions are already logged by the engine
            GameEvent::Started
            | GameEvent::Paused
            | GameEvent::Resumed { .. }
            | GameEvent::Reset => {}
        }
    }

    fn print_leaderboard(scores: &HighScores, player_id: &str) {
        let now = now_ms();
        println!("\n  #  {:<16} {:<3} {:>9}  {:>5}  When", "Name", "", "Time", "Level");
        for (i, entry) in scores.top().iter().enumerate() {
            let marker = if entry.player_id == player_id { '*' } else { ' ' };
            println!(
                "{}{:>2}  {:<16} {:<3} {:>8.2}s  {:>5}  {}",
                marker,
                i + 1,
                entry.player_name,
                entry.country_code,
                entry.score,
                entry.level,
                format_age(entry.timestamp, now)
            );
        }
        if let Some(best) = scores.personal_best(player_id) {
            println!(
                "\nPersonal best: {:.2}s (rank #{})",
                best.score,
                scores.rank_of(best.score)
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dots Arena (headless) starting...");

    match headless::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is dots_arena::web::start, this is just to satisfy the compiler
}

//! Score persistence
//!
//! Features:
//! - Score records built from finished runs
//! - Fire-and-forget score sinks (failures are logged by the engine, never
//!   fed back into the game)
//! - Key/value storage backends (file on native, LocalStorage on web)
//! - Stable player id

pub mod profile;
pub mod storage;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::round_score;
use crate::sim::RunSummary;

pub use profile::{PLAYER_ID_KEY, generate_player_id, load_or_create_player_id};
pub use storage::{FileStorage, MemoryStorage, Storage};

/// What gets submitted when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_id: String,
    pub player_name: String,
    pub country_code: String,
    /// Survival time in seconds, two decimals
    pub score: f64,
    pub level: u32,
}

impl ScoreRecord {
    pub fn from_summary(player_id: &str, summary: &RunSummary) -> Self {
        Self {
            player_id: player_id.to_string(),
            player_name: summary.player_name.clone(),
            country_code: summary.country_code.clone(),
            score: round_score(summary.elapsed_secs),
            level: summary.level,
        }
    }
}

/// Receiver of finished runs.
///
/// `submit` must not block the game for long; remote backends should queue
/// the record and return.
pub trait ScoreSink {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), PersistenceError>;
}

/// Sink that only writes the record to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl ScoreSink for LogSink {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), PersistenceError> {
        log::info!(
            "Score: {} [{}] {:.2}s level {}",
            record.player_name,
            record.country_code,
            record.score,
            record.level
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_rounds_score() {
        let summary = RunSummary {
            player_name: "Ada".to_string(),
            country_code: "SE".to_string(),
            elapsed_secs: 42.4261,
            level: 5,
        };
        let record = ScoreRecord::from_summary("abc", &summary);
        assert_eq!(record.score, 42.43);
        assert_eq!(record.level, 5);
        assert_eq!(record.player_id, "abc");
        assert_eq!(record.country_code, "SE");
    }

    #[test]
    fn test_log_sink_accepts_everything() {
        let record = ScoreRecord {
            player_id: "id".to_string(),
            player_name: "Ada".to_string(),
            country_code: "XX".to_string(),
            score: 1.5,
            level: 1,
        };
        assert!(LogSink.submit(record).is_ok());
    }
}

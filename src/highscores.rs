//! Local high score leaderboard
//!
//! Kept in a key/value [`Storage`] (a JSON file on native, LocalStorage on
//! web). Scores are survival seconds, higher is better. The table shows the
//! top 10; more runs are kept so personal bests survive a crowded board.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::persistence::{ScoreRecord, ScoreSink, Storage};

/// Rows shown on the leaderboard
pub const MAX_HIGH_SCORES: usize = 10;

/// Runs kept in storage
pub const MAX_STORED_SCORES: usize = 100;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player_id: String,
    pub player_name: String,
    pub country_code: String,
    /// Seconds survived, two decimals
    pub score: f64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    pub fn from_record(record: ScoreRecord, timestamp: f64) -> Self {
        Self {
            player_id: record.player_id,
            player_name: record.player_name,
            country_code: record.country_code,
            score: record.score,
            level: record.level,
            timestamp,
        }
    }
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "dots_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the visible top 10
    pub fn qualifies(&self, score: f64) -> bool {
        if !score.is_finite() || score <= 0.0 {
            return false;
        }
        match self.entries.get(MAX_HIGH_SCORES - 1) {
            Some(lowest) => score > lowest.score,
            None => true,
        }
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: f64) -> Option<usize> {
        self.qualifies(score).then(|| self.rank_of(score))
    }

    /// Rank among all stored runs: one more than the number strictly better
    pub fn rank_of(&self, score: f64) -> usize {
        self.entries.iter().filter(|e| e.score > score).count() + 1
    }

    /// Insert a run. Returns its rank (1-indexed), or None if it was dropped.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !entry.score.is_finite() || entry.score <= 0.0 {
            return None;
        }

        // Ties keep the earlier run ahead
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        if pos >= MAX_STORED_SCORES {
            return None;
        }

        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_STORED_SCORES);
        Some(pos + 1)
    }

    /// The visible leaderboard
    pub fn top(&self) -> &[HighScoreEntry] {
        &self.entries[..self.entries.len().min(MAX_HIGH_SCORES)]
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<f64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best runs of one player, best first
    pub fn personal(&self, player_id: &str) -> Vec<&HighScoreEntry> {
        self.entries
            .iter()
            .filter(|e| e.player_id == player_id)
            .take(MAX_HIGH_SCORES)
            .collect()
    }

    pub fn personal_best(&self, player_id: &str) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.player_id == player_id)
    }

    /// Load from storage; missing or corrupt data gives an empty board
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.sort();
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read high scores: {}", e),
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self)?;
        storage.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Restore best-first order and the size cap after loading
    fn sort(&mut self) {
        self.entries.retain(|e| e.score.is_finite());
        self.entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        self.entries.truncate(MAX_STORED_SCORES);
    }
}

/// Score sink that records runs in the local leaderboard
pub struct Leaderboard<S: Storage> {
    scores: HighScores,
    storage: S,
}

impl<S: Storage> Leaderboard<S> {
    pub fn open(storage: S) -> Self {
        let scores = HighScores::load(&storage);
        Self { scores, storage }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    /// Record a run stamped with `timestamp` and persist the board
    pub fn record(
        &mut self,
        record: ScoreRecord,
        timestamp: f64,
    ) -> Result<Option<usize>, PersistenceError> {
        let rank = self.scores.add(HighScoreEntry::from_record(record, timestamp));
        if rank.is_some() {
            self.scores.save(&mut self.storage)?;
        }
        Ok(rank)
    }
}

impl<S: Storage> ScoreSink for Leaderboard<S> {
    fn submit(&mut self, record: ScoreRecord) -> Result<(), PersistenceError> {
        if let Some(rank) = self.record(record, crate::platform::now_ms())? {
            log::info!("Leaderboard rank #{}", rank);
        }
        Ok(())
    }
}

/// Format the age of a timestamp relative to `now` (both Unix ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        match days {
            1 => "Yesterday".to_string(),
            d if d < 7 => format!("{} days ago", d),
            d => format!("{} weeks ago", d / 7),
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn entry(id: &str, score: f64) -> HighScoreEntry {
        HighScoreEntry {
            player_id: id.to_string(),
            player_name: format!("name-{}", id),
            country_code: "XX".to_string(),
            score,
            level: 1,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_add_keeps_best_first() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry("a", 10.0)), Some(1));
        assert_eq!(scores.add(entry("b", 30.0)), Some(1));
        assert_eq!(scores.add(entry("c", 20.0)), Some(2));
        // Tie goes behind the existing run
        assert_eq!(scores.add(entry("d", 20.0)), Some(3));

        let order: Vec<&str> = scores.entries.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "d", "a"]);
        assert_eq!(scores.top_score(), Some(30.0));
    }

    #[test]
    fn test_zero_score_never_recorded() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0.0));
        assert_eq!(scores.add(entry("a", 0.0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_top_ten_and_qualification() {
        let mut scores = HighScores::new();
        for i in 1..=12 {
            scores.add(entry("p", i as f64));
        }
        assert_eq!(scores.top().len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top()[9].score, 3.0);

        assert!(!scores.qualifies(3.0));
        assert!(scores.qualifies(3.5));
        assert_eq!(scores.potential_rank(3.5), Some(10));
        assert_eq!(scores.potential_rank(100.0), Some(1));
        assert_eq!(scores.potential_rank(1.0), None);
    }

    #[test]
    fn test_rank_counts_strictly_better() {
        let mut scores = HighScores::new();
        for s in [50.0, 40.0, 40.0, 10.0] {
            scores.add(entry("x", s));
        }
        assert_eq!(scores.rank_of(60.0), 1);
        assert_eq!(scores.rank_of(40.0), 2);
        assert_eq!(scores.rank_of(20.0), 4);
    }

    #[test]
    fn test_stored_runs_are_capped() {
        let mut scores = HighScores::new();
        for i in 1..=(MAX_STORED_SCORES + 5) {
            scores.add(entry("p", i as f64));
        }
        assert_eq!(scores.entries.len(), MAX_STORED_SCORES);
        assert_eq!(scores.add(entry("late", 0.5)), None);
    }

    #[test]
    fn test_personal_best() {
        let mut scores = HighScores::new();
        scores.add(entry("me", 12.0));
        scores.add(entry("you", 40.0));
        scores.add(entry("me", 25.5));

        assert_eq!(scores.personal_best("me").map(|e| e.score), Some(25.5));
        assert_eq!(scores.personal("me").len(), 2);
        assert!(scores.personal_best("nobody").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let mut storage = MemoryStorage::default();
        let mut scores = HighScores::new();
        scores.add(entry("a", 11.11));
        scores.add(entry("b", 22.22));
        scores.save(&mut storage).unwrap();

        let loaded = HighScores::load(&storage);
        assert_eq!(loaded.entries, scores.entries);
    }

    #[test]
    fn test_load_sorts_and_tolerates_garbage() {
        let mut storage = MemoryStorage::default();
        storage.set(HighScores::STORAGE_KEY, "not json").unwrap();
        assert!(HighScores::load(&storage).is_empty());

        let unsorted = HighScores {
            entries: vec![entry("a", 1.0), entry("b", 9.0)],
        };
        storage
            .set(HighScores::STORAGE_KEY, &serde_json::to_string(&unsorted).unwrap())
            .unwrap();
        assert_eq!(HighScores::load(&storage).top_score(), Some(9.0));
    }

    #[test]
    fn test_leaderboard_sink_persists() {
        let mut board = Leaderboard::open(MemoryStorage::default());
        let record = ScoreRecord {
            player_id: "id-1".to_string(),
            player_name: "Ada".to_string(),
            country_code: "SE".to_string(),
            score: 33.3,
            level: 3,
        };
        assert_eq!(board.record(record.clone(), 1_000.0).unwrap(), Some(1));
        board.submit(record).unwrap();
        assert_eq!(board.scores().entries.len(), 2);

        let reloaded = HighScores::load(&board.storage);
        assert_eq!(reloaded.entries.len(), 2);
        assert_eq!(reloaded.entries[0].timestamp, 1_000.0);
    }

    #[test]
    fn test_format_age() {
        let min = 60_000.0;
        assert_eq!(format_age(0.0, 30_000.0), "Just now");
        assert_eq!(format_age(0.0, min), "1 min ago");
        assert_eq!(format_age(0.0, 5.0 * min), "5 mins ago");
        assert_eq!(format_age(0.0, 60.0 * min), "1 hour ago");
        assert_eq!(format_age(0.0, 180.0 * min), "3 hours ago");
        assert_eq!(format_age(0.0, 24.0 * 60.0 * min), "Yesterday");
        assert_eq!(format_age(0.0, 3.0 * 24.0 * 60.0 * min), "3 days ago");
        assert_eq!(format_age(0.0, 15.0 * 24.0 * 60.0 * min), "2 weeks ago");
    }
}

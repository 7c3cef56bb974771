//! Difficulty tiers keyed by elapsed survival time

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One difficulty tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 1-based level number
    pub level: u32,
    /// Elapsed seconds at which this tier begins
    pub time_start: f64,
    /// Live enemies required while this tier is active
    pub enemy_count: usize,
    /// Enemy base speed (units per tick)
    pub speed: f32,
    /// The first `tracker_count` enemies home in on the player
    #[serde(default)]
    pub tracker_count: usize,
    /// Random direction changes enabled
    #[serde(default)]
    pub direction_change: bool,
    /// Random speed bursts enabled
    #[serde(default)]
    pub speed_burst: bool,
}

impl LevelConfig {
    const fn tier(
        level: u32,
        time_start: f64,
        enemy_count: usize,
        speed: f32,
        tracker_count: usize,
        direction_change: bool,
        speed_burst: bool,
    ) -> Self {
        Self {
            level,
            time_start,
            enemy_count,
            speed,
            tracker_count,
            direction_change,
            speed_burst,
        }
    }
}

/// Ordered, validated sequence of tiers.
///
/// Always holds at least one tier, numbered from 1, starting at 0s, with
/// strictly increasing start times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelConfig>", into = "Vec<LevelConfig>")]
pub struct LevelTable {
    tiers: Vec<LevelConfig>,
}

impl LevelTable {
    /// Validate and wrap a list of tiers
    pub fn new(tiers: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        let Some(first) = tiers.first() else {
            return Err(ConfigError::EmptyLevelTable);
        };
        if first.time_start != 0.0 {
            return Err(ConfigError::FirstTierNotAtZero(first.time_start));
        }

        for (index, tier) in tiers.iter().enumerate() {
            let expected = index as u32 + 1;
            if tier.level != expected {
                return Err(ConfigError::LevelOutOfSequence {
                    index,
                    expected,
                    found: tier.level,
                });
            }
            if !tier.speed.is_finite() || tier.speed <= 0.0 {
                return Err(ConfigError::InvalidSpeed {
                    level: tier.level,
                    speed: tier.speed,
                });
            }
            if tier.tracker_count > tier.enemy_count {
                return Err(ConfigError::TooManyTrackers {
                    level: tier.level,
                    tracker_count: tier.tracker_count,
                    enemy_count: tier.enemy_count,
                });
            }
        }

        for pair in tiers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.time_start <= prev.time_start || !next.time_start.is_finite() {
                return Err(ConfigError::UnsortedTiers {
                    level: next.level,
                    time_start: next.time_start,
                    previous: prev.time_start,
                });
            }
            if next.enemy_count < prev.enemy_count {
                return Err(ConfigError::DecreasingEnemyCount {
                    level: next.level,
                    enemy_count: next.enemy_count,
                    previous: prev.enemy_count,
                });
            }
        }

        Ok(Self { tiers })
    }

    /// The stock ten-tier schedule
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                LevelConfig::tier(1, 0.0, 4, 2.5, 0, false, false),
                LevelConfig::tier(2, 8.0, 4, 3.2, 0, false, false),
                LevelConfig::tier(3, 18.0, 5, 3.5, 0, false, false),
                LevelConfig::tier(4, 30.0, 5, 4.0, 0, true, false),
                LevelConfig::tier(5, 45.0, 6, 4.2, 1, true, false),
                LevelConfig::tier(6, 60.0, 6, 4.5, 2, true, false),
                LevelConfig::tier(7, 80.0, 7, 4.8, 2, true, false),
                LevelConfig::tier(8, 100.0, 7, 5.2, 2, true, true),
                LevelConfig::tier(9, 125.0, 8, 5.5, 3, true, true),
                LevelConfig::tier(10, 155.0, 8, 6.0, 4, true, true),
            ],
        }
    }

    /// Parse and validate a JSON array of tiers
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tiers: Vec<LevelConfig> = serde_json::from_str(json)?;
        Self::new(tiers)
    }

    /// Tier active at `elapsed_secs`: the last one whose start is not after it.
    /// Clamps to the first tier for negative times.
    pub fn config_for(&self, elapsed_secs: f64) -> &LevelConfig {
        let idx = self
            .tiers
            .partition_point(|t| t.time_start <= elapsed_secs)
            .saturating_sub(1);
        &self.tiers[idx]
    }

    /// Tier by 1-based level number, clamped to the table
    pub fn get(&self, level: u32) -> &LevelConfig {
        let idx = (level.max(1) as usize - 1).min(self.tiers.len() - 1);
        &self.tiers[idx]
    }

    /// The tier after `level`, if the table has one
    pub fn next_after(&self, level: u32) -> Option<&LevelConfig> {
        self.tiers.get(level as usize)
    }

    pub fn first(&self) -> &LevelConfig {
        &self.tiers[0]
    }

    pub fn last(&self) -> &LevelConfig {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Never true for a constructed table; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.tiers.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<LevelConfig>> for LevelTable {
    type Error = ConfigError;

    fn try_from(tiers: Vec<LevelConfig>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<LevelTable> for Vec<LevelConfig> {
    fn from(table: LevelTable) -> Self {
        table.tiers
    }
}

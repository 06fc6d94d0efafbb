//! Tunable game settings

use serde::{Deserialize, Serialize};

/// Game-wide settings, loaded from `config.ron` when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum heroes in the guild
    pub guild_capacity: usize,
    /// Stash grid width
    pub stash_columns: usize,
    /// Stash grid height
    pub stash_rows: usize,
    /// How often map progress is recomputed
    pub tick_interval_ms: u64,
    /// Forces every map run to last this long (useful while testing)
    pub map_duration_override_secs: Option<u32>,
    /// Experience needed for a fresh hero to reach level 2
    pub starting_experience_to_next: u32,
    /// Multiplier applied to the experience requirement on each level-up
    pub experience_growth: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            guild_capacity: 5,
            stash_columns: 12,
            stash_rows: 8,
            tick_interval_ms: 1000,
            map_duration_override_secs: None,
            starting_experience_to_next: 100,
            experience_growth: 1.35,
        }
    }
}

impl GameConfig {
    /// Number of cells in every stash tab
    pub fn stash_size(&self) -> usize {
        self.stash_columns * self.stash_rows
    }

    /// Check settings that would make the world unusable
    pub fn validate(&self) -> Result<(), String> {
        if self.guild_capacity == 0 {
            return Err("guild_capacity must be at least 1".to_string());
        }
        if self.stash_size() == 0 {
            return Err("stash must have at least one cell".to_string());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be positive".to_string());
        }
        if self.experience_growth < 1.0 {
            return Err("experience_growth must be at least 1.0".to_string());
        }
        Ok(())
    }
}

//! Derived hero stats
//!
//! Stats are a pure function of class base stats and level.

use serde::{Deserialize, Serialize};

use crate::data::BaseStats;

/// A hero's derived defensive and offensive numbers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStats {
    pub life: u32,
    pub energy_shield: u32,
    pub armour: u32,
    pub evasion: u32,
    pub damage: u32,
}

fn scale(base: u32, level: u32, per_level: f64) -> u32 {
    let growth = 1.0 + level.saturating_sub(1) as f64 * per_level;
    (base as f64 * growth).round() as u32
}

/// Compute stats for a level from class base stats
pub fn derive_stats(base: &BaseStats, level: u32) -> HeroStats {
    HeroStats {
        life: scale(base.life, level, 0.08),
        energy_shield: scale(base.energy_shield, level, 0.09),
        armour: scale(base.armour, level, 0.12),
        evasion: scale(base.evasion, level, 0.11),
        damage: scale(base.damage, level, 0.10),
    }
}

/// Attacks per second shown on the stats panel
pub fn attack_speed(level: u32) -> f64 {
    1.0 + level.saturating_sub(1) as f64 * 0.02
}

/// Critical strike chance in percent
pub fn crit_chance(level: u32) -> f64 {
    5.0 + level as f64 * 0.2
}

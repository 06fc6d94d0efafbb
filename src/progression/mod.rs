//! Progression systems

pub mod xp;
pub mod stats;

pub use xp::{Experience, map_experience, next_requirement};
pub use stats::{HeroStats, derive_stats, attack_speed, crit_chance};

//! Experience and leveling
//!
//! Overflowing experience carries into the next level, and each level-up
//! multiplies the requirement by the configured growth factor.

use serde::{Deserialize, Serialize};

/// Experience and level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
}

impl Experience {
    /// A fresh level 1 hero
    pub fn new(experience_to_next: u32) -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next: experience_to_next.max(1),
        }
    }

    /// Add XP and return the number of levels gained
    pub fn add_xp(&mut self, amount: u32, growth: f64) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.experience_to_next {
            self.experience -= self.experience_to_next;
            self.level += 1;
            self.experience_to_next = next_requirement(self.experience_to_next, growth);
            gained += 1;
        }
        gained
    }
}

impl Default for Experience {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Requirement for the level after one needing `current`
pub fn next_requirement(current: u32, growth: f64) -> u32 {
    ((current as f64 * growth).round() as u32).max(current.max(1))
}

/// Experience granted for clearing a map of this tier
pub fn map_experience(tier: u32) -> u32 {
    tier.saturating_mul(10).saturating_add(30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_requirement() {
        assert_eq!(next_requirement(100, 1.35), 135);
        assert_eq!(next_requirement(135, 1.35), 182);
        assert_eq!(next_requirement(182, 1.35), 246);
    }

    #[test]
    fn test_add_xp_below_threshold() {
        let mut xp = Experience::new(100);
        assert_eq!(xp.add_xp(40, 1.35), 0);
        assert_eq!(xp, Experience { level: 1, experience: 40, experience_to_next: 100 });
    }

    #[test]
    fn test_add_xp_carries_overflow() {
        let mut xp = Experience::new(100);
        xp.experience = 80;
        assert_eq!(xp.add_xp(40, 1.35), 1);
        assert_eq!(xp, Experience { level: 2, experience: 20, experience_to_next: 135 });
    }

    #[test]
    fn test_add_xp_crosses_multiple_thresholds() {
        let mut xp = Experience::new(100);
        // 100 + 135 = 235 for two levels, 15 left over
        assert_eq!(xp.add_xp(250, 1.35), 2);
        assert_eq!(xp, Experience { level: 3, experience: 15, experience_to_next: 182 });
    }

    #[test]
    fn test_map_experience() {
        assert_eq!(map_experience(1), 40);
        assert_eq!(map_experience(5), 80);
        assert_eq!(map_experience(500_000_000), u32::MAX);
    }
}

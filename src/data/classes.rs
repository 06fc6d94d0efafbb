//! Hero class definitions

use serde::{Deserialize, Serialize};

/// Level-1 stats of a hero class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub life: u32,
    pub energy_shield: u32,
    pub armour: u32,
    pub evasion: u32,
    pub damage: u32,
}

impl Default for BaseStats {
    /// Stats used when a hero references a class that no longer exists
    fn default() -> Self {
        Self {
            life: 50,
            energy_shield: 0,
            armour: 5,
            evasion: 5,
            damage: 5,
        }
    }
}

/// A recruitable hero class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroClass {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_stats: BaseStats,
}

impl HeroClass {
    fn new(id: &str, name: &str, description: &str, base_stats: BaseStats) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            base_stats,
        }
    }
}

/// Built-in hero classes
pub fn default_hero_classes() -> Vec<HeroClass> {
    vec![
        HeroClass::new(
            "marauder",
            "Marauder",
            "Strength-focused juggernaut thriving on raw power and endurance.",
            BaseStats { life: 60, energy_shield: 0, armour: 12, evasion: 6, damage: 5 },
        ),
        HeroClass::new(
            "ranger",
            "Ranger",
            "Agile hunter wielding bows and traps with deadly precision.",
            BaseStats { life: 50, energy_shield: 0, armour: 6, evasion: 14, damage: 6 },
        ),
        HeroClass::new(
            "witch",
            "Witch",
            "Master of the arcane arts commanding elemental and chaos power.",
            BaseStats { life: 48, energy_shield: 20, armour: 4, evasion: 8, damage: 7 },
        ),
        HeroClass::new(
            "duelist",
            "Duelist",
            "Hybrid fighter dancing between blades and agility based defenses.",
            BaseStats { life: 55, energy_shield: 0, armour: 10, evasion: 10, damage: 6 },
        ),
        HeroClass::new(
            "templar",
            "Templar",
            "Devout spellblade balancing divine spells with martial prowess.",
            BaseStats { life: 54, energy_shield: 12, armour: 8, evasion: 6, damage: 6 },
        ),
    ]
}

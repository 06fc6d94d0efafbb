//! Item bases and affix templates for data-driven loot

use serde::{Deserialize, Serialize};
use crate::items::EquipSlot;

/// A base item type that loot is rolled from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBase {
    /// Base type ID (stored on items as their `item_type`)
    pub id: String,
    /// Display label, e.g. "Chest Armour"
    pub label: String,
    /// Equipment slots this base may occupy
    pub allowed_slots: Vec<EquipSlot>,
    /// Hands needed to wield (0 for non-weapons)
    pub hands: u8,
    /// Whether a quiver may be worn alongside this item
    #[serde(default)]
    pub allows_quiver: bool,
}

impl ItemBase {
    fn new(id: &str, label: &str, allowed_slots: &[EquipSlot], hands: u8) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            allowed_slots: allowed_slots.to_vec(),
            hands,
            allows_quiver: false,
        }
    }

    fn with_quiver(mut self) -> Self {
        self.allows_quiver = true;
        self
    }
}

/// Upper bound of an affix roll as a function of map tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AffixScaling {
    /// `base + per_tier * tier`
    Linear { base: u32, per_tier: u32 },
    /// `base + ceil(tier / 2)`
    HalfTier { base: u32 },
}

impl AffixScaling {
    pub fn max_for_tier(&self, tier: u32) -> u32 {
        match *self {
            AffixScaling::Linear { base, per_tier } => base.saturating_add(per_tier.saturating_mul(tier)),
            AffixScaling::HalfTier { base } => base.saturating_add(tier.div_ceil(2)),
        }
    }
}

/// A prefix or suffix template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixTemplate {
    /// Name used in magic item names ("Stalwart", "of the Fox")
    pub name: String,
    /// Stat text following the value ("Armour", "to Physical Damage")
    pub label: String,
    /// Whether the value is a percentage
    #[serde(default)]
    pub percent: bool,
    /// Lowest possible roll
    pub min: u32,
    /// Highest possible roll, scaled by tier
    pub max: AffixScaling,
}

impl AffixTemplate {
    fn new(name: &str, label: &str, percent: bool, min: u32, max: AffixScaling) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            percent,
            min,
            max,
        }
    }

    /// Inclusive roll range for a tier
    pub fn range(&self, tier: u32) -> (u32, u32) {
        let max = self.max.max_for_tier(tier).max(self.min);
        (self.min, max)
    }

    /// Render a rolled value as a stat line, e.g. "+14 Armour" or "+4% Movement Speed"
    pub fn stat_line(&self, value: u32) -> String {
        let unit = if self.percent { "%" } else { "" };
        format!("+{}{} {}", value, unit, self.label)
    }
}

/// Built-in item bases
pub fn default_item_bases() -> Vec<ItemBase> {
    use EquipSlot::*;

    vec![
        ItemBase::new("helmet", "Helmet", &[Helmet], 0),
        ItemBase::new("chest", "Chest Armour", &[BodyArmour], 0),
        ItemBase::new("ring", "Ring", &[RingLeft, RingRight], 0),
        ItemBase::new("amulet", "Amulet", &[Amulet], 0),
        ItemBase::new("belt", "Belt", &[Belt], 0),
        ItemBase::new("sword", "Sword", &[MainHand, OffHand], 1),
        ItemBase::new("wand", "Wand", &[MainHand, OffHand], 1),
        ItemBase::new("bow", "Bow", &[MainHand], 2).with_quiver(),
        ItemBase::new("axe", "Axe", &[MainHand, OffHand], 1),
        ItemBase::new("mace", "Mace", &[MainHand], 1),
        ItemBase::new("staff", "Staff", &[MainHand], 2),
        ItemBase::new("shield", "Shield", &[OffHand], 1),
        ItemBase::new("boots", "Boots", &[Boots], 0),
        ItemBase::new("gloves", "Gloves", &[Gloves], 0),
        ItemBase::new("quiver", "Quiver", &[Quiver], 0),
    ]
}

/// Built-in prefix templates
pub fn default_prefixes() -> Vec<AffixTemplate> {
    vec![
        AffixTemplate::new("Stalwart", "Armour", false, 12, AffixScaling::Linear { base: 18, per_tier: 3 }),
        AffixTemplate::new("Savage", "to Physical Damage", false, 4, AffixScaling::Linear { base: 6, per_tier: 1 }),
        AffixTemplate::new("Glimmering", "Energy Shield", false, 18, AffixScaling::Linear { base: 26, per_tier: 4 }),
        AffixTemplate::new("Fleet", "Movement Speed", true, 3, AffixScaling::HalfTier { base: 5 }),
        AffixTemplate::new("Arcane", "Spell Damage", true, 6, AffixScaling::Linear { base: 9, per_tier: 1 }),
    ]
}

/// Built-in suffix templates
pub fn default_suffixes() -> Vec<AffixTemplate> {
    vec![
        AffixTemplate::new("of the Fox", "Evasion", false, 16, AffixScaling::Linear { base: 24, per_tier: 3 }),
        AffixTemplate::new("of the Giant", "Maximum Life", false, 25, AffixScaling::Linear { base: 40, per_tier: 6 }),
        AffixTemplate::new("of Flames", "Fire Resistance", true, 10, AffixScaling::Linear { base: 15, per_tier: 2 }),
        AffixTemplate::new("of Frost", "Cold Resistance", true, 10, AffixScaling::Linear { base: 15, per_tier: 2 }),
        AffixTemplate::new("of Precision", "Critical Strike Chance", true, 5, AffixScaling::Linear { base: 8, per_tier: 1 }),
    ]
}

/// Flavour words for rare item names (first word)
pub fn default_rare_name_prefixes() -> Vec<String> {
    ["Vicious", "Gilded", "Empyrean", "Ghastly", "Arcane", "Ancient"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Flavour words for rare item names (second word)
pub fn default_rare_name_suffixes() -> Vec<String> {
    ["Hope", "Ritual", "Legion", "Oath", "Bastion", "Legacy"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

//! Item definitions
//!
//! Core item types, rarities, slots and affixes. Items are immutable once
//! rolled; they only move between containers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::ItemBase;

/// Unique item ID (time plus random entropy, see `game::ids`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId(value.to_string())
    }
}

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common, // White - no affixes
    Magic,  // Blue - one prefix and/or one suffix
    Rare,   // Yellow - 1-3 prefixes and 1-3 suffixes
}

impl Rarity {
    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Rarity::Common => (200, 200, 200),
            Rarity::Magic => (110, 140, 255),
            Rarity::Rare => (240, 220, 90),
        }
    }

    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Magic => "Magic",
            Rarity::Rare => "Rare",
        }
    }
}

/// Equipment slot on a hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipSlot {
    Helmet,
    BodyArmour,
    Gloves,
    Boots,
    Belt,
    Amulet,
    RingLeft,
    RingRight,
    MainHand,
    OffHand,
    Quiver,
}

impl EquipSlot {
    /// Stable string ID, matching the serialized form
    pub fn id(&self) -> &'static str {
        match self {
            EquipSlot::Helmet => "helmet",
            EquipSlot::BodyArmour => "bodyArmour",
            EquipSlot::Gloves => "gloves",
            EquipSlot::Boots => "boots",
            EquipSlot::Belt => "belt",
            EquipSlot::Amulet => "amulet",
            EquipSlot::RingLeft => "ringLeft",
            EquipSlot::RingRight => "ringRight",
            EquipSlot::MainHand => "mainHand",
            EquipSlot::OffHand => "offHand",
            EquipSlot::Quiver => "quiver",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Helmet => "Helmet",
            EquipSlot::BodyArmour => "Body Armour",
            EquipSlot::Gloves => "Gloves",
            EquipSlot::Boots => "Boots",
            EquipSlot::Belt => "Belt",
            EquipSlot::Amulet => "Amulet",
            EquipSlot::RingLeft => "Left Ring",
            EquipSlot::RingRight => "Right Ring",
            EquipSlot::MainHand => "Main Hand",
            EquipSlot::OffHand => "Off Hand",
            EquipSlot::Quiver => "Quiver",
        }
    }

    /// Look a slot up by its string ID
    pub fn from_id(id: &str) -> Option<EquipSlot> {
        Self::all().iter().copied().find(|slot| slot.id() == id)
    }

    /// Get all slots in display order
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::Helmet,
            EquipSlot::BodyArmour,
            EquipSlot::Gloves,
            EquipSlot::Boots,
            EquipSlot::Belt,
            EquipSlot::Amulet,
            EquipSlot::RingLeft,
            EquipSlot::RingRight,
            EquipSlot::MainHand,
            EquipSlot::OffHand,
            EquipSlot::Quiver,
        ]
    }
}

/// A rolled affix: the template name plus the stat line it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    pub name: String,
    pub stat: String,
    pub value: u32,
}

/// The main Item struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique instance ID
    pub id: ItemId,
    /// Base type ID ("sword", "ring", ...)
    #[serde(rename = "type")]
    pub item_type: String,
    /// Base display label
    pub base_label: String,
    pub rarity: Rarity,
    /// Full generated name
    pub name: String,
    pub allowed_slots: Vec<EquipSlot>,
    /// Hands needed to wield (0 for non-weapons)
    pub hands: u8,
    /// Whether a quiver may be worn alongside this item
    pub allows_quiver: bool,
    /// Flattened stat lines, prefixes first
    pub stats: Vec<String>,
    pub prefixes: Vec<Affix>,
    pub suffixes: Vec<Affix>,
}

impl Item {
    /// Build an item from its base and rolled affixes
    pub fn from_base(
        id: ItemId,
        base: &ItemBase,
        rarity: Rarity,
        name: String,
        prefixes: Vec<Affix>,
        suffixes: Vec<Affix>,
    ) -> Self {
        let stats = prefixes
            .iter()
            .chain(suffixes.iter())
            .map(|affix| affix.stat.clone())
            .collect();
        Self {
            id,
            item_type: base.id.clone(),
            base_label: base.label.clone(),
            rarity,
            name,
            allowed_slots: base.allowed_slots.clone(),
            hands: base.hands,
            allows_quiver: base.allows_quiver,
            stats,
            prefixes,
            suffixes,
        }
    }

    /// A plain common item of the given base
    pub fn simple(id: ItemId, base: &ItemBase) -> Self {
        let name = format!("Simple {}", base.label);
        Self::from_base(id, base, Rarity::Common, name, Vec::new(), Vec::new())
    }

    /// Check whether this item may occupy a slot at all
    pub fn allows_slot(&self, slot: EquipSlot) -> bool {
        self.allowed_slots.contains(&slot)
    }

    pub fn is_two_handed(&self) -> bool {
        self.hands == 2
    }

    /// Tooltip text: name, then stat lines after a blank line
    pub fn tooltip_lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if !self.stats.is_empty() {
            lines.push(String::new());
            lines.extend(self.stats.iter().cloned());
        }
        lines
    }
}

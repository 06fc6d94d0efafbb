//! Item system

pub mod item;
pub mod equipment;
pub mod loot;
pub mod grid;
pub mod stash;

pub use item::{Item, ItemId, Rarity, EquipSlot, Affix};
pub use equipment::{Equipment, EquipError, Rejected, Unequipped};
pub use loot::{roll_loot, generate_item, roll_rarity, next_item_id};
pub use grid::{StashGrid, GridError, GridPosition};
pub use stash::{Stash, StashTab, StashLocation};

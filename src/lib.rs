//! Guild of Exiles - An idle guild-management RPG
//!
//! Recruit heroes, send them into timed maps, sort the loot they bring back
//! and spend currency at the crafting bench.

pub mod data;
pub mod game;
pub mod items;
pub mod progression;
pub mod ui;

// Re-export commonly used types
pub use data::{ContentTables, DataManager, GameConfig};
pub use game::{ActionError, MapRewards, Store, StoreBuilder, WorldState};
pub use items::{Item, Rarity, roll_loot};

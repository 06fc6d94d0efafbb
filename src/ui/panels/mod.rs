//! The six game panels

pub mod crafting;
pub mod equipment;
pub mod guild;
pub mod maps;
pub mod stash;
pub mod stats;

pub use crafting::CraftingPanel;
pub use equipment::EquipmentPanel;
pub use guild::GuildPanel;
pub use maps::MapsPanel;
pub use stash::StashPanel;
pub use stats::StatsPanel;

//! Data loading and static game content
//!
//! Hero classes, item bases, affix templates, currencies and maps live here
//! as plain data. Defaults are built in and can be overridden by RON files.

pub mod classes;
pub mod items;
pub mod world;
pub mod config;
pub mod loader;

pub use classes::{HeroClass, BaseStats, default_hero_classes};
pub use items::{ItemBase, AffixTemplate, AffixScaling, default_item_bases, default_prefixes, default_suffixes};
pub use world::{CurrencyDef, MapDef, StashTabDef, default_currencies, default_maps, default_stash_tabs};
pub use config::GameConfig;
pub use loader::{DataManager, ContentTables, ConfigError, export_default_data, data_directory};

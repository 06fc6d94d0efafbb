//! RON data loader
//!
//! Loads settings and content tables from external RON files, with fallback
//! to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::classes::{HeroClass, default_hero_classes};
use super::config::GameConfig;
use super::items::{
    AffixScaling, AffixTemplate, ItemBase, default_item_bases, default_prefixes, default_rare_name_prefixes,
    default_rare_name_suffixes, default_suffixes,
};
use super::world::{
    CurrencyDef, MapDef, StashTabDef, default_currencies, default_maps, default_stash_tabs,
};

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "GUILD_OF_EXILES_DATA";

/// Highest map tier content files may declare
pub const MAX_MAP_TIER: u32 = 100;
/// Highest affix bound or per-tier step content files may declare
pub const MAX_AFFIX_VALUE: u32 = 100_000;

const CONFIG_FILE: &str = "config.ron";
const CONTENT_FILE: &str = "content.ron";

/// Errors raised while reading or writing data files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize data: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid data in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// All static content a world is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTables {
    pub classes: Vec<HeroClass>,
    pub item_bases: Vec<ItemBase>,
    pub prefixes: Vec<AffixTemplate>,
    pub suffixes: Vec<AffixTemplate>,
    pub rare_name_prefixes: Vec<String>,
    pub rare_name_suffixes: Vec<String>,
    pub currencies: Vec<CurrencyDef>,
    pub maps: Vec<MapDef>,
    pub stash_tabs: Vec<StashTabDef>,
}

impl Default for ContentTables {
    fn default() -> Self {
        Self {
            classes: default_hero_classes(),
            item_bases: default_item_bases(),
            prefixes: default_prefixes(),
            suffixes: default_suffixes(),
            rare_name_prefixes: default_rare_name_prefixes(),
            rare_name_suffixes: default_rare_name_suffixes(),
            currencies: default_currencies(),
            maps: default_maps(),
            stash_tabs: default_stash_tabs(),
        }
    }
}

impl ContentTables {
    /// Find a hero class by ID
    pub fn class(&self, id: &str) -> Option<&HeroClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Find an item base by ID
    pub fn item_base(&self, id: &str) -> Option<&ItemBase> {
        self.item_bases.iter().find(|b| b.id == id)
    }

    /// Find a map definition by ID
    pub fn map(&self, id: &str) -> Option<&MapDef> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// Check the tables a world cannot be built without
    pub fn validate(&self) -> Result<(), String> {
        if self.stash_tabs.is_empty() {
            return Err("at least one stash tab is required".to_string());
        }
        if self.item_bases.is_empty() {
            return Err("at least one item base is required".to_string());
        }
        if let Some(base) = self.item_bases.iter().find(|b| b.hands > 2) {
            return Err(format!("item base '{}' needs more than two hands", base.id));
        }
        if let Some(map) = self.maps.iter().find(|m| m.tier == 0 || m.tier > MAX_MAP_TIER) {
            return Err(format!(
                "map '{}' has tier {}, expected 1 to {}",
                map.id, map.tier, MAX_MAP_TIER
            ));
        }
        for affix in self.prefixes.iter().chain(&self.suffixes) {
            let (base, per_tier) = match affix.max {
                AffixScaling::Linear { base, per_tier } => (base, per_tier),
                AffixScaling::HalfTier { base } => (base, 0),
            };
            if affix.min.max(base).max(per_tier) > MAX_AFFIX_VALUE {
                return Err(format!(
                    "affix '{}' exceeds the value limit of {}",
                    affix.name, MAX_AFFIX_VALUE
                ));
            }
        }
        Ok(())
    }
}

/// Settings plus content, the full data set a store is built from
#[derive(Debug, Clone, Default)]
pub struct DataManager {
    pub config: GameConfig,
    pub content: ContentTables,
}

/// Directory data files are read from
pub fn data_directory() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/data"))
}

/// Read and deserialize a RON file
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl DataManager {
    /// Load from the default data directory, falling back to built-in data
    pub fn new() -> Self {
        Self::load_from_dir(&data_directory())
    }

    /// Load from a directory; missing or broken files fall back to defaults
    pub fn load_from_dir(base_path: &Path) -> Self {
        Self {
            config: Self::load_config(base_path),
            content: Self::load_content(base_path),
        }
    }

    fn load_config(base_path: &Path) -> GameConfig {
        let path = base_path.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {} found, using default settings", path.display());
            return GameConfig::default();
        }
        let loaded = read_ron::<GameConfig>(&path).and_then(|config| {
            config
                .validate()
                .map(|_| config)
                .map_err(|reason| ConfigError::Invalid { path: path.clone(), reason })
        });
        match loaded {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}. Using default settings.", e);
                GameConfig::default()
            }
        }
    }

    fn load_content(base_path: &Path) -> ContentTables {
        let path = base_path.join(CONTENT_FILE);
        if !path.exists() {
            log::debug!("No {} found, using built-in content", path.display());
            return ContentTables::default();
        }
        let loaded = read_ron::<ContentTables>(&path).and_then(|content| {
            content
                .validate()
                .map(|_| content)
                .map_err(|reason| ConfigError::Invalid { path: path.clone(), reason })
        });
        match loaded {
            Ok(content) => {
                log::info!("Loaded content tables from {}", path.display());
                content
            }
            Err(e) => {
                log::warn!("{}. Using built-in content.", e);
                ContentTables::default()
            }
        }
    }
}

/// Export the built-in settings and content to RON files for easy editing
pub fn export_default_data(base_path: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(base_path).map_err(|source| ConfigError::Io {
        path: base_path.to_path_buf(),
        source,
    })?;

    let pretty = ron::ser::PrettyConfig::default();

    let config_ron = ron::ser::to_string_pretty(&GameConfig::default(), pretty.clone())?;
    let config_path = base_path.join(CONFIG_FILE);
    fs::write(&config_path, config_ron).map_err(|source| ConfigError::Io {
        path: config_path.clone(),
        source,
    })?;

    let content_ron = ron::ser::to_string_pretty(&ContentTables::default(), pretty)?;
    let content_path = base_path.join(CONTENT_FILE);
    fs::write(&content_path, content_ron).map_err(|source| ConfigError::Io {
        path: content_path.clone(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "guild-of-exiles-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = scratch_dir("missing");
        let manager = DataManager::load_from_dir(&dir);
        assert_eq!(manager.config, GameConfig::default());
        assert_eq!(manager.content, ContentTables::default());
    }

    #[test]
    fn test_export_then_load() {
        let dir = scratch_dir("export");
        let result = export_default_data(&dir);
        assert!(result.is_ok(), "Failed to export default data: {:?}", result.err());
        assert!(dir.join(CONFIG_FILE).exists(), "config.ron not created");
        assert!(dir.join(CONTENT_FILE).exists(), "content.ron not created");

        let manager = DataManager::load_from_dir(&dir);
        assert_eq!(manager.config, GameConfig::default());
        assert_eq!(manager.content, ContentTables::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let dir = scratch_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "(guild_capacity: 3, map_duration_override_secs: Some(5))").unwrap();

        let manager = DataManager::load_from_dir(&dir);
        assert_eq!(manager.config.guild_capacity, 3);
        assert_eq!(manager.config.map_duration_override_secs, Some(5));
        assert_eq!(manager.config.stash_columns, GameConfig::default().stash_columns);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_broken_files_fall_back() {
        let dir = scratch_dir("broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "(guild_capacity: \"many\")").unwrap();
        fs::write(dir.join(CONTENT_FILE), "(stash_tabs: [])").unwrap();

        let manager = DataManager::load_from_dir(&dir);
        assert_eq!(manager.config, GameConfig::default());
        assert_eq!(manager.content, ContentTables::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_out_of_range_content_falls_back() {
        let mut content = ContentTables::default();
        content.maps[0].tier = 500_000_000;
        assert!(content.validate().is_err());

        let mut content = ContentTables::default();
        content.prefixes[0].max = AffixScaling::Linear { base: 12, per_tier: u32::MAX };
        assert!(content.validate().is_err());

        let dir = scratch_dir("oversized");
        fs::create_dir_all(&dir).unwrap();
        let mut content = ContentTables::default();
        content.maps[0].tier = 500_000_000;
        let ron = ron::ser::to_string_pretty(&content, ron::ser::PrettyConfig::default()).unwrap();
        fs::write(dir.join(CONTENT_FILE), ron).unwrap();

        let manager = DataManager::load_from_dir(&dir);
        assert_eq!(manager.content.map("dunes").map(|m| m.tier), Some(1));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_content_lookups() {
        let content = ContentTables::default();
        assert_eq!(content.class("witch").map(|c| c.base_stats.life), Some(48));
        assert_eq!(content.map("dunes").map(|m| m.tier), Some(1));
        assert!(content.item_base("bow").is_some_and(|b| b.allows_quiver));
        assert!(content.class("necromancer").is_none());
    }
}

//! World state
//!
//! The single source of truth every panel renders from: the guild, the
//! stash, currency, the crafting bench and map runs.

use serde::{Deserialize, Serialize};

use super::time::Timestamp;
use crate::data::{BaseStats, ContentTables, CurrencyDef, GameConfig, MapDef};
use crate::items::{EquipSlot, Equipment, Item, Stash};
use crate::progression::{Experience, HeroStats, derive_stats};

/// Hero IDs share the item ID format
pub type HeroId = String;

/// A guild member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub class_id: String,
    pub progression: Experience,
    /// Derived from class and level; refreshed on every hero mutation
    pub stats: HeroStats,
    pub equipment: Equipment,
}

impl Hero {
    pub fn new(id: HeroId, name: String, class_id: String, experience_to_next: u32) -> Self {
        Self {
            id,
            name,
            class_id,
            progression: Experience::new(experience_to_next),
            stats: HeroStats::default(),
            equipment: Equipment::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    /// Recompute derived stats from class base stats
    pub fn refresh_stats(&mut self, content: &ContentTables) {
        let base = content
            .class(&self.class_id)
            .map(|class| class.base_stats)
            .unwrap_or_else(BaseStats::default);
        self.stats = derive_stats(&base, self.progression.level);
    }
}

/// A crafting material and how many are held
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub amount: u32,
}

impl From<&CurrencyDef> for Currency {
    fn from(def: &CurrencyDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            amount: def.amount,
        }
    }
}

/// Where a bench item came from, so it can be put back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BenchSource {
    #[serde(rename_all = "camelCase")]
    Stash { tab_id: String, index: usize },
    #[serde(rename_all = "camelCase")]
    Equipment { hero_id: HeroId, slot_id: EquipSlot },
}

/// Record of the last crafting action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftSummary {
    pub material_id: String,
    pub material_name: String,
    pub item_id: String,
    pub item_name: String,
    pub timestamp: Timestamp,
}

/// The single-slot crafting bench
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftingBench {
    pub bench_item: Option<Item>,
    pub bench_source: Option<BenchSource>,
    pub selected_material_id: Option<String>,
    pub last_craft_summary: Option<CraftSummary>,
}

/// Lifecycle of a map run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStatus {
    Idle,
    Running,
    Completed,
}

impl MapStatus {
    pub fn name(&self) -> &'static str {
        match self {
            MapStatus::Idle => "Idle",
            MapStatus::Running => "Running",
            MapStatus::Completed => "Completed",
        }
    }
}

/// A map definition plus its run state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRun {
    pub id: String,
    pub name: String,
    pub tier: u32,
    pub description: String,
    /// Run duration in seconds
    pub duration: u32,
    pub status: MapStatus,
    /// Set only while running or awaiting claim
    pub assigned_hero_id: Option<HeroId>,
    pub started_at: Option<Timestamp>,
    /// 0-100, never decreases while running
    pub progress: u8,
}

impl MapRun {
    pub fn new(def: &MapDef, duration_override: Option<u32>) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            tier: def.tier,
            description: def.description.clone(),
            duration: duration_override.unwrap_or(def.base_duration_secs),
            status: MapStatus::Idle,
            assigned_hero_id: None,
            started_at: None,
            progress: 0,
        }
    }

    /// Return to idle, dropping any assignment
    pub fn reset(&mut self) {
        self.status = MapStatus::Idle;
        self.assigned_hero_id = None;
        self.started_at = None;
        self.progress = 0;
    }

    /// Progress at `now`, clamped to 0..=100
    pub fn progress_at(&self, now: Timestamp) -> u8 {
        let Some(started_at) = self.started_at else {
            return self.progress;
        };
        if self.duration == 0 {
            return 100;
        }
        let elapsed_secs = now.saturating_sub(started_at) as f64 / 1000.0;
        let percent = (elapsed_secs / self.duration as f64 * 100.0).round();
        percent.min(100.0) as u8
    }

    /// Seconds left, estimated from progress
    pub fn remaining_secs(&self) -> u32 {
        let elapsed = (self.progress as f64 / 100.0 * self.duration as f64).round() as u32;
        self.duration.saturating_sub(elapsed)
    }
}

/// The aggregate world state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub guild: Vec<Hero>,
    pub active_hero_id: Option<HeroId>,
    pub stash: Stash,
    pub currency: Vec<Currency>,
    pub crafting: CraftingBench,
    pub maps: Vec<MapRun>,
}

impl WorldState {
    /// A fresh world: empty guild, empty stash, starting currency, idle maps
    pub fn new(config: &GameConfig, content: &ContentTables) -> Self {
        Self {
            guild: Vec::new(),
            active_hero_id: None,
            stash: Stash::new(&content.stash_tabs, config.stash_columns, config.stash_rows),
            currency: content.currencies.iter().map(Currency::from).collect(),
            crafting: CraftingBench::default(),
            maps: content
                .maps
                .iter()
                .map(|def| MapRun::new(def, config.map_duration_override_secs))
                .collect(),
        }
    }

    pub fn hero(&self, id: &str) -> Option<&Hero> {
        self.guild.iter().find(|hero| hero.id == id)
    }

    /// The selected hero, if the selection still resolves
    pub fn active_hero(&self) -> Option<&Hero> {
        self.active_hero_id.as_deref().and_then(|id| self.hero(id))
    }

    pub fn map(&self, id: &str) -> Option<&MapRun> {
        self.maps.iter().find(|map| map.id == id)
    }

    pub fn currency(&self, id: &str) -> Option<&Currency> {
        self.currency.iter().find(|c| c.id == id)
    }

    pub fn currency_mut(&mut self, id: &str) -> Option<&mut Currency> {
        self.currency.iter_mut().find(|c| c.id == id)
    }

    /// The running map a hero is assigned to, if any
    pub fn running_map_for(&self, hero_id: &str) -> Option<&MapRun> {
        self.maps.iter().find(|map| {
            map.status == MapStatus::Running && map.assigned_hero_id.as_deref() == Some(hero_id)
        })
    }

    /// Every item currently owned by a container, for invariant checks
    pub fn all_items(&self) -> Vec<&Item> {
        let stash = self
            .stash
            .tabs
            .iter()
            .flat_map(|tab| tab.grid.items().map(|(_, item)| item));
        let equipped = self.guild.iter().flat_map(|hero| hero.equipment.all_items());
        stash
            .chain(equipped)
            .chain(self.crafting.bench_item.iter())
            .collect()
    }

    /// Serialize the snapshot as JSON for external consumers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dunes() -> MapRun {
        MapRun::new(&ContentTables::default().maps[0], None)
    }

    #[test]
    fn test_new_world() {
        let config = GameConfig::default();
        let state = WorldState::new(&config, &ContentTables::default());
        assert!(state.guild.is_empty());
        assert_eq!(state.active_hero_id, None);
        assert_eq!(state.stash.tabs.len(), 10);
        assert!(state.stash.tabs.iter().all(|t| t.grid.len() == config.stash_size()));
        assert_eq!(state.currency("chaos").map(|c| c.amount), Some(4));
        assert!(state.maps.iter().all(|m| m.status == MapStatus::Idle));
        assert!(state.all_items().is_empty());
    }

    #[test]
    fn test_duration_override() {
        let config = GameConfig { map_duration_override_secs: Some(5), ..GameConfig::default() };
        let state = WorldState::new(&config, &ContentTables::default());
        assert!(state.maps.iter().all(|m| m.duration == 5));
        assert_eq!(dunes().duration, 120);
    }

    #[test]
    fn test_progress_at() {
        let mut map = dunes();
        map.started_at = Some(10_000);
        assert_eq!(map.progress_at(10_000), 0);
        assert_eq!(map.progress_at(70_000), 50);
        // 0.6s of 120s rounds to 1%
        assert_eq!(map.progress_at(10_600), 1);
        assert_eq!(map.progress_at(500_000), 100);
        // Clock running backwards never yields negative progress
        assert_eq!(map.progress_at(0), 0);
    }

    #[test]
    fn test_remaining_secs() {
        let mut map = dunes();
        assert_eq!(map.remaining_secs(), 120);
        map.progress = 25;
        assert_eq!(map.remaining_secs(), 90);
        map.progress = 100;
        assert_eq!(map.remaining_secs(), 0);
    }

    #[test]
    fn test_bench_source_json_shape() {
        let source = BenchSource::Equipment { hero_id: "h".into(), slot_id: EquipSlot::MainHand };
        let value = serde_json::to_value(&source).unwrap();
        assert_eq!(value["type"], "equipment");
        assert_eq!(value["heroId"], "h");
        assert_eq!(value["slotId"], "mainHand");
    }

    #[test]
    fn test_world_json_shape() {
        let state = WorldState::new(&GameConfig::default(), &ContentTables::default());
        let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert!(value["activeHeroId"].is_null());
        assert_eq!(value["guild"], serde_json::json!([]));
        assert_eq!(value["maps"][0]["id"], "dunes");
        assert_eq!(value["maps"][0]["status"], "idle");
        assert!(value["crafting"]["benchItem"].is_null());
        assert_eq!(value["currency"].as_array().map(Vec::len), Some(6));
    }
}

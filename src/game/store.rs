//! Game store
//!
//! Owns the world state and is its only writer. Every mutation goes through
//! a named action which validates first, commits second and then pushes a
//! fresh snapshot to every subscriber. A rejected action leaves the world
//! untouched and notifies nobody.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::error::ActionError;
use super::ids::generate_id;
use super::state::{BenchSource, CraftSummary, Hero, HeroId, MapStatus, WorldState};
use super::time::{Clock, SystemClock, Timestamp};
use crate::data::{ContentTables, DataManager, GameConfig};
use crate::items::{EquipSlot, Item, Rejected, StashLocation, roll_loot};
use crate::progression::map_experience;

/// Display name for heroes whose class is missing from the content tables
const UNKNOWN_CLASS_NAME: &str = "Exile";

/// Receives a snapshot after every committed mutation
pub type Listener = Box<dyn FnMut(Rc<WorldState>)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
    /// Removed while a notification was in flight
    removed: HashSet<u64>,
    notifying: bool,
}

/// Handle returned by [`Store::subscribe`]
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "the listener stays registered until `unsubscribe` is called"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Stop receiving snapshots. Safe to call from inside a listener.
    pub fn unsubscribe(self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        registry.entries.retain(|(id, _)| *id != self.id);
        if registry.notifying {
            registry.removed.insert(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// What a claimed map paid out
#[derive(Debug, Clone, PartialEq)]
pub struct MapRewards {
    pub map_id: String,
    pub hero_id: Option<HeroId>,
    pub experience: u32,
    pub levels_gained: u32,
    /// (currency id, amount granted)
    pub currency: Vec<(String, u32)>,
    pub stored: Vec<StashLocation>,
    /// Drops that did not fit in the active tab
    pub discarded: Vec<Item>,
}

impl MapRewards {
    /// Player-facing notice when loot was lost to a full tab
    pub fn overflow_message(&self) -> Option<String> {
        (!self.discarded.is_empty()).then(|| {
            format!(
                "Stash tab is full: {} item(s) could not be stored and were lost",
                self.discarded.len()
            )
        })
    }
}

/// Builds a [`Store`] with injected settings, content, clock and seed
pub struct StoreBuilder {
    config: GameConfig,
    content: ContentTables,
    seed: Option<u64>,
    clock: Option<Box<dyn Clock>>,
    initial_state: Option<WorldState>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            content: ContentTables::default(),
            seed: None,
            clock: None,
            initial_state: None,
        }
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn content(mut self, content: ContentTables) -> Self {
        self.content = content;
        self
    }

    /// Settings and content from a loaded data set
    pub fn data(self, data: DataManager) -> Self {
        self.config(data.config).content(data.content)
    }

    /// Seed the RNG for reproducible loot and IDs
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Start from an existing world instead of a fresh one
    pub fn initial_state(mut self, state: WorldState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn build(self) -> Store {
        let state = self
            .initial_state
            .unwrap_or_else(|| WorldState::new(&self.config, &self.content));
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut hero_counters: HashMap<String, u32> = HashMap::new();
        for hero in &state.guild {
            let counter = hero_counters.entry(hero.class_id.clone()).or_default();
            *counter = (*counter).max(name_number(&hero.name));
        }

        Store {
            state,
            config: self.config,
            content: self.content,
            rng,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            hero_counters,
            listeners: Rc::new(RefCell::new(Registry::default())),
        }
    }
}

/// Trailing number of a generated hero name, "Witch 2" -> 2
fn name_number(name: &str) -> u32 {
    name.rsplit_once(' ')
        .and_then(|(_, number)| number.parse().ok())
        .unwrap_or(0)
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The world state plus the actions that may change it
pub struct Store {
    state: WorldState,
    config: GameConfig,
    content: ContentTables,
    rng: StdRng,
    clock: Box<dyn Clock>,
    /// Heroes recruited per class, for sequential names
    hero_counters: HashMap<String, u32>,
    listeners: Rc<RefCell<Registry>>,
}

impl Store {
    /// A fresh world on the system clock
    pub fn new(config: GameConfig, content: ContentTables) -> Self {
        StoreBuilder::new().config(config).content(content).build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// An independent copy of the current world
    pub fn get_state(&self) -> WorldState {
        self.state.clone()
    }

    /// Borrow the current world for read-only rendering
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Register a listener; it receives the current snapshot immediately
    #[must_use = "keep the subscription to unsubscribe later"]
    pub fn subscribe(&self, listener: impl FnMut(Rc<WorldState>) + 'static) -> Subscription {
        let mut listener: Listener = Box::new(listener);
        listener(Rc::new(self.state.clone()));

        let mut registry = self.listeners.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Push one shared snapshot to every listener, in registration order
    fn notify(&self) {
        let mut entries = {
            let mut registry = self.listeners.borrow_mut();
            if registry.entries.is_empty() {
                return;
            }
            registry.notifying = true;
            mem::take(&mut registry.entries)
        };

        let snapshot = Rc::new(self.state.clone());
        for (id, listener) in entries.iter_mut() {
            if self.listeners.borrow().removed.contains(id) {
                continue;
            }
            listener(Rc::clone(&snapshot));
        }

        let mut registry = self.listeners.borrow_mut();
        let removed = mem::take(&mut registry.removed);
        entries.retain(|(id, _)| !removed.contains(id));
        entries.append(&mut registry.entries);
        registry.entries = entries;
        registry.notifying = false;
    }

    // ------------------------------------------------------------------
    // Lookups shared by actions
    // ------------------------------------------------------------------

    fn active_hero_pos(&self) -> Result<usize, ActionError> {
        let id = self.state.active_hero_id.as_deref().ok_or(ActionError::NoActiveHero)?;
        self.state
            .guild
            .iter()
            .position(|hero| hero.id == id)
            .ok_or(ActionError::NoActiveHero)
    }

    fn tab_pos(&self, tab_id: &str) -> Result<usize, ActionError> {
        self.state
            .stash
            .tabs
            .iter()
            .position(|tab| tab.id == tab_id)
            .ok_or_else(|| ActionError::UnknownTab(tab_id.to_string()))
    }

    fn map_pos(&self, map_id: &str) -> Result<usize, ActionError> {
        self.state
            .maps
            .iter()
            .position(|map| map.id == map_id)
            .ok_or_else(|| ActionError::UnknownMap(map_id.to_string()))
    }

    /// The item in a stash cell, with the cell validated
    fn stash_item(&self, tab_pos: usize, index: usize) -> Result<&Item, ActionError> {
        let grid = &self.state.stash.tabs[tab_pos].grid;
        if index >= grid.len() {
            return Err(ActionError::InvalidCell(index));
        }
        grid.get(index).ok_or(ActionError::EmptyCell(index))
    }

    /// Store an item whose space was already checked
    fn stash_checked(&mut self, item: Item, tab: Option<&str>, index: Option<usize>) {
        if let Err(item) = self.state.stash.place_item(item, tab, index) {
            log::error!("Stash unexpectedly full, {} ({}) was lost", item.name, item.id);
        }
    }

    fn refresh_hero(&mut self, hero_pos: usize) {
        let hero = &mut self.state.guild[hero_pos];
        hero.refresh_stats(&self.content);
    }

    // ------------------------------------------------------------------
    // Guild
    // ------------------------------------------------------------------

    /// Recruit a hero of a class and make them active
    pub fn create_hero(&mut self, class_id: &str) -> Result<HeroId, ActionError> {
        if class_id.trim().is_empty() {
            return Err(ActionError::NoClassSelected);
        }
        let capacity = self.config.guild_capacity;
        if self.state.guild.len() >= capacity {
            log::warn!("Recruitment rejected: guild full ({})", capacity);
            return Err(ActionError::GuildFull { capacity });
        }

        let class_name = self
            .content
            .class(class_id)
            .map(|class| class.name.clone())
            .unwrap_or_else(|| UNKNOWN_CLASS_NAME.to_string());
        let counter = self.hero_counters.entry(class_id.to_string()).or_default();
        *counter += 1;
        let name = format!("{} {}", class_name, counter);

        let id = generate_id(self.clock.now(), &mut self.rng);
        let mut hero = Hero::new(
            id.clone(),
            name,
            class_id.to_string(),
            self.config.starting_experience_to_next,
        );
        hero.refresh_stats(&self.content);

        log::info!("Recruited {} ({})", hero.name, hero.id);
        self.state.guild.push(hero);
        self.state.active_hero_id = Some(id.clone());
        self.notify();
        Ok(id)
    }

    /// Select the active hero; the ID is not checked
    pub fn select_hero(&mut self, hero_id: &str) {
        self.state.active_hero_id = Some(hero_id.to_string());
        self.notify();
    }

    // ------------------------------------------------------------------
    // Stash
    // ------------------------------------------------------------------

    /// Show a stash tab; the ID is not checked
    pub fn set_active_stash_tab(&mut self, tab_id: &str) {
        self.state.stash.active_tab_id = tab_id.to_string();
        self.notify();
    }

    /// Rename a tab. A blank name keeps the old one.
    pub fn rename_stash_tab(&mut self, tab_id: &str, name: &str) -> Result<(), ActionError> {
        let tab_pos = self.tab_pos(tab_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        self.state.stash.tabs[tab_pos].name = name.to_string();
        self.notify();
        Ok(())
    }

    /// Move an item to an empty cell of the same tab
    pub fn move_stash_item(&mut self, tab_id: &str, from: usize, to: usize) -> Result<(), ActionError> {
        let tab_pos = self.tab_pos(tab_id)?;
        self.state.stash.tabs[tab_pos].grid.move_item(from, to)?;
        log::debug!("Moved stash item in {} from {} to {}", tab_id, from, to);
        self.notify();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    /// Equip the item in a stash cell onto the active hero
    pub fn equip_item_from_stash(
        &mut self,
        tab_id: &str,
        index: usize,
        slot: EquipSlot,
    ) -> Result<(), ActionError> {
        let hero_pos = self.active_hero_pos()?;
        let tab_pos = self.tab_pos(tab_id)?;
        let item = self.stash_item(tab_pos, index)?;
        let equipment = &self.state.guild[hero_pos].equipment;
        equipment.can_equip(item, slot)?;

        // The vacated cell takes the first displaced item
        let needed = equipment.displaced_count(item, slot);
        let free = self.state.stash.free_cells() + 1;
        if needed > free {
            return Err(ActionError::StashFull { needed, free });
        }

        let item = self.state.stash.tabs[tab_pos].grid.take(index)?;
        let displaced = match self.state.guild[hero_pos].equipment.equip(item, slot) {
            Ok(displaced) => displaced,
            Err(Rejected { item, reason }) => {
                self.stash_checked(item, Some(tab_id), Some(index));
                return Err(reason.into());
            }
        };
        for item in displaced {
            log::debug!("{} displaced into the stash", item.name);
            self.stash_checked(item, Some(tab_id), Some(index));
        }

        self.refresh_hero(hero_pos);
        log::debug!("Equipped {}:{} into {}", tab_id, index, slot.id());
        self.notify();
        Ok(())
    }

    /// Move the item in a slot (and a quiver it carried) into the stash
    pub fn unequip_item_to_stash(&mut self, slot: EquipSlot) -> Result<(), ActionError> {
        let hero_pos = self.active_hero_pos()?;
        let needed = self.state.guild[hero_pos].equipment.unequip_count(slot);
        if needed == 0 {
            return Err(ActionError::EmptySlot(slot));
        }
        let free = self.state.stash.free_cells();
        if free < needed {
            return Err(ActionError::StashFull { needed, free });
        }

        let Some(removed) = self.state.guild[hero_pos].equipment.unequip(slot) else {
            return Err(ActionError::EmptySlot(slot));
        };
        let active_tab = self.state.stash.active_tab_id.clone();
        self.stash_checked(removed.item, Some(&active_tab), None);
        if let Some(quiver) = removed.displaced_quiver {
            self.stash_checked(quiver, Some(&active_tab), None);
        }

        self.refresh_hero(hero_pos);
        log::debug!("Unequipped {}", slot.id());
        self.notify();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Crafting bench
    // ------------------------------------------------------------------

    fn ensure_bench_empty(&self) -> Result<(), ActionError> {
        match self.state.crafting.bench_item {
            Some(_) => Err(ActionError::BenchOccupied),
            None => Ok(()),
        }
    }

    /// Put a stash item on the bench
    pub fn place_item_in_bench_from_stash(&mut self, tab_id: &str, index: usize) -> Result<(), ActionError> {
        self.ensure_bench_empty()?;
        let tab_pos = self.tab_pos(tab_id)?;
        self.stash_item(tab_pos, index)?;

        let item = self.state.stash.tabs[tab_pos].grid.take(index)?;
        log::debug!("{} placed on the bench", item.name);
        let bench = &mut self.state.crafting;
        bench.bench_item = Some(item);
        bench.bench_source = Some(BenchSource::Stash {
            tab_id: tab_id.to_string(),
            index,
        });
        bench.last_craft_summary = None;
        self.notify();
        Ok(())
    }

    /// Put an item worn by the active hero on the bench
    pub fn place_item_in_bench_from_equipment(&mut self, slot: EquipSlot) -> Result<(), ActionError> {
        self.ensure_bench_empty()?;
        let hero_pos = self.active_hero_pos()?;
        // A quiver left behind by the main hand needs a stash cell
        let needed = self.state.guild[hero_pos].equipment.unequip_count(slot);
        if needed == 0 {
            return Err(ActionError::EmptySlot(slot));
        }
        let free = self.state.stash.free_cells();
        if free < needed - 1 {
            return Err(ActionError::StashFull { needed: needed - 1, free });
        }

        let Some(removed) = self.state.guild[hero_pos].equipment.unequip(slot) else {
            return Err(ActionError::EmptySlot(slot));
        };
        if let Some(quiver) = removed.displaced_quiver {
            let active_tab = self.state.stash.active_tab_id.clone();
            self.stash_checked(quiver, Some(&active_tab), None);
        }
        self.refresh_hero(hero_pos);

        log::debug!("{} placed on the bench", removed.item.name);
        let hero_id = self.state.guild[hero_pos].id.clone();
        let bench = &mut self.state.crafting;
        bench.bench_item = Some(removed.item);
        bench.bench_source = Some(BenchSource::Equipment { hero_id, slot_id: slot });
        bench.last_craft_summary = None;
        self.notify();
        Ok(())
    }

    /// Send the bench item home, or to the stash if home is gone
    pub fn return_bench_item(&mut self) -> Result<(), ActionError> {
        let item = self
            .state
            .crafting
            .bench_item
            .as_ref()
            .ok_or(ActionError::BenchEmpty)?;

        // Resolve the destination before touching anything
        let home = match &self.state.crafting.bench_source {
            Some(BenchSource::Stash { tab_id, index }) => self
                .state
                .stash
                .tab(tab_id)
                .filter(|tab| tab.grid.is_free(*index))
                .map(|_| ReturnTarget::Stash(tab_id.clone(), Some(*index))),
            Some(BenchSource::Equipment { hero_id, slot_id }) => self
                .state
                .guild
                .iter()
                .position(|hero| &hero.id == hero_id)
                .filter(|&pos| {
                    let equipment = &self.state.guild[pos].equipment;
                    equipment.can_equip(item, *slot_id).is_ok()
                        && equipment.displaced_count(item, *slot_id) == 0
                })
                .map(|pos| ReturnTarget::Equipment(pos, *slot_id)),
            None => None,
        };
        let target = match home {
            Some(target) => target,
            None if self.state.stash.has_space() => {
                ReturnTarget::Stash(self.state.stash.active_tab_id.clone(), None)
            }
            None => {
                log::warn!("Bench item cannot be returned: stash full");
                return Err(ActionError::StashFull { needed: 1, free: 0 });
            }
        };

        let Some(item) = self.state.crafting.bench_item.take() else {
            return Err(ActionError::BenchEmpty);
        };
        self.state.crafting.bench_source = None;
        match target {
            ReturnTarget::Stash(tab_id, index) => {
                log::debug!("Returned {} to the stash", item.name);
                self.stash_checked(item, Some(&tab_id), index);
            }
            ReturnTarget::Equipment(hero_pos, slot) => {
                log::debug!("Returned {} to {}", item.name, slot.id());
                if let Err(Rejected { item, reason }) = self.state.guild[hero_pos].equipment.equip(item, slot) {
                    log::warn!("Re-equip failed ({}), sending to stash", reason);
                    self.stash_checked(item, None, None);
                }
                self.refresh_hero(hero_pos);
            }
        }
        self.notify();
        Ok(())
    }

    /// Select a crafting material; unknown IDs clear the selection
    pub fn set_selected_crafting_material(&mut self, material_id: Option<&str>) {
        self.state.crafting.selected_material_id = material_id
            .filter(|id| self.state.currency(id).is_some())
            .map(str::to_string);
        self.notify();
    }

    /// Spend one of the selected material on the bench item
    pub fn craft_bench_item(&mut self) -> Result<CraftSummary, ActionError> {
        let item = self
            .state
            .crafting
            .bench_item
            .as_ref()
            .ok_or(ActionError::BenchEmpty)?;
        let material_id = self
            .state
            .crafting
            .selected_material_id
            .as_deref()
            .ok_or(ActionError::NoMaterialSelected)?;
        let material = self
            .state
            .currency(material_id)
            .ok_or(ActionError::NoMaterialSelected)?;
        if material.amount == 0 {
            return Err(ActionError::MaterialDepleted(material.name.clone()));
        }

        let summary = CraftSummary {
            material_id: material.id.clone(),
            material_name: material.name.clone(),
            item_id: item.id.to_string(),
            item_name: item.name.clone(),
            timestamp: self.clock.now(),
        };
        if let Some(material) = self.state.currency_mut(&summary.material_id) {
            material.amount -= 1;
        }
        log::info!("Used {} on {}", summary.material_name, summary.item_name);
        self.state.crafting.last_craft_summary = Some(summary.clone());
        self.notify();
        Ok(summary)
    }

    // ------------------------------------------------------------------
    // Maps
    // ------------------------------------------------------------------

    /// Send a hero into a map
    pub fn start_map(&mut self, map_id: &str, hero_id: &str) -> Result<(), ActionError> {
        let map_pos = self.map_pos(map_id)?;
        let hero = self
            .state
            .hero(hero_id)
            .ok_or_else(|| ActionError::UnknownHero(hero_id.to_string()))?;
        let map = &self.state.maps[map_pos];
        if map.status == MapStatus::Running {
            return Err(ActionError::MapAlreadyRunning(map.name.clone()));
        }
        if self.state.running_map_for(hero_id).is_some() {
            return Err(ActionError::HeroBusy(hero.name.clone()));
        }
        if map.status == MapStatus::Completed {
            log::warn!("Restarting {} forfeits its unclaimed rewards", map.name);
        }

        let hero_name = hero.name.clone();
        let now = self.clock.now();
        let map = &mut self.state.maps[map_pos];
        map.status = MapStatus::Running;
        map.assigned_hero_id = Some(hero_id.to_string());
        map.started_at = Some(now);
        map.progress = 0;
        if map.duration == 0 {
            map.progress = 100;
            map.status = MapStatus::Completed;
        }
        log::info!("{} entered {} ({}s)", hero_name, map.name, map.duration);
        self.notify();
        Ok(())
    }

    /// Recompute progress of running maps at `now`
    ///
    /// Returns the IDs of maps that completed on this call. Subscribers are
    /// notified only when some progress value changed.
    pub fn advance(&mut self, now: Timestamp) -> Vec<String> {
        let mut changed = false;
        let mut completed = Vec::new();
        for map in self.state.maps.iter_mut().filter(|m| m.status == MapStatus::Running) {
            let progress = map.progress_at(now).max(map.progress);
            if progress != map.progress {
                map.progress = progress;
                changed = true;
            }
            if map.progress >= 100 {
                map.status = MapStatus::Completed;
                changed = true;
                log::info!("{} completed", map.name);
                completed.push(map.id.clone());
            }
        }
        if changed {
            self.notify();
        }
        completed
    }

    /// [`Store::advance`] at the clock's current time
    pub fn tick_maps(&mut self) -> Vec<String> {
        let now = self.clock.now();
        self.advance(now)
    }

    /// Claim a completed map: experience, currency and loot
    pub fn complete_map(&mut self, map_id: &str) -> Result<MapRewards, ActionError> {
        let map_pos = self.map_pos(map_id)?;
        let map = &self.state.maps[map_pos];
        if map.status != MapStatus::Completed {
            return Err(ActionError::MapNotCompleted(map.name.clone()));
        }
        let tier = map.tier;
        let map_name = map.name.clone();
        let hero_id = map.assigned_hero_id.clone();

        // Experience
        let experience = map_experience(tier);
        let mut levels_gained = 0;
        let hero_pos = hero_id
            .as_deref()
            .and_then(|id| self.state.guild.iter().position(|hero| hero.id == id));
        if let Some(pos) = hero_pos {
            let growth = self.config.experience_growth;
            levels_gained = self.state.guild[pos].progression.add_xp(experience, growth);
            self.refresh_hero(pos);
            if levels_gained > 0 {
                let hero = &self.state.guild[pos];
                log::info!("{} reached level {}", hero.name, hero.level());
            }
        }

        // Currency
        let half_tier = ((tier as f64 / 2.0).round() as u32).max(1);
        let third_tier = (tier / 3).max(1);
        let mut currency = Vec::new();
        for (id, amount) in [("chaos", half_tier), ("alchemy", third_tier)] {
            if let Some(held) = self.state.currency_mut(id) {
                held.amount = held.amount.saturating_add(amount);
                currency.push((id.to_string(), amount));
            }
        }

        // Loot goes to the active tab only
        let loot = roll_loot(tier, &self.content, self.clock.now(), &mut self.rng);
        let active_tab = self.state.stash.active_tab_id.clone();
        let mut stored = Vec::new();
        let mut discarded = Vec::new();
        for item in loot {
            match self.state.stash.tab_mut(&active_tab) {
                Some(tab) => match tab.grid.insert(item, None) {
                    Ok(index) => stored.push(StashLocation {
                        tab_id: active_tab.clone(),
                        index,
                    }),
                    Err(item) => discarded.push(item),
                },
                None => discarded.push(item),
            }
        }
        if !discarded.is_empty() {
            log::warn!("{} loot item(s) from {} did not fit and were lost", discarded.len(), map_name);
        }

        self.state.maps[map_pos].reset();
        log::info!("Claimed {}: {} xp, {} item(s)", map_name, experience, stored.len());
        self.notify();

        Ok(MapRewards {
            map_id: map_id.to_string(),
            hero_id,
            experience: if hero_pos.is_some() { experience } else { 0 },
            levels_gained,
            currency,
            stored,
            discarded,
        })
    }

    /// Force a map back to idle, abandoning any run
    pub fn reset_map(&mut self, map_id: &str) -> Result<(), ActionError> {
        let map_pos = self.map_pos(map_id)?;
        let map = &mut self.state.maps[map_pos];
        map.reset();
        log::info!("{} reset", map.name);
        self.notify();
        Ok(())
    }
}

/// Where a bench item goes back to
enum ReturnTarget {
    Stash(String, Option<usize>),
    Equipment(usize, EquipSlot),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::time::ManualClock;
    use crate::items::ItemId;
    use std::cell::Cell;
    use std::time::Duration;

    const START: Timestamp = 1_700_000_000_000;

    fn store_with(config: GameConfig) -> (Store, ManualClock) {
        let clock = ManualClock::new(START);
        let store = Store::builder()
            .config(config)
            .seed(7)
            .clock(clock.clone())
            .build();
        (store, clock)
    }

    fn new_store() -> (Store, ManualClock) {
        store_with(GameConfig::default())
    }

    /// Drop a plain item of `base` into a specific stash cell
    fn give(store: &mut Store, base: &str, id: &str, tab: &str, index: usize) {
        let base = store.content.item_base(base).unwrap().clone();
        let item = Item::simple(ItemId::from(id), &base);
        store.state.stash.tab_mut(tab).unwrap().grid.place_at(index, item).unwrap();
    }

    fn fill_stash(store: &mut Store, leave_free: usize) {
        let base = store.content.item_base("ring").unwrap().clone();
        let mut free = store.state.stash.free_cells();
        let mut n = 0;
        while free > leave_free {
            let item = Item::simple(ItemId(format!("filler-{}", n)), &base);
            store.state.stash.place_item(item, None, None).unwrap();
            free -= 1;
            n += 1;
        }
    }

    fn count_notifications(store: &Store) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = store.subscribe(move |_| counter.set(counter.get() + 1));
        count.set(0);
        (count, sub)
    }

    fn hero_slot(store: &Store, slot: EquipSlot) -> Option<ItemId> {
        store
            .state()
            .active_hero()
            .and_then(|hero| hero.equipment.get(slot))
            .map(|item| item.id.clone())
    }

    fn assert_unique_ownership(state: &WorldState) {
        let items = state.all_items();
        let ids: HashSet<_> = items.iter().map(|item| item.id.clone()).collect();
        assert_eq!(ids.len(), items.len(), "an item is held twice");
    }

    #[test]
    fn test_create_witch() {
        let (mut store, _) = new_store();
        let id = store.create_hero("witch").unwrap();
        let state = store.get_state();
        assert_eq!(state.guild.len(), 1);
        assert_eq!(state.active_hero_id.as_deref(), Some(id.as_str()));

        let hero = &state.guild[0];
        assert_eq!(hero.name, "Witch 1");
        assert_eq!(hero.level(), 1);
        assert_eq!(hero.stats.life, 48);
        assert_eq!(hero.stats.energy_shield, 20);
        assert_eq!(hero.stats.armour, 4);
        assert_eq!(hero.stats.evasion, 8);
        assert_eq!(hero.stats.damage, 7);
    }

    #[test]
    fn test_hero_names_count_per_class() {
        let (mut store, _) = new_store();
        store.create_hero("witch").unwrap();
        store.create_hero("ranger").unwrap();
        store.create_hero("witch").unwrap();
        let names: Vec<_> = store.state().guild.iter().map(|h| h.name.clone()).collect();
        assert_eq!(names, vec!["Witch 1", "Ranger 1", "Witch 2"]);
    }

    #[test]
    fn test_recruit_needs_a_class() {
        let (mut store, _) = new_store();
        let (count, _sub) = count_notifications(&store);
        assert_eq!(store.create_hero(""), Err(ActionError::NoClassSelected));
        assert_eq!(store.create_hero("  "), Err(ActionError::NoClassSelected));
        assert!(store.state().guild.is_empty());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_unknown_class_recruits_an_exile() {
        let (mut store, _) = new_store();
        store.create_hero("necromancer").unwrap();
        store.create_hero("necromancer").unwrap();
        let hero = &store.state().guild[1];
        assert_eq!(hero.name, "Exile 2");
        assert_eq!(hero.class_id, "necromancer");
        assert_eq!(hero.stats.life, 50);
    }

    #[test]
    fn test_injected_guild_continues_name_numbers() {
        let (mut seeded, _) = new_store();
        seeded.create_hero("witch").unwrap();
        seeded.create_hero("witch").unwrap();
        let mut state = seeded.get_state();
        state.guild.remove(0);
        assert_eq!(state.guild[0].name, "Witch 2");

        let mut store = Store::builder().seed(3).initial_state(state).build();
        store.create_hero("witch").unwrap();
        assert_eq!(store.state().guild[1].name, "Witch 3");
    }

    #[test]
    fn test_listener_outlives_dropped_handle() {
        let (mut store, _) = new_store();
        let (count, sub) = count_notifications(&store);
        drop(sub);
        assert_eq!(store.listener_count(), 1);
        store.create_hero("witch").unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_guild_capacity_rejects_silently() {
        let (mut store, _) = new_store();
        for _ in 0..5 {
            store.create_hero("marauder").unwrap();
        }
        let (count, _sub) = count_notifications(&store);
        let before = store.get_state();

        assert_eq!(store.create_hero("witch"), Err(ActionError::GuildFull { capacity: 5 }));
        assert_eq!(count.get(), 0);
        assert_eq!(store.get_state(), before);
    }

    #[test]
    fn test_subscribe_delivers_immediately_then_in_order() {
        let (mut store, _) = new_store();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        let _a = store.subscribe(move |state| first.borrow_mut().push(("a", state.guild.len())));
        let second = Rc::clone(&log);
        let _b = store.subscribe(move |state| second.borrow_mut().push(("b", state.guild.len())));
        assert_eq!(*log.borrow(), vec![("a", 0), ("b", 0)]);

        store.create_hero("witch").unwrap();
        assert_eq!(*log.borrow(), vec![("a", 0), ("b", 0), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let (mut store, _) = new_store();
        let (count, sub) = count_notifications(&store);
        store.create_hero("witch").unwrap();
        assert_eq!(count.get(), 1);

        sub.unsubscribe();
        assert_eq!(store.listener_count(), 0);
        store.create_hero("witch").unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unsubscribe_from_inside_listener() {
        let (mut store, _) = new_store();
        let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let (inner_handle, inner_calls) = (Rc::clone(&handle), Rc::clone(&calls));
        let sub = store.subscribe(move |_| {
            inner_calls.set(inner_calls.get() + 1);
            if inner_calls.get() > 1 {
                if let Some(sub) = inner_handle.borrow_mut().take() {
                    sub.unsubscribe();
                }
            }
        });
        *handle.borrow_mut() = Some(sub);
        let (other, _other_sub) = count_notifications(&store);

        store.create_hero("witch").unwrap();
        store.create_hero("witch").unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(other.get(), 2);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn test_snapshots_are_isolated() {
        let (mut store, _) = new_store();
        store.create_hero("witch").unwrap();
        let mut copy = store.get_state();
        copy.guild.clear();
        copy.currency[0].amount = 999;
        assert_eq!(store.state().guild.len(), 1);
        assert_ne!(store.state().currency[0].amount, 999);
    }

    #[test]
    fn test_move_stash_item() {
        let (mut store, _) = new_store();
        give(&mut store, "ring", "r", "tab-1", 0);
        give(&mut store, "belt", "b", "tab-1", 1);

        assert_eq!(store.move_stash_item("tab-1", 0, 1), Err(ActionError::CellOccupied(1)));
        assert_eq!(store.move_stash_item("tab-1", 0, 0), Err(ActionError::SameCell));
        assert_eq!(store.move_stash_item("tab-1", 5, 6), Err(ActionError::EmptyCell(5)));
        assert_eq!(store.move_stash_item("tab-1", 0, 500), Err(ActionError::InvalidCell(500)));
        assert_eq!(store.move_stash_item("nope", 0, 2), Err(ActionError::UnknownTab("nope".into())));

        store.move_stash_item("tab-1", 0, 7).unwrap();
        let grid = &store.state().stash.tab("tab-1").unwrap().grid;
        assert_eq!(grid.find(&ItemId::from("r")), Some(7));
        assert_eq!(grid.len(), 96);
    }

    #[test]
    fn test_rename_stash_tab() {
        let (mut store, _) = new_store();
        store.rename_stash_tab("tab-2", "  Currency  ").unwrap();
        assert_eq!(store.state().stash.tab("tab-2").unwrap().name, "Currency");
        store.rename_stash_tab("tab-2", "   ").unwrap();
        assert_eq!(store.state().stash.tab("tab-2").unwrap().name, "Currency");
        assert!(store.rename_stash_tab("tab-99", "x").is_err());
    }

    #[test]
    fn test_equip_requires_active_hero() {
        let (mut store, _) = new_store();
        give(&mut store, "helmet", "h", "tab-1", 0);
        assert_eq!(
            store.equip_item_from_stash("tab-1", 0, EquipSlot::Helmet),
            Err(ActionError::NoActiveHero)
        );
        store.create_hero("witch").unwrap();
        store.select_hero("ghost");
        assert_eq!(
            store.equip_item_from_stash("tab-1", 0, EquipSlot::Helmet),
            Err(ActionError::NoActiveHero)
        );
    }

    #[test]
    fn test_equip_and_unequip_round_trip() {
        let (mut store, _) = new_store();
        store.create_hero("marauder").unwrap();
        give(&mut store, "sword", "sw", "tab-1", 3);

        assert_eq!(
            store.equip_item_from_stash("tab-1", 3, EquipSlot::Helmet),
            Err(ActionError::IncompatibleSlot(EquipSlot::Helmet))
        );
        store.equip_item_from_stash("tab-1", 3, EquipSlot::MainHand).unwrap();
        assert_eq!(hero_slot(&store, EquipSlot::MainHand), Some(ItemId::from("sw")));
        assert!(store.state().stash.tab("tab-1").unwrap().grid.is_empty());
        let equipped = store.state().active_hero().unwrap().equipment.clone();

        store.unequip_item_to_stash(EquipSlot::MainHand).unwrap();
        let index = store.state().stash.tab("tab-1").unwrap().grid.find(&ItemId::from("sw")).unwrap();
        store.equip_item_from_stash("tab-1", index, EquipSlot::MainHand).unwrap();
        assert_eq!(store.state().active_hero().unwrap().equipment, equipped);
        assert_unique_ownership(store.state());
    }

    #[test]
    fn test_two_handed_exclusivity() {
        let (mut store, _) = new_store();
        store.create_hero("templar").unwrap();
        give(&mut store, "shield", "sh", "tab-1", 0);
        give(&mut store, "staff", "st", "tab-1", 1);

        store.equip_item_from_stash("tab-1", 0, EquipSlot::OffHand).unwrap();
        let (count, _sub) = count_notifications(&store);
        let err = store.equip_item_from_stash("tab-1", 1, EquipSlot::MainHand).unwrap_err();
        assert!(matches!(err, ActionError::SlotUnavailable { .. }));
        assert_eq!(count.get(), 0);
        assert_eq!(hero_slot(&store, EquipSlot::MainHand), None);

        store.unequip_item_to_stash(EquipSlot::OffHand).unwrap();
        store.equip_item_from_stash("tab-1", 1, EquipSlot::MainHand).unwrap();
        let index = store.state().stash.tab("tab-1").unwrap().grid.find(&ItemId::from("sh")).unwrap();
        assert!(store.equip_item_from_stash("tab-1", index, EquipSlot::OffHand).is_err());
    }

    #[test]
    fn test_quiver_gating_and_unequip_space() {
        let (mut store, _) = new_store();
        store.create_hero("ranger").unwrap();
        give(&mut store, "quiver", "q", "tab-1", 0);
        give(&mut store, "bow", "bw", "tab-1", 1);

        let err = store.equip_item_from_stash("tab-1", 0, EquipSlot::Quiver).unwrap_err();
        assert_eq!(err.to_string(), "A quiver requires a bow in the main hand");

        store.equip_item_from_stash("tab-1", 1, EquipSlot::MainHand).unwrap();
        store.equip_item_from_stash("tab-1", 0, EquipSlot::Quiver).unwrap();

        fill_stash(&mut store, 1);
        assert_eq!(
            store.unequip_item_to_stash(EquipSlot::MainHand),
            Err(ActionError::StashFull { needed: 2, free: 1 })
        );
        assert_eq!(hero_slot(&store, EquipSlot::Quiver), Some(ItemId::from("q")));

        // Removing the quiver alone fits
        store.unequip_item_to_stash(EquipSlot::Quiver).unwrap();
        assert_eq!(store.unequip_item_to_stash(EquipSlot::Quiver), Err(ActionError::EmptySlot(EquipSlot::Quiver)));
        assert_unique_ownership(store.state());
    }

    #[test]
    fn test_unequip_bow_takes_quiver_along() {
        let (mut store, _) = new_store();
        store.create_hero("ranger").unwrap();
        give(&mut store, "bow", "bw", "tab-1", 0);
        give(&mut store, "quiver", "q", "tab-1", 1);
        store.equip_item_from_stash("tab-1", 0, EquipSlot::MainHand).unwrap();
        store.equip_item_from_stash("tab-1", 1, EquipSlot::Quiver).unwrap();

        store.unequip_item_to_stash(EquipSlot::MainHand).unwrap();
        let grid = &store.state().stash.tab("tab-1").unwrap().grid;
        assert_eq!(grid.count(), 2);
        assert_eq!(hero_slot(&store, EquipSlot::Quiver), None);
    }

    #[test]
    fn test_bench_from_stash_and_back() {
        let (mut store, _) = new_store();
        give(&mut store, "amulet", "am", "tab-2", 9);

        store.place_item_in_bench_from_stash("tab-2", 9).unwrap();
        assert_eq!(store.state().crafting.bench_item.as_ref().map(|i| i.id.clone()), Some(ItemId::from("am")));
        assert_eq!(
            store.state().crafting.bench_source,
            Some(BenchSource::Stash { tab_id: "tab-2".into(), index: 9 })
        );
        give(&mut store, "belt", "b", "tab-2", 0);
        assert_eq!(store.place_item_in_bench_from_stash("tab-2", 0), Err(ActionError::BenchOccupied));

        store.return_bench_item().unwrap();
        assert!(store.state().crafting.bench_item.is_none());
        assert_eq!(store.state().stash.tab("tab-2").unwrap().grid.find(&ItemId::from("am")), Some(9));
        assert_eq!(store.return_bench_item(), Err(ActionError::BenchEmpty));
    }

    #[test]
    fn test_bench_return_falls_back_to_active_tab() {
        let (mut store, _) = new_store();
        give(&mut store, "amulet", "am", "tab-2", 9);
        store.place_item_in_bench_from_stash("tab-2", 9).unwrap();
        give(&mut store, "belt", "b", "tab-2", 9);

        store.return_bench_item().unwrap();
        assert_eq!(store.state().stash.tab("tab-1").unwrap().grid.find(&ItemId::from("am")), Some(0));
    }

    #[test]
    fn test_bench_return_fails_when_stash_full() {
        let (mut store, _) = store_with(GameConfig { stash_columns: 1, stash_rows: 1, ..GameConfig::default() });
        give(&mut store, "amulet", "am", "tab-1", 0);
        store.place_item_in_bench_from_stash("tab-1", 0).unwrap();
        fill_stash(&mut store, 0);

        let (count, _sub) = count_notifications(&store);
        assert_eq!(store.return_bench_item(), Err(ActionError::StashFull { needed: 1, free: 0 }));
        assert_eq!(count.get(), 0);
        assert!(store.state().crafting.bench_item.is_some());
    }

    #[test]
    fn test_bench_from_equipment_returns_to_hero() {
        let (mut store, _) = new_store();
        let hero_id = store.create_hero("ranger").unwrap();
        give(&mut store, "bow", "bw", "tab-1", 0);
        give(&mut store, "quiver", "q", "tab-1", 1);
        store.equip_item_from_stash("tab-1", 0, EquipSlot::MainHand).unwrap();
        store.equip_item_from_stash("tab-1", 1, EquipSlot::Quiver).unwrap();

        store.place_item_in_bench_from_equipment(EquipSlot::MainHand).unwrap();
        assert_eq!(
            store.state().crafting.bench_source,
            Some(BenchSource::Equipment { hero_id, slot_id: EquipSlot::MainHand })
        );
        // The quiver could not stay without the bow
        assert_eq!(hero_slot(&store, EquipSlot::Quiver), None);
        assert!(store.state().stash.tab("tab-1").unwrap().grid.find(&ItemId::from("q")).is_some());
        assert_unique_ownership(store.state());

        store.return_bench_item().unwrap();
        assert_eq!(hero_slot(&store, EquipSlot::MainHand), Some(ItemId::from("bw")));
        assert_eq!(
            store.place_item_in_bench_from_equipment(EquipSlot::Helmet),
            Err(ActionError::EmptySlot(EquipSlot::Helmet))
        );
    }

    #[test]
    fn test_crafting() {
        let (mut store, clock) = new_store();
        give(&mut store, "ring", "r", "tab-1", 0);
        store.place_item_in_bench_from_stash("tab-1", 0).unwrap();

        assert_eq!(store.craft_bench_item(), Err(ActionError::NoMaterialSelected));
        store.set_selected_crafting_material(Some("not-a-currency"));
        assert_eq!(store.state().crafting.selected_material_id, None);

        store.set_selected_crafting_material(Some("exalted"));
        clock.advance(Duration::from_secs(3));
        let summary = store.craft_bench_item().unwrap();
        assert_eq!(summary.material_name, "Exalted Orb");
        assert_eq!(summary.item_id, "r");
        assert_eq!(summary.timestamp, START + 3000);
        assert_eq!(store.state().currency("exalted").unwrap().amount, 0);
        assert_eq!(store.state().crafting.last_craft_summary, Some(summary));

        assert_eq!(
            store.craft_bench_item(),
            Err(ActionError::MaterialDepleted("Exalted Orb".into()))
        );

        store.return_bench_item().unwrap();
        store.place_item_in_bench_from_stash("tab-1", 0).unwrap();
        assert_eq!(store.state().crafting.last_craft_summary, None);
        store.set_selected_crafting_material(None);
        assert_eq!(store.state().crafting.selected_material_id, None);
    }

    #[test]
    fn test_map_runs_to_completion() {
        let (mut store, clock) = new_store();
        let hero = store.create_hero("duelist").unwrap();
        store.start_map("dunes", &hero).unwrap();
        let (count, _sub) = count_notifications(&store);

        clock.advance(Duration::from_secs(60));
        assert!(store.tick_maps().is_empty());
        assert_eq!(store.state().map("dunes").unwrap().progress, 50);
        assert_eq!(count.get(), 1);

        // Same instant, nothing changed
        store.tick_maps();
        assert_eq!(count.get(), 1);

        clock.advance(Duration::from_secs(61));
        assert_eq!(store.tick_maps(), vec!["dunes".to_string()]);
        let map = store.state().map("dunes").unwrap();
        assert_eq!(map.status, MapStatus::Completed);
        assert_eq!(map.progress, 100);

        clock.advance(Duration::from_secs(10));
        assert!(store.tick_maps().is_empty());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_start_map_preconditions() {
        let (mut store, _) = new_store();
        let a = store.create_hero("witch").unwrap();
        let b = store.create_hero("ranger").unwrap();

        assert_eq!(store.start_map("dunes", "ghost"), Err(ActionError::UnknownHero("ghost".into())));
        assert_eq!(store.start_map("moon", &a), Err(ActionError::UnknownMap("moon".into())));

        store.start_map("dunes", &a).unwrap();
        assert_eq!(store.start_map("glacier", &a), Err(ActionError::HeroBusy("Witch 1".into())));
        assert!(matches!(store.start_map("dunes", &b), Err(ActionError::MapAlreadyRunning(_))));
        store.start_map("glacier", &b).unwrap();
        assert_eq!(store.complete_map("dunes").unwrap_err(), ActionError::MapNotCompleted("Dunes Map".into()));
    }

    #[test]
    fn test_complete_tier_one_map() {
        let (mut store, clock) = new_store();
        let hero = store.create_hero("witch").unwrap();
        store.start_map("dunes", &hero).unwrap();
        clock.advance(Duration::from_secs(120));
        store.tick_maps();

        let rewards = store.complete_map("dunes").unwrap();
        assert_eq!(rewards.experience, 40);
        assert_eq!(rewards.levels_gained, 0);
        assert_eq!(rewards.currency, vec![("chaos".to_string(), 1), ("alchemy".to_string(), 1)]);
        assert!(rewards.discarded.is_empty());
        assert_eq!(rewards.overflow_message(), None);

        let state = store.state();
        assert_eq!(state.hero(&hero).unwrap().progression.experience, 40);
        assert_eq!(state.currency("chaos").unwrap().amount, 5);
        assert_eq!(state.currency("alchemy").unwrap().amount, 13);
        assert_eq!(state.stash.tab("tab-1").unwrap().grid.count(), rewards.stored.len());
        assert!((1..=3).contains(&rewards.stored.len()));

        let map = state.map("dunes").unwrap();
        assert_eq!(map.status, MapStatus::Idle);
        assert_eq!(map.assigned_hero_id, None);
        assert_eq!(map.progress, 0);
    }

    #[test]
    fn test_complete_map_levels_up() {
        let (mut store, _) = store_with(GameConfig { map_duration_override_secs: Some(0), ..GameConfig::default() });
        let hero = store.create_hero("marauder").unwrap();
        store.state.guild[0].progression.experience = 90;

        store.start_map("glacier", &hero).unwrap();
        assert_eq!(store.state().map("glacier").unwrap().status, MapStatus::Completed);
        let rewards = store.complete_map("glacier").unwrap();
        assert_eq!(rewards.experience, 80);
        assert_eq!(rewards.levels_gained, 1);
        assert_eq!(rewards.currency, vec![("chaos".to_string(), 3), ("alchemy".to_string(), 1)]);

        let hero = store.state().hero(&hero).unwrap();
        assert_eq!(hero.progression.level, 2);
        assert_eq!(hero.progression.experience, 70);
        assert_eq!(hero.progression.experience_to_next, 135);
        // Marauder life 60 at level 2
        assert_eq!(hero.stats.life, 65);
    }

    #[test]
    fn test_complete_map_with_full_stash() {
        let (mut store, _) = store_with(GameConfig {
            stash_columns: 2,
            stash_rows: 1,
            map_duration_override_secs: Some(0),
            ..GameConfig::default()
        });
        let hero = store.create_hero("templar").unwrap();
        fill_stash(&mut store, 0);
        let before = store.get_state().stash;

        store.start_map("jungle-valley", &hero).unwrap();
        let rewards = store.complete_map("jungle-valley").unwrap();
        assert!(rewards.stored.is_empty());
        assert!(!rewards.discarded.is_empty());
        assert!(rewards.overflow_message().is_some());
        assert_eq!(store.state().stash, before);
        assert_eq!(store.state().map("jungle-valley").unwrap().status, MapStatus::Idle);
        assert_unique_ownership(store.state());
    }

    #[test]
    fn test_reset_map_aborts_run() {
        let (mut store, clock) = new_store();
        let hero = store.create_hero("witch").unwrap();
        store.start_map("dunes", &hero).unwrap();
        clock.advance(Duration::from_secs(30));
        store.tick_maps();

        store.reset_map("dunes").unwrap();
        let map = store.state().map("dunes").unwrap();
        assert_eq!(map.status, MapStatus::Idle);
        assert_eq!(map.progress, 0);
        assert!(store.state().running_map_for(&hero).is_none());
        store.start_map("dunes", &hero).unwrap();
        assert_eq!(store.reset_map("moon"), Err(ActionError::UnknownMap("moon".into())));
    }

    #[test]
    fn test_ownership_survives_mixed_actions() {
        let (mut store, _) = store_with(GameConfig { map_duration_override_secs: Some(0), ..GameConfig::default() });
        let hero = store.create_hero("ranger").unwrap();
        for _ in 0..5 {
            store.start_map("glacier", &hero).unwrap();
            store.complete_map("glacier").unwrap();
        }
        give(&mut store, "bow", "bw", "tab-3", 0);
        give(&mut store, "quiver", "q", "tab-3", 1);
        store.equip_item_from_stash("tab-3", 0, EquipSlot::MainHand).unwrap();
        store.equip_item_from_stash("tab-3", 1, EquipSlot::Quiver).unwrap();
        store.place_item_in_bench_from_equipment(EquipSlot::MainHand).unwrap();
        store.return_bench_item().unwrap();
        store.unequip_item_to_stash(EquipSlot::MainHand).unwrap();

        assert_unique_ownership(store.state());
        for tab in &store.state().stash.tabs {
            assert_eq!(tab.grid.len(), 96);
        }
    }

    #[test]
    fn test_seeded_stores_roll_identical_loot() {
        let run = || {
            let (mut store, _) = store_with(GameConfig { map_duration_override_secs: Some(0), ..GameConfig::default() });
            let hero = store.create_hero("witch").unwrap();
            store.start_map("glacier", &hero).unwrap();
            let rewards = store.complete_map("glacier").unwrap();
            (hero, rewards.stored.len(), store.get_state().stash)
        };
        assert_eq!(run(), run());
    }
}

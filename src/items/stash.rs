//! Stash tabs
//!
//! The guild's shared storage: named tabs, each a fixed-size grid.

use serde::{Deserialize, Serialize};

use super::grid::StashGrid;
use super::item::Item;
use crate::data::StashTabDef;

/// A single named stash tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashTab {
    pub id: String,
    pub name: String,
    pub grid: StashGrid,
}

impl StashTab {
    pub fn new(id: impl Into<String>, name: impl Into<String>, columns: usize, rows: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grid: StashGrid::new(columns, rows),
        }
    }
}

/// Where an item landed in the stash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashLocation {
    pub tab_id: String,
    pub index: usize,
}

/// All stash tabs plus the one currently shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stash {
    pub tabs: Vec<StashTab>,
    pub active_tab_id: String,
}

impl Stash {
    /// Create empty tabs from their definitions; the first tab starts active
    pub fn new(defs: &[StashTabDef], columns: usize, rows: usize) -> Self {
        let tabs: Vec<StashTab> = defs
            .iter()
            .map(|def| StashTab::new(def.id.clone(), def.name.clone(), columns, rows))
            .collect();
        let active_tab_id = tabs.first().map(|tab| tab.id.clone()).unwrap_or_default();
        Self { tabs, active_tab_id }
    }

    pub fn tab(&self, id: &str) -> Option<&StashTab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn tab_mut(&mut self, id: &str) -> Option<&mut StashTab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    /// The active tab, if its ID still resolves
    pub fn active_tab(&self) -> Option<&StashTab> {
        self.tab(&self.active_tab_id)
    }

    /// Free cells across every tab
    pub fn free_cells(&self) -> usize {
        self.tabs.iter().map(|tab| tab.grid.free_count()).sum()
    }

    /// Whether any tab has a free cell
    pub fn has_space(&self) -> bool {
        self.tabs.iter().any(|tab| tab.grid.first_free().is_some())
    }

    /// Store an item, trying the preferred tab (and cell) first, then the
    /// remaining tabs in order. Hands the item back when everything is full.
    pub fn place_item(
        &mut self,
        item: Item,
        preferred_tab: Option<&str>,
        preferred_index: Option<usize>,
    ) -> Result<StashLocation, Item> {
        let preferred_pos = preferred_tab.and_then(|id| self.tabs.iter().position(|tab| tab.id == id));

        let order = preferred_pos
            .into_iter()
            .chain((0..self.tabs.len()).filter(|&pos| Some(pos) != preferred_pos));

        let mut item = item;
        for pos in order.collect::<Vec<_>>() {
            let preferred = if Some(pos) == preferred_pos { preferred_index } else { None };
            let tab = &mut self.tabs[pos];
            match tab.grid.insert(item, preferred) {
                Ok(index) => {
                    return Ok(StashLocation {
                        tab_id: tab.id.clone(),
                        index,
                    })
                }
                Err(returned) => item = returned,
            }
        }
        Err(item)
    }
}

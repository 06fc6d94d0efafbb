//! Currencies, maps and stash tabs a new world starts with

use serde::{Deserialize, Serialize};

/// A crafting currency and its starting amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDef {
    pub id: String,
    pub name: String,
    pub amount: u32,
}

/// A map that heroes can be sent to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDef {
    pub id: String,
    pub name: String,
    pub tier: u32,
    pub description: String,
    /// Run duration in seconds
    pub base_duration_secs: u32,
}

/// A stash tab created empty at start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashTabDef {
    pub id: String,
    pub name: String,
}

fn currency(id: &str, name: &str, amount: u32) -> CurrencyDef {
    CurrencyDef {
        id: id.to_string(),
        name: name.to_string(),
        amount,
    }
}

/// Built-in currency list
pub fn default_currencies() -> Vec<CurrencyDef> {
    vec![
        currency("transmutation", "Orb of Transmutation", 20),
        currency("alchemy", "Orb of Alchemy", 12),
        currency("chaos", "Chaos Orb", 4),
        currency("exalted", "Exalted Orb", 1),
        currency("scouring", "Orb of Scouring", 8),
        currency("binding", "Orb of Binding", 16),
    ]
}

/// Built-in maps
pub fn default_maps() -> Vec<MapDef> {
    vec![
        MapDef {
            id: "dunes".to_string(),
            name: "Dunes Map".to_string(),
            tier: 1,
            description: "A serene desert hideout overrun by corrupted wildlife.".to_string(),
            base_duration_secs: 120,
        },
        MapDef {
            id: "jungle-valley".to_string(),
            name: "Jungle Valley Map".to_string(),
            tier: 3,
            description: "Dense overgrowth concealing primal terrors and hidden caches.".to_string(),
            base_duration_secs: 180,
        },
        MapDef {
            id: "glacier".to_string(),
            name: "Glacier Map".to_string(),
            tier: 5,
            description: "Frozen cliffs echoing with the whispers of ancient exiles.".to_string(),
            base_duration_secs: 240,
        },
    ]
}

/// Ten tabs, "Tab 1" through "Tab 10"
pub fn default_stash_tabs() -> Vec<StashTabDef> {
    (1..=10)
        .map(|n| StashTabDef {
            id: format!("tab-{}", n),
            name: format!("Tab {}", n),
        })
        .collect()
}

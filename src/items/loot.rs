//! Loot generation system
//!
//! Rolls map rewards: drop count, rarity, affixes and names, all scaled by
//! map tier.

use rand::Rng;
use rand::seq::SliceRandom;

use super::item::{Affix, Item, ItemId, Rarity};
use crate::data::{AffixTemplate, ContentTables, ItemBase};
use crate::game::ids::generate_id;
use crate::game::time::Timestamp;

/// Get next unique item ID
pub fn next_item_id(now: Timestamp, rng: &mut impl Rng) -> ItemId {
    ItemId(generate_id(now, rng))
}

/// Inclusive bounds on how many items a map of this tier drops
pub fn drop_count_range(tier: u32) -> (u32, u32) {
    (1, (tier.div_ceil(2) + 2).max(2))
}

/// Rarity weights for a tier as (rare, magic, common)
pub fn rarity_weights(tier: u32) -> (f64, f64, f64) {
    let tier = tier as f64;
    (1.0 + tier, 5.0 + tier * 1.5, 12.0)
}

/// Generate a random rarity based on map tier
pub fn roll_rarity(tier: u32, rng: &mut impl Rng) -> Rarity {
    let (rare, magic, common) = rarity_weights(tier);
    let roll = rng.gen::<f64>() * (rare + magic + common);

    if roll < rare {
        Rarity::Rare
    } else if roll < rare + magic {
        Rarity::Magic
    } else {
        Rarity::Common
    }
}

/// Get (prefix, suffix) counts for a rarity
pub fn affix_counts(rarity: Rarity, rng: &mut impl Rng) -> (usize, usize) {
    match rarity {
        Rarity::Common => (0, 0),
        Rarity::Magic => {
            let prefixes = usize::from(rng.gen_bool(0.5));
            let suffixes = usize::from(rng.gen_bool(0.5));
            if prefixes == 0 && suffixes == 0 {
                (1, 0)
            } else {
                (prefixes, suffixes)
            }
        }
        Rarity::Rare => (rng.gen_range(1..=3), rng.gen_range(1..=3)),
    }
}

/// Roll a single affix value from its template
pub fn roll_affix(template: &AffixTemplate, tier: u32, rng: &mut impl Rng) -> Affix {
    let (min, max) = template.range(tier);
    let value = rng.gen_range(min..=max);
    Affix {
        name: template.name.clone(),
        stat: template.stat_line(value),
        value,
    }
}

/// Draw up to `count` distinct affixes; each template is used at most once
pub fn roll_affixes(
    templates: &[AffixTemplate],
    count: usize,
    tier: u32,
    rng: &mut impl Rng,
) -> Vec<Affix> {
    let mut pool: Vec<&AffixTemplate> = templates.iter().collect();
    let mut affixes = Vec::with_capacity(count);
    for _ in 0..count {
        if pool.is_empty() {
            break;
        }
        let index = rng.gen_range(0..pool.len());
        let template = pool.swap_remove(index);
        affixes.push(roll_affix(template, tier, rng));
    }
    affixes
}

/// "{prefix} {base} {suffix}", leaving out whichever side is missing
pub fn magic_name(base_label: &str, prefixes: &[Affix], suffixes: &[Affix]) -> String {
    match (prefixes.first(), suffixes.first()) {
        (Some(prefix), Some(suffix)) => format!("{} {} {}", prefix.name, base_label, suffix.name),
        (Some(prefix), None) => format!("{} {}", prefix.name, base_label),
        (None, Some(suffix)) => format!("{} {}", base_label, suffix.name),
        (None, None) => format!("Enchanted {}", base_label),
    }
}

/// Two flavour words then the base, independent of the item's affixes
pub fn rare_name(base_label: &str, content: &ContentTables, rng: &mut impl Rng) -> String {
    let first = content
        .rare_name_prefixes
        .choose(rng)
        .map(String::as_str)
        .unwrap_or("Nameless");
    let second = content
        .rare_name_suffixes
        .choose(rng)
        .map(String::as_str)
        .unwrap_or("Relic");
    format!("{} {} {}", first, second, base_label)
}

/// Roll one item of the given base
pub fn generate_item_from_base(
    base: &ItemBase,
    tier: u32,
    content: &ContentTables,
    now: Timestamp,
    rng: &mut impl Rng,
) -> Item {
    let rarity = roll_rarity(tier, rng);
    let (prefix_count, suffix_count) = affix_counts(rarity, rng);

    let prefixes = roll_affixes(&content.prefixes, prefix_count, tier, rng);
    let suffixes = roll_affixes(&content.suffixes, suffix_count, tier, rng);

    let name = match rarity {
        Rarity::Common => format!("Simple {}", base.label),
        Rarity::Magic => magic_name(&base.label, &prefixes, &suffixes),
        Rarity::Rare => rare_name(&base.label, content, rng),
    };

    let id = next_item_id(now, rng);
    Item::from_base(id, base, rarity, name, prefixes, suffixes)
}

/// Roll one item from a uniformly chosen base
pub fn generate_item(
    tier: u32,
    content: &ContentTables,
    now: Timestamp,
    rng: &mut impl Rng,
) -> Option<Item> {
    let base = content.item_bases.choose(rng)?;
    Some(generate_item_from_base(base, tier, content, now, rng))
}

/// Roll the full reward for completing a map of this tier
pub fn roll_loot(
    tier: u32,
    content: &ContentTables,
    now: Timestamp,
    rng: &mut impl Rng,
) -> Vec<Item> {
    let (min, max) = drop_count_range(tier);
    let count = rng.gen_range(min..=max);
    (0..count)
        .filter_map(|_| generate_item(tier, content, now, rng))
        .collect()
}

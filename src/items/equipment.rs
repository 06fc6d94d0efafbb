//! Equipment system
//!
//! A hero's worn items and the slot rules: two-handed weapons block the off
//! hand, and a quiver needs a bow in the main hand.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::{EquipSlot, Item};

/// Why an item cannot go into a slot right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EquipError {
    #[error("this item cannot be equipped in the {} slot", .0.name())]
    IncompatibleSlot(EquipSlot),
    #[error("the {} slot is occupied", .0.name())]
    SlotOccupied(EquipSlot),
    #[error("the off hand must be empty to wield a two-handed item")]
    OffHandOccupied,
    #[error("the main hand item uses both hands")]
    MainHandTwoHanded,
    #[error("a quiver requires a bow in the main hand")]
    QuiverNeedsBow,
}

/// An item refused by [`Equipment::equip`], handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub item: Item,
    pub reason: EquipError,
}

/// What came off a hero when a slot was emptied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unequipped {
    pub item: Item,
    /// A quiver that could no longer be worn once the main hand emptied
    pub displaced_quiver: Option<Item>,
}

/// Hero equipment slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Items in each slot
    slots: HashMap<EquipSlot, Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Get item in a slot
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    /// Check if a slot is empty
    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        !self.slots.contains_key(&slot)
    }

    /// Get all equipped items
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.slots.values()
    }

    /// Slots paired with their contents, in display order
    pub fn iter_slots(&self) -> impl Iterator<Item = (EquipSlot, Option<&Item>)> {
        EquipSlot::all().iter().map(move |slot| (*slot, self.get(*slot)))
    }

    fn main_hand_two_handed(&self) -> bool {
        self.get(EquipSlot::MainHand).is_some_and(Item::is_two_handed)
    }

    fn main_hand_allows_quiver(&self) -> bool {
        self.get(EquipSlot::MainHand).is_some_and(|item| item.allows_quiver)
    }

    /// Check whether `item` may be equipped into `slot` right now
    pub fn can_equip(&self, item: &Item, slot: EquipSlot) -> Result<(), EquipError> {
        if !item.allows_slot(slot) {
            return Err(EquipError::IncompatibleSlot(slot));
        }
        if !self.is_empty(slot) {
            return Err(EquipError::SlotOccupied(slot));
        }
        match slot {
            EquipSlot::MainHand => {
                if item.is_two_handed() && !self.is_empty(EquipSlot::OffHand) {
                    return Err(EquipError::OffHandOccupied);
                }
            }
            EquipSlot::OffHand => {
                if self.main_hand_two_handed() {
                    return Err(EquipError::MainHandTwoHanded);
                }
            }
            EquipSlot::Quiver => {
                if !self.main_hand_allows_quiver() {
                    return Err(EquipError::QuiverNeedsBow);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Equip an item, returning anything pushed out of other slots
    ///
    /// A two-handed main hand pushes out the off hand, and a main hand that
    /// cannot carry a quiver pushes out the quiver.
    pub fn equip(&mut self, item: Item, slot: EquipSlot) -> Result<Vec<Item>, Rejected> {
        if let Err(reason) = self.can_equip(&item, slot) {
            return Err(Rejected { item, reason });
        }

        let mut displaced = Vec::new();
        if slot == EquipSlot::MainHand {
            if item.is_two_handed() {
                displaced.extend(self.slots.remove(&EquipSlot::OffHand));
            }
            if !item.allows_quiver {
                displaced.extend(self.slots.remove(&EquipSlot::Quiver));
            }
        }
        self.slots.insert(slot, item);
        Ok(displaced)
    }

    /// Number of items [`Equipment::equip`] would push out for this slot
    pub fn displaced_count(&self, item: &Item, slot: EquipSlot) -> usize {
        if slot != EquipSlot::MainHand {
            return 0;
        }
        let off_hand = item.is_two_handed() && !self.is_empty(EquipSlot::OffHand);
        let quiver = !item.allows_quiver && !self.is_empty(EquipSlot::Quiver);
        usize::from(off_hand) + usize::from(quiver)
    }

    /// Unequip an item from a slot
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Unequipped> {
        let item = self.slots.remove(&slot)?;
        let displaced_quiver = if slot == EquipSlot::MainHand {
            self.slots.remove(&EquipSlot::Quiver)
        } else {
            None
        };
        Some(Unequipped { item, displaced_quiver })
    }

    /// Number of items [`Equipment::unequip`] would hand back for `slot`
    pub fn unequip_count(&self, slot: EquipSlot) -> usize {
        if self.is_empty(slot) {
            return 0;
        }
        if slot == EquipSlot::MainHand && !self.is_empty(EquipSlot::Quiver) {
            2
        } else {
            1
        }
    }
}

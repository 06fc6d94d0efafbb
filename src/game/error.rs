//! Action rejections
//!
//! Every store action either commits or returns one of these, leaving the
//! world untouched. The display text is what the player sees.

use thiserror::Error;

use crate::items::{EquipError, EquipSlot, GridError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("The guild is full ({capacity} heroes)")]
    GuildFull { capacity: usize },
    #[error("Choose a class to recruit")]
    NoClassSelected,
    #[error("Select a hero first")]
    NoActiveHero,
    #[error("No hero with id '{0}'")]
    UnknownHero(String),
    #[error("No stash tab with id '{0}'")]
    UnknownTab(String),
    #[error("Stash cell {0} does not exist")]
    InvalidCell(usize),
    #[error("Stash cell {0} is empty")]
    EmptyCell(usize),
    #[error("Stash cell {0} is already occupied")]
    CellOccupied(usize),
    #[error("Source and target cells are the same")]
    SameCell,
    #[error("This item cannot be equipped in the {} slot", .0.name())]
    IncompatibleSlot(EquipSlot),
    #[error("{reason}")]
    SlotUnavailable { reason: String },
    #[error("Nothing is equipped in the {} slot", .0.name())]
    EmptySlot(EquipSlot),
    #[error("Not enough stash space: need {needed} free cell(s), have {free}")]
    StashFull { needed: usize, free: usize },
    #[error("The crafting bench is already holding an item")]
    BenchOccupied,
    #[error("The crafting bench is empty")]
    BenchEmpty,
    #[error("Select a crafting material first")]
    NoMaterialSelected,
    #[error("No {0} left")]
    MaterialDepleted(String),
    #[error("No map with id '{0}'")]
    UnknownMap(String),
    #[error("{0} is already running a map")]
    HeroBusy(String),
    #[error("{0} is already running")]
    MapAlreadyRunning(String),
    #[error("{0} has not been completed yet")]
    MapNotCompleted(String),
}

impl From<GridError> for ActionError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfBounds(index) => ActionError::InvalidCell(index),
            GridError::EmptyCell(index) => ActionError::EmptyCell(index),
            GridError::Occupied(index) => ActionError::CellOccupied(index),
            GridError::SameCell => ActionError::SameCell,
        }
    }
}

impl From<EquipError> for ActionError {
    fn from(err: EquipError) -> Self {
        match err {
            EquipError::IncompatibleSlot(slot) => ActionError::IncompatibleSlot(slot),
            other => ActionError::SlotUnavailable {
                reason: capitalize(&other.to_string()),
            },
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

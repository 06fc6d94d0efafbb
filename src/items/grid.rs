//! Fixed-size stash grid
//!
//! Every cell holds at most one item. The number of cells is fixed when the
//! grid is created and never changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::{Item, ItemId};

/// Errors moving items around inside a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {0} is outside the stash grid")]
    OutOfBounds(usize),
    #[error("cell {0} is empty")]
    EmptyCell(usize),
    #[error("cell {0} is already occupied")]
    Occupied(usize),
    #[error("source and target cells are the same")]
    SameCell,
}

/// Position in the stash grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: usize,
    pub y: usize,
}

/// Row-major grid of optional items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Option<Item>>,
}

impl StashGrid {
    /// Create a new empty grid
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![None; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn cells(&self) -> &[Option<Item>] {
        &self.cells
    }

    /// Convert a cell index to a column/row position
    pub fn position(&self, index: usize) -> Option<GridPosition> {
        (index < self.len() && self.columns > 0).then(|| GridPosition {
            x: index % self.columns,
            y: index / self.columns,
        })
    }

    /// Convert a column/row position to a cell index
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.columns && y < self.rows).then(|| y * self.columns + x)
    }

    /// Get the item in a cell
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Check that a cell exists and holds nothing
    pub fn is_free(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    pub fn first_free(&self) -> Option<usize> {
        self.cells.iter().position(Option::is_none)
    }

    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.len() - self.free_count()
    }

    /// Find the cell holding an item
    pub fn find(&self, id: &ItemId) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| cell.as_ref().is_some_and(|item| &item.id == id))
    }

    /// Items with their cell indices, in grid order
    pub fn items(&self) -> impl Iterator<Item = (usize, &Item)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.as_ref().map(|item| (index, item)))
    }

    /// Remove and return the item in a cell
    pub fn take(&mut self, index: usize) -> Result<Item, GridError> {
        let cell = self.cells.get_mut(index).ok_or(GridError::OutOfBounds(index))?;
        cell.take().ok_or(GridError::EmptyCell(index))
    }

    /// Put an item into a specific empty cell, handing it back on failure
    pub fn place_at(&mut self, index: usize, item: Item) -> Result<(), (Item, GridError)> {
        match self.cells.get_mut(index) {
            None => Err((item, GridError::OutOfBounds(index))),
            Some(Some(_)) => Err((item, GridError::Occupied(index))),
            Some(cell) => {
                *cell = Some(item);
                Ok(())
            }
        }
    }

    /// Insert into the preferred cell if free, else the first free cell
    pub fn insert(&mut self, item: Item, preferred: Option<usize>) -> Result<usize, Item> {
        let target = preferred
            .filter(|&index| self.is_free(index))
            .or_else(|| self.first_free());
        match target {
            Some(index) => {
                self.cells[index] = Some(item);
                Ok(index)
            }
            None => Err(item),
        }
    }

    /// Move an item from one cell to an empty one
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), GridError> {
        if from >= self.len() {
            return Err(GridError::OutOfBounds(from));
        }
        if to >= self.len() {
            return Err(GridError::OutOfBounds(to));
        }
        if from == to {
            return Err(GridError::SameCell);
        }
        if self.cells[from].is_none() {
            return Err(GridError::EmptyCell(from));
        }
        if self.cells[to].is_some() {
            return Err(GridError::Occupied(to));
        }
        self.cells.swap(from, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_item_bases;

    fn make_test_item(id: &str) -> Item {
        let base = default_item_bases().remove(0);
        Item::simple(ItemId::from(id), &base)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = StashGrid::new(4, 3);
        assert_eq!(grid.len(), 12);
        assert!(grid.is_empty());
        assert_eq!(grid.free_count(), 12);
        assert_eq!(grid.first_free(), Some(0));
    }

    #[test]
    fn test_insert_prefers_free_cell() {
        let mut grid = StashGrid::new(3, 2);
        assert_eq!(grid.insert(make_test_item("a"), Some(4)), Ok(4));
        // Preferred cell taken, falls back to first free
        assert_eq!(grid.insert(make_test_item("b"), Some(4)), Ok(0));
        // Out-of-range preference also falls back
        assert_eq!(grid.insert(make_test_item("c"), Some(99)), Ok(1));
        assert_eq!(grid.count(), 3);
        assert_eq!(grid.find(&ItemId::from("a")), Some(4));
    }

    #[test]
    fn test_grid_full() {
        let mut grid = StashGrid::new(2, 2);
        for i in 0..4 {
            assert!(grid.insert(make_test_item(&i.to_string()), None).is_ok());
        }
        let extra = make_test_item("extra");
        assert_eq!(grid.insert(extra.clone(), None), Err(extra));
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn test_take_and_place() {
        let mut grid = StashGrid::new(2, 2);
        assert_eq!(grid.take(1), Err(GridError::EmptyCell(1)));
        assert_eq!(grid.take(9), Err(GridError::OutOfBounds(9)));

        grid.place_at(1, make_test_item("a")).unwrap();
        let (back, err) = grid.place_at(1, make_test_item("b")).unwrap_err();
        assert_eq!(err, GridError::Occupied(1));
        assert_eq!(back.id, ItemId::from("b"));

        let taken = grid.take(1).unwrap();
        assert_eq!(taken.id, ItemId::from("a"));
        assert!(grid.is_free(1));
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn test_move_item_rules() {
        let mut grid = StashGrid::new(3, 1);
        grid.place_at(0, make_test_item("a")).unwrap();
        grid.place_at(1, make_test_item("b")).unwrap();

        assert_eq!(grid.move_item(0, 0), Err(GridError::SameCell));
        assert_eq!(grid.move_item(0, 1), Err(GridError::Occupied(1)));
        assert_eq!(grid.move_item(2, 0), Err(GridError::EmptyCell(2)));
        assert_eq!(grid.move_item(0, 3), Err(GridError::OutOfBounds(3)));

        assert_eq!(grid.move_item(0, 2), Ok(()));
        assert!(grid.get(0).is_none());
        assert_eq!(grid.get(2).map(|i| i.id.clone()), Some(ItemId::from("a")));
    }

    #[test]
    fn test_positions() {
        let grid = StashGrid::new(4, 3);
        assert_eq!(grid.position(5), Some(GridPosition { x: 1, y: 1 }));
        assert_eq!(grid.index_of(1, 1), Some(5));
        assert_eq!(grid.index_of(4, 0), None);
        assert_eq!(grid.position(12), None);
    }
}

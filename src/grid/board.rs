//! The 3×3 personal grid.
//!
//! Cells are indexed 0-8 in row-major order:
//!
//! ```text
//! 0 1 2
//! 3 4 5
//! 6 7 8
//! ```
//!
//! Outside the crate a grid is read-only; every mutation goes through the
//! placement resolver.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, PlacedCard};
use crate::core::{EngineError, EngineResult};

/// Number of cells on a grid.
pub const GRID_SIZE: usize = 9;

/// Cells per row.
pub const GRID_WIDTH: usize = 3;

/// A player's grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [Option<PlacedCard>; GRID_SIZE],
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject indices outside the grid.
    pub fn check_index(index: usize) -> EngineResult<usize> {
        if index < GRID_SIZE {
            Ok(index)
        } else {
            Err(EngineError::IndexOutOfRange(index))
        }
    }

    /// Get the card on a cell, if any. Out-of-range indices return `None`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedCard> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Is the cell unoccupied?
    #[must_use]
    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    /// Iterate over every cell in index order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, Option<&PlacedCard>)> {
        self.cells.iter().map(Option::as_ref).enumerate()
    }

    /// Iterate over occupied cells.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &PlacedCard)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|placed| (i, placed)))
    }

    /// Indices of unoccupied cells.
    #[must_use]
    pub fn empty_cells(&self) -> SmallVec<[usize; GRID_SIZE]> {
        (0..GRID_SIZE).filter(|&i| self.is_empty_at(i)).collect()
    }

    /// A full grid ends the round.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Physical cards on the grid, covered cards included.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.occupied().map(|(_, placed)| placed.card_count()).sum()
    }

    /// Every physical card on the grid, covered cards included.
    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.occupied().flat_map(|(_, placed)| placed.cards())
    }

    /// Orthogonal neighbors of a cell.
    #[must_use]
    pub fn neighbors(index: usize) -> SmallVec<[usize; 4]> {
        let mut out = SmallVec::new();
        let (row, col) = (index / GRID_WIDTH, index % GRID_WIDTH);
        if row > 0 {
            out.push(index - GRID_WIDTH);
        }
        if row + 1 < GRID_WIDTH {
            out.push(index + GRID_WIDTH);
        }
        if col > 0 {
            out.push(index - 1);
        }
        if col + 1 < GRID_WIDTH {
            out.push(index + 1);
        }
        out
    }

    pub(crate) fn set(&mut self, index: usize, placed: PlacedCard) {
        self.cells[index] = Some(placed);
    }

    pub(crate) fn take(&mut self, index: usize) -> Option<PlacedCard> {
        self.cells[index].take()
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut PlacedCard> {
        self.cells[index].as_mut()
    }

    /// Empty the grid, returning every physical card on it.
    pub(crate) fn drain(&mut self) -> Vec<Card> {
        let cards = self.all_cards().collect();
        self.cells = Default::default();
        cards
    }
}

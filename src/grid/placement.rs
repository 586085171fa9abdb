//! Placement resolver.
//!
//! Every card has a target cell (`value - 1`). What happens when a card is
//! placed depends on what already sits on that cell:
//!
//! | target cell | scenario | effect |
//! |---|---|---|
//! | empty or face-down | `Empty` | card goes face up on the target |
//! | face-up, unvalidated | `Duplicate` | caller keeps the new or the existing card |
//! | validated | `StackAnywhere` | card goes face down on a chosen empty cell |
//!
//! Resolution is pure: the input grid is never touched and the resulting
//! grid is returned inside a [`Placement`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::board::Grid;
use super::scoring::{is_cell_validated, recompute_validation};
use crate::cards::{Card, PlacedCard};
use crate::core::{EngineError, EngineResult};

/// Placement situation for a card on a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    Empty,
    Duplicate,
    StackAnywhere,
}

/// Which card stays on top when a duplicate is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicateChoice {
    /// The new card goes on top and the existing one is consumed.
    KeepNew,
    /// The existing card stays and the new one is consumed beneath it.
    KeepExisting,
}

/// Caller-supplied arguments for scenarios that need a decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementArgs {
    /// Required for `Duplicate`.
    pub choice: Option<DuplicateChoice>,
    /// Required for `StackAnywhere`.
    pub chosen_index: Option<usize>,
}

impl PlacementArgs {
    #[must_use]
    pub fn keep(choice: DuplicateChoice) -> Self {
        Self {
            choice: Some(choice),
            chosen_index: None,
        }
    }

    #[must_use]
    pub fn stack_at(index: usize) -> Self {
        Self {
            choice: None,
            chosen_index: Some(index),
        }
    }
}

/// Result of placing one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The grid after placement, with validation flags recomputed.
    pub grid: Grid,
    /// Scenario the card was resolved under.
    pub scenario: Scenario,
    /// Cell the card landed on or was consumed into.
    pub index: usize,
    /// Cells that became validated by this placement.
    pub validated_indices: SmallVec<[usize; 2]>,
}

/// Classify a card against a grid.
#[must_use]
pub fn classify(card: &Card, grid: &Grid) -> Scenario {
    let target = card.target_index();
    match grid.get(target) {
        None => Scenario::Empty,
        Some(placed) if !placed.face_up => Scenario::Empty,
        Some(_) if is_cell_validated(grid, target) => Scenario::StackAnywhere,
        Some(_) => Scenario::Duplicate,
    }
}

/// Apply a card to a grid under an explicit scenario.
///
/// Fails with `InvalidScenario` if `scenario` does not match what
/// [`classify`] reports or a required argument is missing.
pub fn apply(
    card: Card,
    grid: &Grid,
    scenario: Scenario,
    args: &PlacementArgs,
) -> EngineResult<Placement> {
    if classify(&card, grid) != scenario {
        return Err(EngineError::InvalidScenario {
            scenario,
            reason: "does not match the target cell",
        });
    }

    let mut next = grid.clone();
    let target = card.target_index();

    let index = match scenario {
        Scenario::Empty => {
            let placed = match next.take(target) {
                None => PlacedCard::face_up(card),
                Some(face_down) => face_down.covered_by(card),
            };
            next.set(target, placed);
            target
        }
        Scenario::Duplicate => {
            let choice = args.choice.ok_or(EngineError::InvalidScenario {
                scenario,
                reason: "missing duplicate choice",
            })?;
            let existing = next.take(target).ok_or(EngineError::InvalidScenario {
                scenario,
                reason: "target cell is empty",
            })?;
            let placed = match choice {
                DuplicateChoice::KeepNew => existing.covered_by(card),
                DuplicateChoice::KeepExisting => existing.absorbing(card),
            };
            next.set(target, placed);
            target
        }
        Scenario::StackAnywhere => {
            let chosen = args.chosen_index.ok_or(EngineError::InvalidScenario {
                scenario,
                reason: "missing chosen index",
            })?;
            let chosen = Grid::check_index(chosen)?;
            if !next.is_empty_at(chosen) {
                return Err(EngineError::PositionOccupied { index: chosen });
            }
            next.set(chosen, PlacedCard::face_down(card));
            chosen
        }
    };

    let validated_indices = recompute_validation(&mut next).into_iter().collect();

    Ok(Placement {
        grid: next,
        scenario,
        index,
        validated_indices,
    })
}

/// Classify and apply in one step.
pub fn resolve(card: Card, grid: &Grid, args: &PlacementArgs) -> EngineResult<Placement> {
    apply(card, grid, classify(&card, grid), args)
}

//! Personal grids, the placement resolver, and scoring.
//!
//! ## Key Types
//!
//! - `Grid`: 3×3 board of `PlacedCard` cells
//! - `Scenario`: How a card lands on a grid (empty, duplicate, stack anywhere)
//! - `Placement`: Result of resolving one card against a grid
//!
//! Validation is always derived from the grid via `recompute_validation`;
//! scoring never trusts the cached flags.

pub mod board;
pub mod placement;
pub mod scoring;

pub use board::{Grid, GRID_SIZE, GRID_WIDTH};
pub use placement::{apply, classify, resolve, DuplicateChoice, Placement, PlacementArgs, Scenario};
pub use scoring::{
    color_zone_bonus, color_zones, is_cell_validated, recompute_validation, score_breakdown,
    score_round, validation_mask, ColorZone, ScoreBreakdown,
};

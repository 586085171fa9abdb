//! # grid-draft
//!
//! Rules engine for a two-player card drafting and grid placement game.
//!
//! Two players draft from a shared pool of four revealed cards in snake
//! order, place each card on a personal 3×3 grid under positional rules,
//! and score validated cells and color zones over three rounds.
//!
//! ## Design Principles
//!
//! 1. **Pure state machine**: No I/O. Commands go in, events come out.
//!
//! 2. **Atomic commands**: Each command runs on a clone of the match and is
//!    committed only on success. A rejected command changes nothing.
//!
//! 3. **Injected dependencies**: Callers supply the match store and the
//!    random source. Same seed, same commands, same events.
//!
//! ## Modules
//!
//! - `core`: Players, match state, RNG, configuration, errors
//! - `cards`: The 70-card catalog and placed-card state
//! - `deck`: Shuffling, dealing, recycling
//! - `draft`: Four-card snake draft
//! - `grid`: Grid, placement resolver, validation and scoring
//! - `rules`: Round/game state machine
//! - `controller`: Commands, events, match store, controller service

pub mod core;
pub mod cards;
pub mod deck;
pub mod draft;
pub mod grid;
pub mod rules;
pub mod controller;

// Re-export commonly used types
pub use crate::core::{
    EngineConfig, EngineError, EngineResult, ScoringRules, TieBreak,
    GameRng, GameRngState,
    PlayerId, PlayerMap,
    GameResult, Lifecycle, Match, MatchId, PickRecord, PlayerBoard,
};

pub use crate::cards::{Card, CardId, Color, PlacedCard, CATALOG, CATALOG_SIZE};

pub use crate::deck::Deck;

pub use crate::draft::{DraftPhase, DraftState};

pub use crate::grid::{
    DuplicateChoice, Grid, Placement, PlacementArgs, Scenario,
    score_round, recompute_validation,
};

pub use crate::rules::Rules;

pub use crate::controller::{
    AbortReason, Command, GameEvent,
    InMemoryMatchStore, MatchController, MatchStore,
};

//! Core engine types: players, match state, RNG, configuration, errors.
//!
//! These are shared by every other module. Callers configure the engine
//! via `EngineConfig` and never touch match internals directly.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{EngineConfig, ScoringRules, TieBreak};
pub use error::{CardLocation, EngineError, EngineResult};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use state::{GameResult, Lifecycle, Match, MatchId, PickRecord, PlayerBoard};

//! Engine error type.
//!
//! Every error is detected before any state is touched, so a rejected
//! command leaves the match exactly as it was.

use thiserror::Error;

use super::player::PlayerId;
use super::state::{Lifecycle, MatchId};
use crate::cards::CardId;
use crate::grid::Scenario;

/// Collection a card id was looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardLocation {
    /// The four cards revealed for the current turn.
    RevealedPool,
    /// A player's drafted-but-unplaced cards.
    Hand(PlayerId),
}

impl std::fmt::Display for CardLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardLocation::RevealedPool => write!(f, "revealed pool"),
            CardLocation::Hand(player) => write!(f, "hand of {player}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{player} does not hold the current turn")]
    TurnViolation {
        player: PlayerId,
        expected: Option<PlayerId>,
    },

    #[error("{card} not found in {location}")]
    CardNotFound { card: CardId, location: CardLocation },

    #[error("cell {index} is not empty")]
    PositionOccupied { index: usize },

    #[error("cannot deal {requested} cards, {remaining} remaining")]
    InsufficientCards { requested: usize, remaining: usize },

    #[error("invalid placement for {scenario:?}: {reason}")]
    InvalidScenario {
        scenario: Scenario,
        reason: &'static str,
    },

    #[error("cell index {0} is outside the grid")]
    IndexOutOfRange(usize),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("match {0} already exists")]
    MatchExists(MatchId),

    #[error("match already has two players")]
    MatchFull,

    #[error("command not accepted while match is {0:?}")]
    InvalidLifecycle(Lifecycle),

    #[error("a turn is still in progress")]
    TurnInProgress,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot codec: {0}")]
    Snapshot(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

//! Events emitted by a match.
//!
//! Every successful command returns the events it produced, in order.
//! Failed commands produce no events.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{PlayerId, PlayerMap};
use crate::draft::REVEAL_SIZE;
use crate::grid::{Grid, Scenario};

/// Why a match stopped early.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AbortReason {
    PlayerDisconnected { player: PlayerId },
    /// Removed from the store before finishing.
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum GameEvent {
    PlayerJoined {
        player_index: PlayerId,
        /// Both seats are now taken.
        match_started: bool,
    },

    TurnStarted {
        round: u8,
        turn: u32,
        revealed_cards: Vec<Card>,
        pick_order: [PlayerId; REVEAL_SIZE],
    },

    /// A card was drafted into a hand.
    CardPicked { player_index: PlayerId, card: Card },

    CardPickedAndPlaced {
        player_index: PlayerId,
        card: Card,
        scenario: Scenario,
        index: usize,
        grid: Grid,
        validated_indices: Vec<usize>,
    },

    /// A card from a hand was placed.
    CardPlaced {
        player_index: PlayerId,
        card: Card,
        scenario: Scenario,
        index: usize,
        grid: Grid,
        validated_indices: Vec<usize>,
    },

    RoundComplete {
        round_number: u8,
        /// Score earned this round.
        scores: PlayerMap<i32>,
        /// Cumulative totals after this round.
        totals: PlayerMap<i32>,
        /// `None` after the final round.
        next_round: Option<u8>,
    },

    GameComplete {
        final_scores: PlayerMap<i32>,
        /// `None` on a draw.
        winner: Option<PlayerId>,
    },

    MatchAborted { reason: AbortReason },
}

impl GameEvent {
    /// Wire name of the event.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "player-joined",
            GameEvent::TurnStarted { .. } => "turn-started",
            GameEvent::CardPicked { .. } => "card-picked",
            GameEvent::CardPickedAndPlaced { .. } => "card-picked-and-placed",
            GameEvent::CardPlaced { .. } => "card-placed",
            GameEvent::RoundComplete { .. } => "round-complete",
            GameEvent::GameComplete { .. } => "game-complete",
            GameEvent::MatchAborted { .. } => "match-aborted",
        }
    }
}

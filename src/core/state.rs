//! Match state.
//!
//! ## Match
//!
//! Everything one match needs, in one value:
//! - Lifecycle, round and turn counters, the player holding the turn
//! - Per-player grids and cumulative scores
//! - Shared deck and current draft
//! - Pick history and the match's own RNG stream
//!
//! Collections are `im` persistent structures, so cloning a match for a
//! check-then-commit command is cheap.
//!
//! ## Snapshots
//!
//! `Match::to_bytes` / `Match::from_bytes` encode the full state with
//! bincode, RNG position included, so a restored match continues exactly
//! where it left off.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::{EngineError, EngineResult};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{CardId, CATALOG_SIZE};
use crate::deck::Deck;
use crate::draft::DraftState;
use crate::grid::Grid;

/// Match identifier, unique within a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Match lifecycle.
///
/// `RoundEnd` only exists while a round is being scored inside a single
/// command; callers never observe it between commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
    Waiting,
    Drafting,
    RoundEnd,
    GameEnd,
    Aborted,
}

impl Lifecycle {
    /// No further play is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Lifecycle::GameEnd | Lifecycle::Aborted)
    }
}

/// Final outcome of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameResult {
    Winner(PlayerId),
    Draw,
}

impl GameResult {
    #[must_use]
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            GameResult::Winner(player) => Some(player),
            GameResult::Draw => None,
        }
    }
}

/// One player's side of the table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBoard {
    pub grid: Grid,

    /// Running total after each completed round.
    pub cumulative_scores: SmallVec<[i32; 3]>,
}

impl PlayerBoard {
    /// Total after the most recent round.
    #[must_use]
    pub fn total(&self) -> i32 {
        self.cumulative_scores.last().copied().unwrap_or(0)
    }

    /// Score earned in a single round (1-based), if that round is complete.
    #[must_use]
    pub fn round_score(&self, round: u8) -> Option<i32> {
        let index = usize::from(round).checked_sub(1)?;
        let total = *self.cumulative_scores.get(index)?;
        let before = index
            .checked_sub(1)
            .and_then(|i| self.cumulative_scores.get(i).copied())
            .unwrap_or(0);
        Some(total - before)
    }

    /// Append a round score to the running totals.
    pub fn record_round(&mut self, score: i32) {
        let total = self.total() + score;
        self.cumulative_scores.push(total);
    }
}

/// One drafted card in the match history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    pub player: PlayerId,
    pub card: CardId,
    pub round: u8,
    pub turn: u32,
    /// Position in the match-wide history.
    pub sequence: u32,
    /// Cell the card was resolved at, once placed.
    pub placed_at: Option<usize>,
}

/// Complete state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,

    pub players: PlayerMap<PlayerBoard>,

    /// Seats taken so far (0-2).
    pub bound_players: u8,

    /// Current round, 1-based.
    pub current_round: u8,

    /// Holder of the current pick, or the opener of the next turn.
    pub current_player: PlayerId,

    pub deck: Deck,

    /// `None` until the first turn of a round is dealt.
    pub draft: Option<DraftState>,

    pub lifecycle: Lifecycle,

    /// Turns dealt in the current round.
    pub turn_number: u32,

    pub history: Vector<PickRecord>,

    pub result: Option<GameResult>,

    pub rng: GameRng,
}

impl Match {
    /// Create a match waiting for players, with a freshly shuffled deck.
    #[must_use]
    pub fn new(id: MatchId, mut rng: GameRng) -> Self {
        let deck = Deck::shuffled(&mut rng);
        Self {
            id,
            players: PlayerMap::with_default(),
            bound_players: 0,
            current_round: 1,
            current_player: PlayerId::new(0),
            deck,
            draft: None,
            lifecycle: Lifecycle::Waiting,
            turn_number: 0,
            history: Vector::new(),
            result: None,
            rng,
        }
    }

    /// Grid of a player.
    #[must_use]
    pub fn grid(&self, player: PlayerId) -> &Grid {
        &self.players[player].grid
    }

    /// Cumulative totals of both players.
    #[must_use]
    pub fn totals(&self) -> PlayerMap<i32> {
        self.players.map(|_, board| board.total())
    }

    /// Is a turn dealt with picks still outstanding?
    #[must_use]
    pub fn turn_open(&self) -> bool {
        self.draft.as_ref().is_some_and(|d| d.current_picker().is_some())
    }

    /// Count every card the match holds: deck remainder, revealed pool,
    /// hands, and grids (covered cards included).
    ///
    /// Always equals [`CATALOG_SIZE`] for a consistent match.
    #[must_use]
    pub fn cards_in_play(&self) -> usize {
        let drafted = self.draft.as_ref().map_or(0, |d| d.outstanding_cards().count());
        let on_grids: usize = self.players.iter().map(|(_, b)| b.grid.card_count()).sum();
        self.deck.remaining() + drafted + on_grids
    }

    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.cards_in_play() == CATALOG_SIZE
    }

    /// Record a drafted card. Returns its sequence number.
    pub fn record_pick(&mut self, player: PlayerId, card: CardId, placed_at: Option<usize>) -> u32 {
        let sequence = self.history.len() as u32;
        self.history.push_back(PickRecord {
            player,
            card,
            round: self.current_round,
            turn: self.turn_number,
            sequence,
            placed_at,
        });
        sequence
    }

    /// Mark the most recent unplaced pick of `card` as placed.
    pub fn record_placement(&mut self, card: CardId, index: usize) {
        let position = self
            .history
            .iter()
            .enumerate()
            .filter(|(_, r)| r.card == card && r.placed_at.is_none())
            .map(|(i, _)| i)
            .last();
        if let Some(position) = position {
            if let Some(record) = self.history.get_mut(position) {
                record.placed_at = Some(index);
            }
        }
    }

    /// Encode the full match with bincode.
    pub fn to_bytes(&self) -> EngineResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Decode a match produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_new_match() {
        let m = Match::new(MatchId(1), GameRng::new(5));

        assert_eq!(m.lifecycle, Lifecycle::Waiting);
        assert_eq!(m.current_round, 1);
        assert_eq!(m.bound_players, 0);
        assert_eq!(m.deck.remaining(), CATALOG_SIZE);
        assert!(m.draft.is_none());
        assert!(m.is_conserved());
        assert!(!m.turn_open());
    }

    #[test]
    fn test_lifecycle_terminal() {
        assert!(Lifecycle::GameEnd.is_terminal());
        assert!(Lifecycle::Aborted.is_terminal());
        assert!(!Lifecycle::Drafting.is_terminal());
        assert!(!Lifecycle::Waiting.is_terminal());
    }

    #[test]
    fn test_board_scores() {
        let mut board = PlayerBoard::default();
        assert_eq!(board.total(), 0);
        assert_eq!(board.round_score(1), None);

        board.record_round(10);
        board.record_round(4);
        board.record_round(0);

        assert_eq!(board.cumulative_scores.as_slice(), &[10, 14, 14]);
        assert_eq!(board.total(), 14);
        assert_eq!(board.round_score(1), Some(10));
        assert_eq!(board.round_score(2), Some(4));
        assert_eq!(board.round_score(3), Some(0));
        assert_eq!(board.round_score(0), None);
    }

    #[test]
    fn test_history_records() {
        let mut m = Match::new(MatchId(2), GameRng::new(5));
        let card = CardId::new(9);

        assert_eq!(m.record_pick(PlayerId::new(0), card, None), 0);
        assert_eq!(m.record_pick(PlayerId::new(1), CardId::new(3), Some(2)), 1);
        m.record_placement(card, 1);

        assert_eq!(m.history[0].placed_at, Some(1));
        assert_eq!(m.history[1].placed_at, Some(2));
    }

    #[test]
    fn test_snapshot_roundtrip_continues_rng() {
        let mut m = Match::new(MatchId(3), GameRng::new(77));
        m.bound_players = 2;
        m.record_pick(PlayerId::new(1), CardId::new(4), Some(3));

        let bytes = m.to_bytes().unwrap();
        let mut restored = Match::from_bytes(&bytes).unwrap();

        assert_eq!(restored.id, m.id);
        assert_eq!(restored.deck, m.deck);
        assert_eq!(restored.history, m.history);
        assert_eq!(restored.bound_players, 2);
        assert_eq!(restored.rng.next_u64(), m.rng.next_u64());
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        let err = Match::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, EngineError::Snapshot(_)));
    }

    #[test]
    fn test_match_id_display() {
        assert_eq!(MatchId(42).to_string(), "42");
    }
}

//! Draft coordinator: the four-card snake pick.
//!
//! Each turn reveals four cards from the deck. The opener picks first, the
//! opponent picks twice, and the opener takes the last card: `[A, B, B, A]`.
//! Picked cards go into the picker's hand; hands carry over between turns
//! of a round and are recycled with everything else at round end.
//!
//! `DraftState` is a value type. Every operation returns a new state and
//! leaves `self` untouched, so a failed command can simply drop the result.
//!
//! ```
//! use grid_draft::core::{GameRng, PlayerId};
//! use grid_draft::deck::Deck;
//! use grid_draft::draft::{DraftPhase, DraftState};
//!
//! let deck = Deck::shuffled(&mut GameRng::new(1));
//! let (draft, _deck) = DraftState::start_turn(&deck, PlayerId::new(0)).unwrap();
//!
//! let first = draft.revealed_cards[0].id;
//! let (_card, draft) = draft.pick(PlayerId::new(0), first).unwrap();
//! assert_eq!(draft.current_picker(), Some(PlayerId::new(1)));
//! assert_eq!(draft.phase, DraftPhase::Pick);
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, CardId};
use crate::core::{CardLocation, EngineError, EngineResult, PlayerId, PlayerMap};
use crate::deck::Deck;

/// Cards revealed per turn.
pub const REVEAL_SIZE: usize = 4;

/// Where the current turn stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftPhase {
    /// Between turns: no cards revealed.
    Reveal,
    /// Cards revealed, picks outstanding.
    Pick,
    /// All four picks made.
    Complete,
}

/// Pick order for a turn opened by `opener`.
#[must_use]
pub fn snake_order(opener: PlayerId) -> [PlayerId; REVEAL_SIZE] {
    let other = opener.opponent();
    [opener, other, other, opener]
}

/// Draft state for the current turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftState {
    pub phase: DraftPhase,

    /// Cards still available this turn.
    pub revealed_cards: Vector<Card>,

    /// Drafted cards not yet placed.
    pub player_hands: PlayerMap<Vector<Card>>,

    pub pick_order: [PlayerId; REVEAL_SIZE],

    /// Index into `pick_order` of the next pick.
    pub current_pick_index: usize,

    /// Deck cursor right after this turn's deal.
    pub deck_cursor: usize,

    /// Picks made this turn, in order.
    pub completed_picks: SmallVec<[(PlayerId, CardId); REVEAL_SIZE]>,
}

impl Default for DraftState {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftState {
    /// An empty draft between turns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: DraftPhase::Reveal,
            revealed_cards: Vector::new(),
            player_hands: PlayerMap::with_default(),
            pick_order: snake_order(PlayerId::new(0)),
            current_pick_index: 0,
            deck_cursor: 0,
            completed_picks: SmallVec::new(),
        }
    }

    /// Deal the first turn of a round with empty hands.
    pub fn start_turn(deck: &Deck, opener: PlayerId) -> EngineResult<(DraftState, Deck)> {
        Self::new().deal(deck, opener)
    }

    /// Deal a new turn, keeping the current hands.
    ///
    /// Fails with `TurnInProgress` while picks are still outstanding and
    /// with `InsufficientCards` if the deck cannot cover a full reveal.
    pub fn deal(&self, deck: &Deck, opener: PlayerId) -> EngineResult<(DraftState, Deck)> {
        if self.phase == DraftPhase::Pick {
            return Err(EngineError::TurnInProgress);
        }

        let (cards, deck) = deck.deal_next(REVEAL_SIZE)?;
        let next = DraftState {
            phase: DraftPhase::Pick,
            revealed_cards: cards.into_iter().collect(),
            player_hands: self.player_hands.clone(),
            pick_order: snake_order(opener),
            current_pick_index: 0,
            deck_cursor: deck.cursor(),
            completed_picks: SmallVec::new(),
        };
        Ok((next, deck))
    }

    /// Move one revealed card into `player`'s hand.
    pub fn pick(&self, player: PlayerId, card_id: CardId) -> EngineResult<(Card, DraftState)> {
        let expected = self.current_picker();
        if expected != Some(player) {
            return Err(EngineError::TurnViolation { player, expected });
        }

        let position = self
            .revealed_cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(EngineError::CardNotFound {
                card: card_id,
                location: CardLocation::RevealedPool,
            })?;

        let mut next = self.clone();
        let card = next.revealed_cards.remove(position);
        next.player_hands[player].push_back(card);
        next.completed_picks.push((player, card_id));
        next.current_pick_index += 1;
        if next.current_pick_index == REVEAL_SIZE {
            next.phase = DraftPhase::Complete;
        }

        Ok((card, next))
    }

    /// Remove a drafted card from `player`'s hand for placement.
    pub fn take_from_hand(&self, player: PlayerId, card_id: CardId) -> EngineResult<(Card, DraftState)> {
        let hand = &self.player_hands[player];
        let position = hand
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(EngineError::CardNotFound {
                card: card_id,
                location: CardLocation::Hand(player),
            })?;

        let mut next = self.clone();
        let card = next.player_hands[player].remove(position);
        Ok((card, next))
    }

    /// Return to the between-turns state, keeping hands.
    pub fn carry_hands(&self) -> EngineResult<DraftState> {
        if self.phase == DraftPhase::Pick {
            return Err(EngineError::TurnInProgress);
        }
        Ok(DraftState {
            phase: DraftPhase::Reveal,
            revealed_cards: Vector::new(),
            player_hands: self.player_hands.clone(),
            pick_order: self.pick_order,
            current_pick_index: 0,
            deck_cursor: self.deck_cursor,
            completed_picks: SmallVec::new(),
        })
    }

    /// Player holding the next pick, if any.
    #[must_use]
    pub fn current_picker(&self) -> Option<PlayerId> {
        match self.phase {
            DraftPhase::Pick => self.pick_order.get(self.current_pick_index).copied(),
            DraftPhase::Reveal | DraftPhase::Complete => None,
        }
    }

    /// Player who made the most recent pick this turn.
    #[must_use]
    pub fn last_picker(&self) -> Option<PlayerId> {
        self.completed_picks.last().map(|&(player, _)| player)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == DraftPhase::Complete
    }

    /// Cards in a player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Vector<Card> {
        &self.player_hands[player]
    }

    /// Every card held by the draft: revealed pool and both hands.
    pub fn outstanding_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.revealed_cards
            .iter()
            .chain(self.player_hands.iter().flat_map(|(_, hand)| hand.iter()))
            .copied()
    }
}

//! Deck manager: shuffling, dealing, and recycling.
//!
//! A `Deck` is a persistent vector of cards plus a monotonic cursor. Dealing
//! returns the next slice and an advanced deck, so a slice is never dealt
//! twice within a round. At round end the undealt remainder and every used
//! card are shuffled back together and the cursor resets.
//!
//! ```
//! use grid_draft::core::GameRng;
//! use grid_draft::deck::Deck;
//!
//! let mut rng = GameRng::new(42);
//! let deck = Deck::shuffled(&mut rng);
//! let (cards, deck) = deck.deal_next(4).unwrap();
//! assert_eq!(cards.len(), 4);
//! assert_eq!(deck.remaining(), 66);
//! ```

use im::Vector;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{Card, CATALOG};
use crate::core::{EngineError, EngineResult};

/// Shuffled cards with a deal cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
    cursor: usize,
}

impl Deck {
    /// A uniformly shuffled copy of the full catalog.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_shuffled(CATALOG.iter().copied(), rng)
    }

    /// A deck in the exact order given, cursor at zero.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            cursor: 0,
        }
    }

    fn from_shuffled<R: Rng + ?Sized>(cards: impl IntoIterator<Item = Card>, rng: &mut R) -> Self {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        cards.shuffle(rng);
        Self::from_cards(cards)
    }

    /// Cards not yet dealt.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    /// Position of the next card to deal.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Iterate over undealt cards in deal order.
    pub fn undealt(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().skip(self.cursor)
    }

    /// Deal the next `n` cards.
    ///
    /// Returns the dealt cards and the advanced deck; `self` is unchanged.
    pub fn deal_next(&self, n: usize) -> EngineResult<(Vec<Card>, Deck)> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(EngineError::InsufficientCards {
                requested: n,
                remaining,
            });
        }

        let dealt: Vec<Card> = self.undealt().take(n).copied().collect();
        let next = Deck {
            cards: self.cards.clone(),
            cursor: self.cursor + n,
        };
        Ok((dealt, next))
    }

    /// Shuffle the undealt remainder together with `used` into a fresh deck.
    #[must_use]
    pub fn recycle<R: Rng + ?Sized>(&self, used: impl IntoIterator<Item = Card>, rng: &mut R) -> Deck {
        let pool: Vec<Card> = self.undealt().copied().chain(used).collect();
        debug!(
            remaining = self.remaining(),
            recycled = pool.len() - self.remaining(),
            total = pool.len(),
            "Recycling deck"
        );
        Self::from_shuffled(pool, rng)
    }
}

//! Placed cards - runtime state of a card sitting on a grid cell.
//!
//! A `PlacedCard` tracks whether the top card is face up, whether it is
//! currently validated, and which cards were consumed underneath it.
//! Covered cards are never playable again but stay on the grid until the
//! round's recycle, so they still count toward the 70-card total.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::Card;

/// A card on a grid cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedCard {
    /// The visible (top) card.
    pub card: Card,

    /// Face-down cards score nothing and never join color zones.
    pub face_up: bool,

    /// Cached validation flag. Scoring recomputes it from the grid and
    /// never reads this field.
    pub validated: bool,

    /// Cards consumed underneath the top card, oldest first.
    pub covered: SmallVec<[Card; 2]>,
}

impl PlacedCard {
    /// A card placed face up with nothing beneath it.
    #[must_use]
    pub fn face_up(card: Card) -> Self {
        Self {
            card,
            face_up: true,
            validated: false,
            covered: SmallVec::new(),
        }
    }

    /// A card placed face down with nothing beneath it.
    #[must_use]
    pub fn face_down(card: Card) -> Self {
        Self {
            card,
            face_up: false,
            validated: false,
            covered: SmallVec::new(),
        }
    }

    /// Put `card` face up on top of `self`, consuming this cell's whole stack.
    #[must_use]
    pub fn covered_by(self, card: Card) -> Self {
        let mut covered = self.covered;
        covered.push(self.card);
        Self {
            card,
            face_up: true,
            validated: false,
            covered,
        }
    }

    /// Slide `card` underneath the top card.
    #[must_use]
    pub fn absorbing(mut self, card: Card) -> Self {
        self.covered.push(card);
        self
    }

    /// Does the top card confirm at least one consumed card?
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        !self.covered.is_empty()
    }

    /// Number of physical cards on this cell.
    #[must_use]
    pub fn card_count(&self) -> usize {
        1 + self.covered.len()
    }

    /// Every physical card on this cell, top card first.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        std::iter::once(self.card).chain(self.covered.iter().copied())
    }
}

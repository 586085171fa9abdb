//! Card definitions - immutable card data.
//!
//! A `Card` is a plain `Copy` value: identity is `id`, and the remaining
//! fields never change during a match. Placement state (face-up, validated)
//! lives in [`PlacedCard`](super::PlacedCard).

use serde::{Deserialize, Serialize};

/// Unique identifier of one of the catalog cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card color. `Multi` is a wildcard for color zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Multi,
    Green,
    Blue,
    Red,
    Yellow,
}

impl Color {
    /// Every color, wildcard first.
    pub const ALL: [Color; 5] = [
        Color::Multi,
        Color::Green,
        Color::Blue,
        Color::Red,
        Color::Yellow,
    ];

    /// Check if this is the wildcard color.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self, Color::Multi)
    }

    /// Can a card of this color share a zone with a card of `other`?
    #[must_use]
    pub fn joins(self, other: Color) -> bool {
        self == other || self.is_wildcard() || other.is_wildcard()
    }
}

/// Static card data.
///
/// ## Example
///
/// ```
/// use grid_draft::cards::{Card, Color};
///
/// let card = Card::new(5, 5, Color::Red, 0, false);
/// assert_eq!(card.target_index(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,

    /// Face value, 1 through 9.
    pub value: u8,

    /// Color for zone scoring.
    pub color: Color,

    /// Added to the round score while the card is face up.
    pub scoring_modifier: i8,

    /// Marks the catalog's special cards.
    pub special: bool,
}

impl Card {
    /// Create a card definition.
    #[must_use]
    pub const fn new(id: u8, value: u8, color: Color, scoring_modifier: i8, special: bool) -> Self {
        Self {
            id: CardId(id),
            value,
            color,
            scoring_modifier,
            special,
        }
    }

    /// Grid cell this card validates: `value - 1`.
    #[must_use]
    pub const fn target_index(&self) -> usize {
        self.value as usize - 1
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} {:?}]", self.id, self.value, self.color)
    }
}

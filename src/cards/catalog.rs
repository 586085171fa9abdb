//! The fixed card catalog.
//!
//! Seventy cards, ids 1 through 70, ordered by value. The table is authored
//! for this crate and is not a reproduction of a published card list.
//! Seeded match traces in the tests depend on it; re-record them after edits.
//!
//! | value | cards |
//! |---|---|
//! | 1-4, 6-9 | 8 each |
//! | 5 | 6 |

use super::definition::{Card, CardId, Color::*};

/// Number of cards in the catalog.
pub const CATALOG_SIZE: usize = 70;

/// Every card in the game.
pub static CATALOG: [Card; CATALOG_SIZE] = [
    Card::new(1, 1, Blue, 0, false),
    Card::new(2, 1, Red, 0, false),
    Card::new(3, 1, Yellow, 0, false),
    Card::new(4, 1, Green, 0, false),
    Card::new(5, 1, Blue, 0, false),
    Card::new(6, 1, Red, 0, false),
    Card::new(7, 1, Yellow, 2, true),
    Card::new(8, 1, Multi, -1, false),
    Card::new(9, 2, Red, 0, false),
    Card::new(10, 2, Yellow, 0, false),
    Card::new(11, 2, Green, 0, false),
    Card::new(12, 2, Blue, 0, false),
    Card::new(13, 2, Red, 0, false),
    Card::new(14, 2, Yellow, 0, false),
    Card::new(15, 2, Green, 2, true),
    Card::new(16, 2, Blue, 0, false),
    Card::new(17, 3, Yellow, 0, false),
    Card::new(18, 3, Green, 0, false),
    Card::new(19, 3, Blue, 0, false),
    Card::new(20, 3, Red, 0, false),
    Card::new(21, 3, Yellow, 0, false),
    Card::new(22, 3, Green, 0, false),
    Card::new(23, 3, Blue, 2, true),
    Card::new(24, 3, Multi, -1, false),
    Card::new(25, 4, Green, 0, false),
    Card::new(26, 4, Blue, 0, false),
    Card::new(27, 4, Red, 0, false),
    Card::new(28, 4, Yellow, 0, false),
    Card::new(29, 4, Green, 0, false),
    Card::new(30, 4, Blue, 0, false),
    Card::new(31, 4, Red, 1, true),
    Card::new(32, 4, Yellow, 0, false),
    Card::new(33, 5, Blue, 0, false),
    Card::new(34, 5, Red, 0, false),
    Card::new(35, 5, Yellow, 0, false),
    Card::new(36, 5, Green, 0, false),
    Card::new(37, 5, Blue, 1, true),
    Card::new(38, 5, Multi, -1, false),
    Card::new(39, 6, Red, 0, false),
    Card::new(40, 6, Yellow, 0, false),
    Card::new(41, 6, Green, 0, false),
    Card::new(42, 6, Blue, 0, false),
    Card::new(43, 6, Red, 0, false),
    Card::new(44, 6, Yellow, 0, false),
    Card::new(45, 6, Green, 1, true),
    Card::new(46, 6, Blue, 0, false),
    Card::new(47, 7, Yellow, 0, false),
    Card::new(48, 7, Green, 0, false),
    Card::new(49, 7, Blue, 0, false),
    Card::new(50, 7, Red, 0, false),
    Card::new(51, 7, Yellow, 0, false),
    Card::new(52, 7, Green, 0, false),
    Card::new(53, 7, Blue, -2, true),
    Card::new(54, 7, Multi, -1, false),
    Card::new(55, 8, Green, 0, false),
    Card::new(56, 8, Blue, 0, false),
    Card::new(57, 8, Red, 0, false),
    Card::new(58, 8, Yellow, 0, false),
    Card::new(59, 8, Green, 0, false),
    Card::new(60, 8, Blue, 0, false),
    Card::new(61, 8, Red, -2, true),
    Card::new(62, 8, Yellow, 0, false),
    Card::new(63, 9, Blue, 0, false),
    Card::new(64, 9, Red, 0, false),
    Card::new(65, 9, Yellow, 0, false),
    Card::new(66, 9, Green, 0, false),
    Card::new(67, 9, Blue, 0, false),
    Card::new(68, 9, Red, 0, false),
    Card::new(69, 9, Yellow, -2, true),
    Card::new(70, 9, Multi, -1, false),
];

/// Look up a catalog card by id.
#[must_use]
pub fn card(id: CardId) -> Option<Card> {
    let index = (id.raw() as usize).checked_sub(1)?;
    CATALOG.get(index).copied()
}

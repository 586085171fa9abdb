//! Card system: definitions, the fixed catalog, and placed-card state.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for catalog cards
//! - `Card`: Static card data (value, color, modifier)
//! - `PlacedCard`: Card on a grid cell (face-up, validated, covered stack)
//! - `CATALOG`: The 70 cards every deck is built from

pub mod catalog;
pub mod definition;
pub mod placed;

pub use catalog::{CATALOG, CATALOG_SIZE};
pub use definition::{Card, CardId, Color};
pub use placed::PlacedCard;

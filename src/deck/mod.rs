//! Deck manager.

pub mod manager;

pub use manager::Deck;

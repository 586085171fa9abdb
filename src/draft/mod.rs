//! Draft coordinator.

pub mod coordinator;

pub use coordinator::{snake_order, DraftPhase, DraftState, REVEAL_SIZE};

//! Round and game controller: the match state machine.
//!
//! `Rules` turns commands into events against a single `Match`. It never
//! touches a store or a lock; `controller::MatchController` does that.

pub mod engine;

pub use engine::{check_round_end, Rules};

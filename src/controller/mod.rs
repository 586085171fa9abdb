//! Command/event interface and match storage.
//!
//! ## Key Types
//!
//! - `Command`: Everything a caller can ask a match to do
//! - `GameEvent`: Everything a match reports back
//! - `MatchStore`: Injected storage, one lock per match
//! - `MatchController`: Creates matches and routes commands to them

pub mod command;
pub mod event;
pub mod service;
pub mod store;

pub use command::Command;
pub use event::{AbortReason, GameEvent};
pub use service::MatchController;
pub use store::{InMemoryMatchStore, MatchStore, SharedMatch};

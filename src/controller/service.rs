//! Match controller: the engine's public entry point.
//!
//! The controller owns the rules, an injected store, and the root RNG.
//! Every command locks exactly one match, runs through [`Rules::apply`],
//! and returns the resulting events to the caller. Nothing is retried and
//! nothing waits: an out-of-turn command fails at once.
//!
//! ```
//! use grid_draft::controller::MatchController;
//! use grid_draft::core::{EngineConfig, GameRng};
//!
//! let controller = MatchController::in_memory(GameRng::new(7), EngineConfig::default()).unwrap();
//! let id = controller.create_match();
//! controller.join(id).unwrap();
//! controller.join(id).unwrap();
//!
//! let events = controller.start_turn(id).unwrap();
//! assert_eq!(events[0].kind(), "turn-started");
//! ```

use parking_lot::Mutex;
use rand::RngCore;
use tracing::{debug, info, warn};

use super::command::Command;
use super::event::{AbortReason, GameEvent};
use super::store::{InMemoryMatchStore, MatchStore, SharedMatch};
use crate::cards::CardId;
use crate::core::{
    EngineConfig, EngineError, EngineResult, GameRng, Lifecycle, Match, MatchId, PlayerId,
};
use crate::grid::{DuplicateChoice, PlacementArgs};
use crate::rules::Rules;

/// Injected random source shared by every match a controller creates.
type SharedSource = Mutex<Box<dyn RngCore + Send>>;

pub struct MatchController<S: MatchStore = InMemoryMatchStore> {
    store: S,
    rules: Rules,
    rng: SharedSource,
}

impl MatchController<InMemoryMatchStore> {
    /// Controller over a fresh in-memory store.
    pub fn in_memory(rng: impl RngCore + Send + 'static, config: EngineConfig) -> EngineResult<Self> {
        Self::new(InMemoryMatchStore::new(), rng, config)
    }
}

impl<S: MatchStore> MatchController<S> {
    /// Create a controller. Each match seeds its own [`GameRng`] from `rng`.
    pub fn new(
        store: S,
        rng: impl RngCore + Send + 'static,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let rules = Rules::new(config)?;
        Ok(Self {
            store,
            rules,
            rng: Mutex::new(Box::new(rng)),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.rules.config()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a match in `Waiting` with a freshly shuffled deck.
    pub fn create_match(&self) -> MatchId {
        let id = self.store.next_id();
        let rng = {
            let mut source = self.rng.lock();
            GameRng::seeded_from(&mut **source)
        };
        self.store.insert(Match::new(id, rng));
        info!(match_id = %id, "Match created");
        id
    }

    fn handle(&self, id: MatchId) -> EngineResult<SharedMatch> {
        self.store.get(id).ok_or(EngineError::MatchNotFound(id))
    }

    /// Run one command against one match.
    pub fn execute(&self, id: MatchId, command: &Command) -> EngineResult<Vec<GameEvent>> {
        let shared = self.handle(id)?;
        let mut guard = shared.lock();

        match self.rules.apply(&mut guard, command) {
            Ok(events) => {
                log_events(id, &events);
                Ok(events)
            }
            Err(err) => {
                debug!(
                    match_id = %id,
                    command = command.name(),
                    lifecycle = ?guard.lifecycle,
                    error = %err,
                    "Command rejected"
                );
                Err(err)
            }
        }
    }

    pub fn join(&self, id: MatchId) -> EngineResult<Vec<GameEvent>> {
        self.execute(id, &Command::Join)
    }

    pub fn start_turn(&self, id: MatchId) -> EngineResult<Vec<GameEvent>> {
        self.execute(id, &Command::StartTurn)
    }

    /// Draft a card and place it at once.
    pub fn pick(
        &self,
        id: MatchId,
        player: PlayerId,
        card_id: CardId,
        args: PlacementArgs,
    ) -> EngineResult<Vec<GameEvent>> {
        self.execute(
            id,
            &Command::Pick {
                player,
                card_id,
                args,
            },
        )
    }

    /// Draft a card into the hand.
    pub fn draft(&self, id: MatchId, player: PlayerId, card_id: CardId) -> EngineResult<Vec<GameEvent>> {
        self.execute(id, &Command::Draft { player, card_id })
    }

    /// Place a card from the hand.
    pub fn place(
        &self,
        id: MatchId,
        player: PlayerId,
        card_id: CardId,
        target_index: usize,
        choice: Option<DuplicateChoice>,
    ) -> EngineResult<Vec<GameEvent>> {
        self.execute(
            id,
            &Command::Place {
                player,
                card_id,
                target_index,
                choice,
            },
        )
    }

    pub fn advance(&self, id: MatchId) -> EngineResult<Vec<GameEvent>> {
        self.execute(id, &Command::Advance)
    }

    pub fn disconnect(&self, id: MatchId, player: PlayerId) -> EngineResult<Vec<GameEvent>> {
        self.execute(id, &Command::Disconnect { player })
    }

    /// A consistent copy of the match.
    pub fn snapshot(&self, id: MatchId) -> EngineResult<Match> {
        Ok(self.handle(id)?.lock().clone())
    }

    /// The match encoded with bincode.
    pub fn snapshot_bytes(&self, id: MatchId) -> EngineResult<Vec<u8>> {
        self.handle(id)?.lock().to_bytes()
    }

    /// Load a match from [`snapshot_bytes`](Self::snapshot_bytes) output.
    ///
    /// Fails with `MatchExists` if a match with the same id is already
    /// stored, including one restored concurrently.
    pub fn restore(&self, bytes: &[u8]) -> EngineResult<MatchId> {
        let m = Match::from_bytes(bytes)?;
        let id = m.id;
        self.store.insert_new(m)?;
        info!(match_id = %id, "Match restored");
        Ok(id)
    }

    /// Remove a match from the store.
    ///
    /// A match that had not finished is aborted first, and the abort event
    /// is returned.
    pub fn close_match(&self, id: MatchId) -> EngineResult<Vec<GameEvent>> {
        let shared = self.store.remove(id).ok_or(EngineError::MatchNotFound(id))?;
        let mut guard = shared.lock();

        if guard.lifecycle.is_terminal() {
            info!(match_id = %id, "Match closed");
            return Ok(Vec::new());
        }

        warn!(match_id = %id, lifecycle = ?guard.lifecycle, "Closing unfinished match");
        guard.lifecycle = Lifecycle::Aborted;
        Ok(vec![GameEvent::MatchAborted {
            reason: AbortReason::Closed,
        }])
    }
}

fn log_events(id: MatchId, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::RoundComplete {
                round_number,
                totals,
                next_round,
                ..
            } => {
                info!(
                    match_id = %id,
                    round = round_number,
                    total_0 = totals[PlayerId::new(0)],
                    total_1 = totals[PlayerId::new(1)],
                    next_round = ?next_round,
                    "Round complete"
                );
            }
            GameEvent::GameComplete { winner, .. } => {
                info!(match_id = %id, winner = ?winner, "Game complete");
            }
            GameEvent::MatchAborted { reason } => {
                warn!(match_id = %id, reason = ?reason, "Match aborted");
            }
            GameEvent::TurnStarted { round, turn, .. } => {
                debug!(match_id = %id, round, turn, "Turn started");
            }
            other => {
                debug!(match_id = %id, event = other.kind(), "Event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_controller() -> MatchController {
        MatchController::in_memory(GameRng::new(5), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = MatchController::in_memory(GameRng::new(1), EngineConfig::default().with_rounds(0));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_match() {
        let controller = new_controller();
        let err = controller.join(MatchId(999)).unwrap_err();
        assert_eq!(err, EngineError::MatchNotFound(MatchId(999)));
    }

    #[test]
    fn test_matches_get_independent_decks() {
        let controller = new_controller();
        let a = controller.create_match();
        let b = controller.create_match();

        let deck_a = controller.snapshot(a).unwrap().deck;
        let deck_b = controller.snapshot(b).unwrap().deck;
        assert_ne!(deck_a, deck_b);
    }

    #[test]
    fn test_snapshot_restore() {
        let controller = new_controller();
        let id = controller.create_match();
        controller.join(id).unwrap();

        let bytes = controller.snapshot_bytes(id).unwrap();
        assert_eq!(controller.restore(&bytes), Err(EngineError::MatchExists(id)));

        let other = new_controller();
        assert_eq!(other.restore(&bytes).unwrap(), id);
        assert_eq!(other.snapshot(id).unwrap().bound_players, 1);
    }

    #[test]
    fn test_close_unfinished_match() {
        let controller = new_controller();
        let id = controller.create_match();

        let events = controller.close_match(id).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::MatchAborted {
                reason: AbortReason::Closed
            }]
        );
        assert_eq!(controller.close_match(id), Err(EngineError::MatchNotFound(id)));
        assert!(controller.store().is_empty());
    }
}

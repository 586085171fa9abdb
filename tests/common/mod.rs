//! Shared helpers for integration tests.

#![allow(dead_code)]

use grid_draft::controller::{GameEvent, MatchController};
use grid_draft::core::{EngineConfig, GameRng, Lifecycle, MatchId, PlayerId};
use grid_draft::grid::{classify, DuplicateChoice, Grid, PlacementArgs, Scenario};
use grid_draft::cards::Card;
use grid_draft::draft::REVEAL_SIZE;
use grid_draft::CATALOG_SIZE;

/// Install a test-friendly subscriber once. Set `RUST_LOG=grid_draft=debug`
/// to see engine logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Controller with one match that has both seats taken.
pub fn started_match(seed: u64, config: EngineConfig) -> (MatchController, MatchId) {
    let controller = MatchController::in_memory(GameRng::new(seed), config).unwrap();
    let id = controller.create_match();
    controller.join(id).unwrap();
    controller.join(id).unwrap();
    (controller, id)
}

/// Arguments that always resolve for `card` on `grid`, as long as the grid
/// has an empty cell.
pub fn placement_args(card: &Card, grid: &Grid) -> PlacementArgs {
    match classify(card, grid) {
        Scenario::Empty => PlacementArgs::default(),
        Scenario::Duplicate => PlacementArgs::keep(DuplicateChoice::KeepNew),
        Scenario::StackAnywhere => {
            let first_empty = grid.empty_cells()[0];
            PlacementArgs::stack_at(first_empty)
        }
    }
}

/// Play a whole match with coupled picks: the picker always takes the first
/// revealed card, new turns are dealt with `start-turn`, and `advance` closes
/// a round once the deck runs dry. Checks card conservation after every
/// command.
pub fn play_to_end(controller: &MatchController, id: MatchId) -> Vec<GameEvent> {
    let mut events = Vec::new();

    for _ in 0..10_000 {
        let m = controller.snapshot(id).unwrap();
        assert_eq!(m.cards_in_play(), CATALOG_SIZE, "cards lost or duplicated");

        if m.lifecycle == Lifecycle::GameEnd {
            return events;
        }

        let picker: Option<PlayerId> = m.draft.as_ref().and_then(|d| d.current_picker());
        match picker {
            Some(player) => {
                let card = m.draft.as_ref().unwrap().revealed_cards[0];
                let args = placement_args(&card, m.grid(player));
                events.extend(controller.pick(id, player, card.id, args).unwrap());
            }
            None if m.deck.remaining() < REVEAL_SIZE => {
                events.extend(controller.advance(id).unwrap());
            }
            None => events.extend(controller.start_turn(id).unwrap()),
        }
    }

    panic!("match {id} did not finish");
}

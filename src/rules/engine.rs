//! Match state machine.
//!
//! `Rules::apply` is the only way a match changes. It runs the command on a
//! clone of the match and commits the clone only if every step succeeded,
//! so a rejected command leaves no trace.
//!
//! ```text
//! Waiting --2 joins--> Drafting --grid full--> RoundEnd --+--> Drafting (next round)
//!                         |                               +--> GameEnd  (final round)
//!                         +--disconnect--> Aborted
//! ```
//!
//! Within a round, each turn is opened by the last picker of the previous
//! turn, which continues the snake across turns and rounds.
//!
//! Turns are dealt by `start-turn` (or automatically when configured).
//! `advance` never deals: it closes the round when a grid is full or the
//! deck can no longer fill a reveal, and is a no-op otherwise.

use std::cmp::Ordering;

use tracing::debug;

use crate::cards::Card;
use crate::controller::{AbortReason, Command, GameEvent};
use crate::core::{
    CardLocation, EngineConfig, EngineError, EngineResult, GameResult, Lifecycle, Match, PlayerId,
    TieBreak, PLAYER_COUNT,
};
use crate::draft::{DraftState, REVEAL_SIZE};
use crate::grid::{self, DuplicateChoice, Grid, Placement, PlacementArgs, Scenario};

/// Does any grid have every cell occupied?
#[must_use]
pub fn check_round_end(m: &Match) -> bool {
    m.players.iter().any(|(_, board)| board.grid.is_full())
}

/// The rules of the game, parameterized by configuration.
#[derive(Clone, Debug)]
pub struct Rules {
    config: EngineConfig,
}

impl Rules {
    /// Create rules from a validated configuration.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply a command atomically.
    pub fn apply(&self, m: &mut Match, command: &Command) -> EngineResult<Vec<GameEvent>> {
        let mut next = m.clone();
        let events = self.step(&mut next, command)?;
        *m = next;
        Ok(events)
    }

    fn step(&self, m: &mut Match, command: &Command) -> EngineResult<Vec<GameEvent>> {
        if m.lifecycle.is_terminal() {
            return match command {
                Command::Advance | Command::Disconnect { .. } => Ok(Vec::new()),
                _ => Err(EngineError::InvalidLifecycle(m.lifecycle)),
            };
        }

        match *command {
            Command::Join => self.join(m),
            Command::StartTurn => {
                require_drafting(m)?;
                self.start_turn(m)
            }
            Command::Pick {
                player,
                card_id,
                ref args,
            } => {
                require_drafting(m)?;
                let (card, draft) = current_draft(m, player)?.pick(player, card_id)?;
                let (_, draft) = draft.take_from_hand(player, card.id)?;
                let placement = grid::resolve(card, m.grid(player), args)?;

                m.draft = Some(draft);
                m.record_pick(player, card.id, Some(placement.index));
                let event = placed_event(player, card, &placement, true);
                m.players[player].grid = placement.grid;

                let mut events = vec![event];
                events.extend(self.settle(m)?);
                Ok(events)
            }
            Command::Draft { player, card_id } => {
                require_drafting(m)?;
                let (card, draft) = current_draft(m, player)?.pick(player, card_id)?;

                m.draft = Some(draft);
                m.record_pick(player, card.id, None);

                let mut events = vec![GameEvent::CardPicked {
                    player_index: player,
                    card,
                }];
                events.extend(self.settle(m)?);
                Ok(events)
            }
            Command::Place {
                player,
                card_id,
                target_index,
                choice,
            } => {
                require_drafting(m)?;
                require_seat(m, player)?;
                require_place_turn(m, player)?;
                let draft = m.draft.as_ref().ok_or(EngineError::CardNotFound {
                    card: card_id,
                    location: CardLocation::Hand(player),
                })?;
                let (card, draft) = draft.take_from_hand(player, card_id)?;
                let placement = place_from_hand(card, m.grid(player), target_index, choice)?;

                m.draft = Some(draft);
                m.record_placement(card.id, placement.index);
                let event = placed_event(player, card, &placement, false);
                m.players[player].grid = placement.grid;

                let mut events = vec![event];
                events.extend(self.settle(m)?);
                Ok(events)
            }
            Command::Advance => {
                if m.lifecycle != Lifecycle::Drafting {
                    return Ok(Vec::new());
                }
                if check_round_end(m) {
                    return self.end_round(m);
                }
                if !m.turn_open() && m.deck.remaining() < REVEAL_SIZE {
                    debug!(
                        match_id = %m.id,
                        round = m.current_round,
                        remaining = m.deck.remaining(),
                        "Deck exhausted, closing round"
                    );
                    return self.end_round(m);
                }
                Ok(Vec::new())
            }
            Command::Disconnect { player } => {
                require_seat(m, player)?;
                m.lifecycle = Lifecycle::Aborted;
                Ok(vec![GameEvent::MatchAborted {
                    reason: AbortReason::PlayerDisconnected { player },
                }])
            }
        }
    }

    fn join(&self, m: &mut Match) -> EngineResult<Vec<GameEvent>> {
        if m.lifecycle != Lifecycle::Waiting {
            return Err(EngineError::MatchFull);
        }

        let player = PlayerId::new(m.bound_players);
        m.bound_players += 1;
        let match_started = usize::from(m.bound_players) == PLAYER_COUNT;

        let mut events = vec![GameEvent::PlayerJoined {
            player_index: player,
            match_started,
        }];

        if match_started {
            m.lifecycle = Lifecycle::Drafting;
            if self.config.auto_start_turns {
                events.extend(self.start_turn(m)?);
            }
        }
        Ok(events)
    }

    /// Deal the next turn, opened by `m.current_player`.
    fn start_turn(&self, m: &mut Match) -> EngineResult<Vec<GameEvent>> {
        let carried = match &m.draft {
            Some(draft) => draft.carry_hands()?,
            None => DraftState::new(),
        };
        let (draft, deck) = carried.deal(&m.deck, m.current_player)?;

        m.turn_number += 1;
        let event = GameEvent::TurnStarted {
            round: m.current_round,
            turn: m.turn_number,
            revealed_cards: draft.revealed_cards.iter().copied().collect(),
            pick_order: draft.pick_order,
        };
        m.deck = deck;
        m.draft = Some(draft);
        Ok(vec![event])
    }

    /// Follow-up after a pick or placement: close the round, pass the turn,
    /// or open the next turn.
    fn settle(&self, m: &mut Match) -> EngineResult<Vec<GameEvent>> {
        if let Some(draft) = &m.draft {
            if let Some(picker) = draft.current_picker().or_else(|| draft.last_picker()) {
                m.current_player = picker;
            }
        }

        if check_round_end(m) {
            return self.end_round(m);
        }

        let turn_finished = m.draft.as_ref().is_some_and(DraftState::is_complete);
        if turn_finished && self.config.auto_start_turns {
            if m.deck.remaining() < REVEAL_SIZE {
                return self.end_round(m);
            }
            return self.start_turn(m);
        }
        Ok(Vec::new())
    }

    /// Score both grids and move to the next round or end the game.
    pub fn end_round(&self, m: &mut Match) -> EngineResult<Vec<GameEvent>> {
        m.lifecycle = Lifecycle::RoundEnd;
        let round = m.current_round;
        let scores = m
            .players
            .map(|_, board| grid::score_round(&board.grid, round, &self.config.scoring));
        for (player, board) in m.players.iter_mut() {
            board.record_round(scores[player]);
        }

        let final_round = round >= self.config.rounds;
        let mut events = vec![GameEvent::RoundComplete {
            round_number: round,
            scores: scores.clone(),
            totals: m.totals(),
            next_round: (!final_round).then(|| round + 1),
        }];
        debug!(
            match_id = %m.id,
            round,
            score_0 = scores[PlayerId::new(0)],
            score_1 = scores[PlayerId::new(1)],
            "Round scored"
        );

        if final_round {
            let result = self.decide(m);
            m.result = Some(result);
            m.lifecycle = Lifecycle::GameEnd;
            events.push(GameEvent::GameComplete {
                final_scores: m.totals(),
                winner: result.winner(),
            });
            return Ok(events);
        }

        let mut used: Vec<Card> = Vec::new();
        for (_, board) in m.players.iter_mut() {
            used.extend(board.grid.drain());
        }
        if let Some(draft) = m.draft.take() {
            if let Some(last) = draft.last_picker() {
                m.current_player = last;
            }
            used.extend(draft.outstanding_cards());
        }
        m.deck = m.deck.recycle(used, &mut m.rng);
        m.current_round += 1;
        m.turn_number = 0;
        m.lifecycle = Lifecycle::Drafting;

        events.extend(self.start_turn(m)?);
        Ok(events)
    }

    fn decide(&self, m: &Match) -> GameResult {
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));
        let by_total = m.players[a].total().cmp(&m.players[b].total());
        let ordering = match (by_total, self.config.tie_break) {
            (Ordering::Equal, TieBreak::FinalRound) => {
                let last = m.current_round;
                let score = |p: PlayerId| m.players[p].round_score(last).unwrap_or(0);
                score(a).cmp(&score(b))
            }
            (ordering, _) => ordering,
        };

        match ordering {
            Ordering::Greater => GameResult::Winner(a),
            Ordering::Less => GameResult::Winner(b),
            Ordering::Equal => GameResult::Draw,
        }
    }
}

fn require_drafting(m: &Match) -> EngineResult<()> {
    if m.lifecycle == Lifecycle::Drafting {
        Ok(())
    } else {
        Err(EngineError::InvalidLifecycle(m.lifecycle))
    }
}

fn require_seat(m: &Match, player: PlayerId) -> EngineResult<()> {
    if player.index() < usize::from(m.bound_players) {
        Ok(())
    } else {
        Err(EngineError::TurnViolation {
            player,
            expected: None,
        })
    }
}

/// Hand cards may be placed by the player holding the current pick, or by
/// either player between turns.
fn require_place_turn(m: &Match, player: PlayerId) -> EngineResult<()> {
    match m.draft.as_ref().and_then(DraftState::current_picker) {
        Some(picker) if picker != player => Err(EngineError::TurnViolation {
            player,
            expected: Some(picker),
        }),
        _ => Ok(()),
    }
}

fn current_draft(m: &Match, player: PlayerId) -> EngineResult<&DraftState> {
    m.draft.as_ref().ok_or(EngineError::TurnViolation {
        player,
        expected: None,
    })
}

/// Resolve a hand card against a grid from a cell index chosen by the player.
///
/// The index must be the card's own cell unless the card stacks face down.
fn place_from_hand(
    card: Card,
    grid: &Grid,
    target_index: usize,
    choice: Option<DuplicateChoice>,
) -> EngineResult<Placement> {
    let target_index = Grid::check_index(target_index)?;
    let scenario = grid::classify(&card, grid);
    let args = match scenario {
        Scenario::Empty | Scenario::Duplicate => {
            if target_index != card.target_index() {
                return Err(EngineError::InvalidScenario {
                    scenario,
                    reason: "card must be placed on its own cell",
                });
            }
            PlacementArgs {
                choice,
                chosen_index: None,
            }
        }
        Scenario::StackAnywhere => PlacementArgs::stack_at(target_index),
    };
    grid::apply(card, grid, scenario, &args)
}

fn placed_event(player: PlayerId, card: Card, placement: &Placement, picked: bool) -> GameEvent {
    let grid = placement.grid.clone();
    let validated_indices = placement.validated_indices.to_vec();
    if picked {
        GameEvent::CardPickedAndPlaced {
            player_index: player,
            card,
            scenario: placement.scenario,
            index: placement.index,
            grid,
            validated_indices,
        }
    } else {
        GameEvent::CardPlaced {
            player_index: player,
            card,
            scenario: placement.scenario,
            index: placement.index,
            grid,
            validated_indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use crate::core::{GameRng, MatchId};

    fn p(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    fn started(config: EngineConfig) -> (Rules, Match) {
        let rules = Rules::new(config).unwrap();
        let mut m = Match::new(MatchId(1), GameRng::new(99));
        rules.apply(&mut m, &Command::Join).unwrap();
        rules.apply(&mut m, &Command::Join).unwrap();
        (rules, m)
    }

    fn revealed(m: &Match) -> Vec<CardId> {
        m.draft
            .as_ref()
            .map(|d| d.revealed_cards.iter().map(|c| c.id).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_join_binds_two_players() {
        let rules = Rules::new(EngineConfig::default()).unwrap();
        let mut m = Match::new(MatchId(1), GameRng::new(1));

        let events = rules.apply(&mut m, &Command::Join).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::PlayerJoined {
                player_index: p(0),
                match_started: false
            }]
        );
        assert_eq!(m.lifecycle, Lifecycle::Waiting);

        rules.apply(&mut m, &Command::Join).unwrap();
        assert_eq!(m.lifecycle, Lifecycle::Drafting);

        assert_eq!(rules.apply(&mut m, &Command::Join), Err(EngineError::MatchFull));
    }

    #[test]
    fn test_waiting_rejects_play() {
        let rules = Rules::new(EngineConfig::default()).unwrap();
        let mut m = Match::new(MatchId(1), GameRng::new(1));

        let err = rules.apply(&mut m, &Command::StartTurn).unwrap_err();
        assert_eq!(err, EngineError::InvalidLifecycle(Lifecycle::Waiting));
    }

    #[test]
    fn test_auto_start_on_join() {
        let (_, m) = started(EngineConfig::default().with_auto_start_turns(true));
        assert!(m.turn_open());
        assert_eq!(m.turn_number, 1);
    }

    #[test]
    fn test_start_turn_twice_is_rejected() {
        let (rules, mut m) = started(EngineConfig::default());
        rules.apply(&mut m, &Command::StartTurn).unwrap();

        let before = m.clone();
        let err = rules.apply(&mut m, &Command::StartTurn).unwrap_err();
        assert_eq!(err, EngineError::TurnInProgress);
        assert_eq!(m.deck, before.deck);
        assert_eq!(m.draft, before.draft);
    }

    #[test]
    fn test_failed_pick_leaves_match_untouched() {
        let (rules, mut m) = started(EngineConfig::default());
        rules.apply(&mut m, &Command::StartTurn).unwrap();
        let card_id = revealed(&m)[0];
        let before = m.to_bytes().unwrap();

        let err = rules
            .apply(
                &mut m,
                &Command::Pick {
                    player: p(1),
                    card_id,
                    args: PlacementArgs::default(),
                },
            )
            .unwrap_err();

        assert!(matches!(err, EngineError::TurnViolation { .. }));
        assert_eq!(m.to_bytes().unwrap(), before);
    }

    /// Draft the first revealed card for every pick of the open turn.
    fn draft_whole_turn(rules: &Rules, m: &mut Match) -> Vec<(PlayerId, Card)> {
        let mut drafted = Vec::new();
        while let Some(player) = m.draft.as_ref().and_then(DraftState::current_picker) {
            let card = m.draft.as_ref().unwrap().revealed_cards[0];
            rules
                .apply(
                    m,
                    &Command::Draft {
                        player,
                        card_id: card.id,
                    },
                )
                .unwrap();
            drafted.push((player, card));
        }
        drafted
    }

    #[test]
    fn test_turns_chain_openers() {
        let (rules, mut m) = started(EngineConfig::default());
        rules.apply(&mut m, &Command::StartTurn).unwrap();

        assert_eq!(draft_whole_turn(&rules, &mut m).len(), REVEAL_SIZE);
        assert!(!m.turn_open());
        assert_eq!(m.current_player, p(0));

        let events = rules.apply(&mut m, &Command::StartTurn).unwrap();
        match &events[0] {
            GameEvent::TurnStarted {
                turn, pick_order, ..
            } => {
                assert_eq!(*turn, 2);
                assert_eq!(pick_order[0], p(0));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(m.is_conserved());
    }

    #[test]
    fn test_advance_is_idempotent() {
        let (rules, mut m) = started(EngineConfig::default());

        // Between turns with a full deck nothing is due.
        let before = m.to_bytes().unwrap();
        assert!(rules.apply(&mut m, &Command::Advance).unwrap().is_empty());
        assert!(rules.apply(&mut m, &Command::Advance).unwrap().is_empty());
        assert_eq!(m.to_bytes().unwrap(), before);
        assert_eq!(m.deck.cursor(), 0);

        // Mid-turn it neither deals nor fails.
        rules.apply(&mut m, &Command::StartTurn).unwrap();
        let before = m.to_bytes().unwrap();
        assert!(rules.apply(&mut m, &Command::Advance).unwrap().is_empty());
        assert!(rules.apply(&mut m, &Command::Advance).unwrap().is_empty());
        assert_eq!(m.to_bytes().unwrap(), before);
    }

    #[test]
    fn test_advance_in_waiting_is_a_no_op() {
        let rules = Rules::new(EngineConfig::default()).unwrap();
        let mut m = Match::new(MatchId(1), GameRng::new(1));
        assert!(rules.apply(&mut m, &Command::Advance).unwrap().is_empty());
        assert_eq!(m.lifecycle, Lifecycle::Waiting);
    }

    #[test]
    fn test_place_is_gated_by_turn() {
        let (rules, mut m) = started(EngineConfig::default());
        rules.apply(&mut m, &Command::StartTurn).unwrap();
        let card = m.draft.as_ref().unwrap().revealed_cards[0];
        rules
            .apply(
                &mut m,
                &Command::Draft {
                    player: p(0),
                    card_id: card.id,
                },
            )
            .unwrap();

        let place = Command::Place {
            player: p(0),
            card_id: card.id,
            target_index: card.target_index(),
            choice: None,
        };
        let before = m.to_bytes().unwrap();
        assert_eq!(
            rules.apply(&mut m, &place),
            Err(EngineError::TurnViolation {
                player: p(0),
                expected: Some(p(1)),
            })
        );
        assert_eq!(m.to_bytes().unwrap(), before);

        // Once the turn is drafted out, hands can be placed.
        draft_whole_turn(&rules, &mut m);
        assert!(!m.turn_open());
        let events = rules.apply(&mut m, &place).unwrap();
        assert_eq!(events[0].kind(), "card-placed");
    }

    #[test]
    fn test_place_requires_own_cell() {
        let (rules, mut m) = started(EngineConfig::default());
        rules.apply(&mut m, &Command::StartTurn).unwrap();
        let drafted = draft_whole_turn(&rules, &mut m);
        let (player, card) = drafted[0];

        let wrong = (card.target_index() + 1) % 9;
        let err = rules
            .apply(
                &mut m,
                &Command::Place {
                    player,
                    card_id: card.id,
                    target_index: wrong,
                    choice: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidScenario { .. }));

        let events = rules
            .apply(
                &mut m,
                &Command::Place {
                    player,
                    card_id: card.id,
                    target_index: card.target_index(),
                    choice: None,
                },
            )
            .unwrap();
        assert_eq!(events[0].kind(), "card-placed");
        assert_eq!(m.history[0].placed_at, Some(card.target_index()));
    }

    #[test]
    fn test_disconnect_aborts_and_is_idempotent() {
        let (rules, mut m) = started(EngineConfig::default());

        let events = rules
            .apply(&mut m, &Command::Disconnect { player: p(1) })
            .unwrap();
        assert_eq!(events[0].kind(), "match-aborted");
        assert_eq!(m.lifecycle, Lifecycle::Aborted);

        assert!(rules
            .apply(&mut m, &Command::Disconnect { player: p(0) })
            .unwrap()
            .is_empty());
        assert!(rules.apply(&mut m, &Command::Advance).unwrap().is_empty());
        assert_eq!(
            rules.apply(&mut m, &Command::StartTurn),
            Err(EngineError::InvalidLifecycle(Lifecycle::Aborted))
        );
    }

    #[test]
    fn test_unknown_seat_is_rejected() {
        let (rules, mut m) = started(EngineConfig::default());
        let err = rules
            .apply(&mut m, &Command::Disconnect { player: p(7) })
            .unwrap_err();
        assert!(matches!(err, EngineError::TurnViolation { .. }));
    }

    #[test]
    fn test_advance_closes_round_when_deck_runs_low() {
        let (rules, mut m) = started(EngineConfig::default().with_rounds(1));
        let (_, drained) = m.deck.deal_next(m.deck.remaining() - 3).unwrap();
        m.deck = drained;

        let events = rules.apply(&mut m, &Command::Advance).unwrap();
        assert_eq!(events[0].kind(), "round-complete");
        assert_eq!(events[1].kind(), "game-complete");
        assert_eq!(m.lifecycle, Lifecycle::GameEnd);
        assert_eq!(m.result, Some(GameResult::Draw));
    }

    #[test]
    fn test_tie_break_final_round() {
        let rules = Rules::new(EngineConfig::default().with_tie_break(TieBreak::FinalRound)).unwrap();
        let mut m = Match::new(MatchId(1), GameRng::new(1));
        m.current_round = 2;
        m.players[p(0)].record_round(10);
        m.players[p(0)].record_round(2);
        m.players[p(1)].record_round(7);
        m.players[p(1)].record_round(5);

        assert_eq!(rules.decide(&m), GameResult::Winner(p(1)));

        let draw_rules = Rules::new(EngineConfig::default()).unwrap();
        assert_eq!(draw_rules.decide(&m), GameResult::Draw);
    }

    #[test]
    fn test_check_round_end() {
        let (_, mut m) = started(EngineConfig::default());
        assert!(!check_round_end(&m));

        let mut full = Grid::new();
        for (i, card) in crate::cards::CATALOG.iter().take(9).enumerate() {
            full.set(i, crate::cards::PlacedCard::face_up(*card));
        }
        m.players[p(1)].grid = full;
        assert!(check_round_end(&m));
    }
}

//! Commands accepted by a match.
//!
//! Wire form is JSON-friendly: the variant name goes in a `command` field,
//! fields are camelCase.
//!
//! ```
//! use grid_draft::controller::Command;
//!
//! let cmd: Command = serde_json::from_str(
//!     r#"{"command": "pick", "player": 1, "cardId": 12, "args": {"choice": "keepNew"}}"#,
//! ).unwrap();
//! assert!(matches!(cmd, Command::Pick { .. }));
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayerId;
use crate::grid::{DuplicateChoice, PlacementArgs};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Command {
    /// Take the next free seat.
    Join,

    /// Reveal the next four cards.
    StartTurn,

    /// Draft a revealed card and place it immediately.
    Pick {
        player: PlayerId,
        card_id: CardId,
        #[serde(default)]
        args: PlacementArgs,
    },

    /// Draft a revealed card into the hand without placing it.
    Draft { player: PlayerId, card_id: CardId },

    /// Place a card from the hand.
    ///
    /// `target_index` must be the card's own cell unless the card is being
    /// stacked face down, in which case it names the empty cell to use.
    Place {
        player: PlayerId,
        card_id: CardId,
        target_index: usize,
        #[serde(default)]
        choice: Option<DuplicateChoice>,
    },

    /// Close the round if it is due: a grid is full, or no turn is open
    /// and the deck cannot cover another reveal. Otherwise does nothing,
    /// so repeating it is harmless.
    Advance,

    Disconnect { player: PlayerId },
}

impl Command {
    /// Seat named by the command, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Command::Pick { player, .. }
            | Command::Draft { player, .. }
            | Command::Place { player, .. }
            | Command::Disconnect { player } => Some(*player),
            Command::Join | Command::StartTurn | Command::Advance => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Join => "join",
            Command::StartTurn => "start-turn",
            Command::Pick { .. } => "pick",
            Command::Draft { .. } => "draft",
            Command::Place { .. } => "place",
            Command::Advance => "advance",
            Command::Disconnect { .. } => "disconnect",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let cmd = Command::Place {
            player: PlayerId::new(0),
            card_id: CardId::new(33),
            target_index: 4,
            choice: Some(DuplicateChoice::KeepExisting),
        };
        let json = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["command"], "place");
        assert_eq!(json["cardId"], 33);
        assert_eq!(json["targetIndex"], 4);
        assert_eq!(json["choice"], "keepExisting");
    }

    #[test]
    fn test_pick_args_default() {
        let cmd: Command =
            serde_json::from_str(r#"{"command": "pick", "player": 0, "cardId": 5}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Pick {
                player: PlayerId::new(0),
                card_id: CardId::new(5),
                args: PlacementArgs::default(),
            }
        );
        assert_eq!(cmd.player(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_unit_commands() {
        let cmd: Command = serde_json::from_str(r#"{"command": "start-turn"}"#).unwrap();
        assert_eq!(cmd, Command::StartTurn);
        assert_eq!(cmd.name(), "start-turn");
        assert_eq!(cmd.player(), None);
    }
}

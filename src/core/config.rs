//! Engine configuration.
//!
//! Callers configure match rules at startup via `EngineConfig`. Every
//! field has a default matching the standard three-round game, so most
//! callers only need `EngineConfig::default()`.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// How the winner is decided when cumulative totals are equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Equal totals end the game without a winner.
    #[default]
    Draw,
    /// Equal totals go to the higher score of the final round; still a
    /// draw if that is equal too.
    FinalRound,
}

/// Scoring parameters for the color-zone bonus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Smallest connected same-color zone that earns a bonus.
    pub zone_min_size: usize,

    /// Points per card in a qualifying zone, before the round multiplier.
    /// The multiplier is `round + 1`.
    pub zone_bonus_per_card: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            zone_min_size: 3,
            zone_bonus_per_card: 1,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rounds per match.
    pub rounds: u8,

    /// Color-zone scoring parameters.
    pub scoring: ScoringRules,

    /// Tie handling after the final round.
    pub tie_break: TieBreak,

    /// Start the next turn as soon as the previous one completes, instead
    /// of waiting for an explicit `start-turn` command.
    /// Turns after a round transition always start automatically.
    pub auto_start_turns: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            scoring: ScoringRules::default(),
            tie_break: TieBreak::Draw,
            auto_start_turns: false,
        }
    }
}

impl EngineConfig {
    /// Set the number of rounds.
    #[must_use]
    pub fn with_rounds(mut self, rounds: u8) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set the color-zone scoring parameters.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the tie-break policy.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Enable or disable automatic turn starts.
    #[must_use]
    pub fn with_auto_start_turns(mut self, enabled: bool) -> Self {
        self.auto_start_turns = enabled;
        self
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> EngineResult<()> {
        if self.rounds == 0 {
            return Err(EngineError::InvalidConfig("rounds must be at least 1".into()));
        }
        if self.scoring.zone_min_size == 0 {
            return Err(EngineError::InvalidConfig(
                "zone_min_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

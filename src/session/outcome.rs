//! Final result of a match.

use serde::{Deserialize, Serialize};

use crate::core::TeamId;

/// Why the winning team won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryReason {
    /// The other team ran out of lives.
    Knockout,
    /// The rounds ran out and this team kept more lives.
    MoreLives,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Winner { team: TeamId, reason: VictoryReason },
    Draw,
}

impl GameOutcome {
    #[must_use]
    pub fn is_winner(&self, team: TeamId) -> bool {
        matches!(*self, GameOutcome::Winner { team: t, .. } if t == team)
    }

    #[must_use]
    pub fn winner(&self) -> Option<TeamId> {
        match *self {
            GameOutcome::Winner { team, .. } => Some(team),
            GameOutcome::Draw => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Winner {
                team,
                reason: VictoryReason::Knockout,
            } => write!(f, "{team} wins by knockout"),
            GameOutcome::Winner {
                team,
                reason: VictoryReason::MoreLives,
            } => write!(f, "{team} wins on lives"),
            GameOutcome::Draw => f.write_str("Draw"),
        }
    }
}

//! Round phases, player inputs and clock payloads.

use serde::{Deserialize, Serialize};

use crate::core::TeamId;

/// Where the round machine is.
///
/// `Idle → Thinking → Team1Turn → Team2Turn → Announcing → Judging →
/// Resolved → (Thinking | GameOver)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Thinking,
    Team1Turn,
    Team2Turn,
    /// "Judges will decide" interlude before the vote.
    Announcing,
    Judging,
    Resolved,
    GameOver,
}

impl Phase {
    /// The turn phase for `team`.
    #[must_use]
    pub fn turn(team: TeamId) -> Self {
        match team {
            TeamId::Team1 => Phase::Team1Turn,
            TeamId::Team2 => Phase::Team2Turn,
        }
    }

    /// The team answering in this phase, if any.
    #[must_use]
    pub fn active_team(self) -> Option<TeamId> {
        match self {
            Phase::Team1Turn => Some(TeamId::Team1),
            Phase::Team2Turn => Some(TeamId::Team2),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Phase::GameOver
    }
}

/// Discrete player signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    /// Audience vote naming the team that answered worse.
    Vote(TeamId),
    EndTurn,
    SkipThinking,
    TogglePause,
}

/// Payload of the round machine's clock wake-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wakeup {
    Think,
    Turn,
    Judge,
    Transition,
    Monitor,
}

//! Session configuration.
//!
//! A `SessionConfig` is built once before a match starts and handed to the
//! round machine by value. Nothing in the engine reads ambient settings.
//!
//! - `standard()`: the regular match (2 minute windows, 9 rounds)
//! - `tutorial()`: the short guided match (15 second windows, 3 rounds)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{Result, SessionError};
use super::team::TeamId;

/// Upper bound for any sampling or polling cadence.
pub const MAX_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// What an unvoted judging countdown resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeTimeoutPolicy {
    /// Nobody loses a life.
    #[default]
    NoLoser,
    /// The given team is treated as the losing side.
    Against(TeamId),
}

impl JudgeTimeoutPolicy {
    /// The loser reported when the countdown runs out.
    #[must_use]
    pub fn loser(self) -> Option<TeamId> {
        match self {
            JudgeTimeoutPolicy::NoLoser => None,
            JudgeTimeoutPolicy::Against(team) => Some(team),
        }
    }
}

/// Order of a match's combined question list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Reshuffle the combined list.
    #[default]
    Shuffled,
    /// General questions first, then the role-specific ones.
    GeneralFirst,
}

/// Pause-aware interludes between phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTimings {
    /// Delay after "skip thinking time" before the first turn begins.
    #[serde(with = "super::serde_duration")]
    pub skip_grace: Duration,

    /// "Judges will decide" interlude between the second turn and judging.
    #[serde(with = "super::serde_duration")]
    pub judges_interlude: Duration,
}

impl TransitionTimings {
    /// No interludes at all; phases chain back to back.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            skip_grace: Duration::ZERO,
            judges_interlude: Duration::ZERO,
        }
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            skip_grace: Duration::from_millis(350),
            judges_interlude: Duration::from_secs(2),
        }
    }
}

/// Complete configuration for one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Reading window before the teams answer.
    #[serde(with = "super::serde_duration")]
    pub think: Duration,

    /// Audience voting window.
    #[serde(with = "super::serde_duration")]
    pub judge: Duration,

    /// Each team's answer window.
    #[serde(with = "super::serde_duration")]
    pub round: Duration,

    /// Round cap; reaching it ends the match on a lives comparison.
    pub max_rounds: usize,

    /// Starting (and maximum) lives per team.
    pub max_lives: u32,

    /// Score value that fills the score bar.
    pub max_points: u32,

    /// Maximum number of questions drawn for the match.
    pub question_cap: usize,

    #[serde(default)]
    pub question_order: SelectionOrder,

    /// Cadence of countdown redraws.
    #[serde(with = "super::serde_duration")]
    pub sample_interval: Duration,

    /// Cadence of the game-over poll.
    #[serde(with = "super::serde_duration")]
    pub monitor_interval: Duration,

    pub judge_timeout: JudgeTimeoutPolicy,

    #[serde(default)]
    pub transitions: TransitionTimings,

    /// When false, no sound cues are emitted.
    #[serde(default = "default_sound")]
    pub sound: bool,
}

fn default_sound() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl SessionConfig {
    /// The regular match.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            think: Duration::from_secs(120),
            judge: Duration::from_secs(120),
            round: Duration::from_secs(120),
            max_rounds: 9,
            max_lives: 5,
            max_points: 10,
            question_cap: 10,
            question_order: SelectionOrder::Shuffled,
            sample_interval: Duration::from_millis(100),
            monitor_interval: Duration::from_millis(100),
            judge_timeout: JudgeTimeoutPolicy::NoLoser,
            transitions: TransitionTimings::default(),
            sound: true,
        }
    }

    /// The guided tutorial match.
    #[must_use]
    pub fn tutorial() -> Self {
        Self {
            think: Duration::from_secs(15),
            judge: Duration::from_secs(999),
            round: Duration::from_secs(15),
            max_rounds: 3,
            ..Self::standard()
        }
    }

    #[must_use]
    pub fn with_think(mut self, think: Duration) -> Self {
        self.think = think;
        self
    }

    #[must_use]
    pub fn with_judge(mut self, judge: Duration) -> Self {
        self.judge = judge;
        self
    }

    #[must_use]
    pub fn with_round(mut self, round: Duration) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    #[must_use]
    pub fn with_max_lives(mut self, max_lives: u32) -> Self {
        self.max_lives = max_lives;
        self
    }

    #[must_use]
    pub fn with_question_cap(mut self, cap: usize) -> Self {
        self.question_cap = cap;
        self
    }

    #[must_use]
    pub fn with_question_order(mut self, order: SelectionOrder) -> Self {
        self.question_order = order;
        self
    }

    #[must_use]
    pub fn with_judge_timeout(mut self, policy: JudgeTimeoutPolicy) -> Self {
        self.judge_timeout = policy;
        self
    }

    #[must_use]
    pub fn with_transitions(mut self, transitions: TransitionTimings) -> Self {
        self.transitions = transitions;
        self
    }

    #[must_use]
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    #[must_use]
    pub fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    /// Check every knob the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(SessionError::config("max_rounds must be at least 1"));
        }
        if self.max_lives == 0 {
            return Err(SessionError::config("max_lives must be at least 1"));
        }
        if self.max_points == 0 {
            return Err(SessionError::config("max_points must be at least 1"));
        }
        if self.question_cap == 0 {
            return Err(SessionError::config("question_cap must be at least 1"));
        }
        for (name, interval) in [
            ("sample_interval", self.sample_interval),
            ("monitor_interval", self.monitor_interval),
        ] {
            if interval.is_zero() || interval > MAX_SAMPLE_INTERVAL {
                return Err(SessionError::config(format!(
                    "{name} must be between 1ms and {}ms, got {}ms",
                    MAX_SAMPLE_INTERVAL.as_millis(),
                    interval.as_millis()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_defaults() {
        let config = SessionConfig::standard();
        assert_eq!(config.think, Duration::from_secs(120));
        assert_eq!(config.judge, Duration::from_secs(120));
        assert_eq!(config.round, Duration::from_secs(120));
        assert_eq!(config.max_rounds, 9);
        assert_eq!(config.max_lives, 5);
        assert_eq!(config.judge_timeout, JudgeTimeoutPolicy::NoLoser);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tutorial_preset() {
        let config = SessionConfig::tutorial();
        assert_eq!(config.think, Duration::from_secs(15));
        assert_eq!(config.judge, Duration::from_secs(999));
        assert_eq!(config.round, Duration::from_secs(15));
        assert_eq!(config.max_rounds, 3);
    }

    #[test]
    fn test_validate_rejects_bad_knobs() {
        assert!(SessionConfig::standard().with_max_rounds(0).validate().is_err());
        assert!(SessionConfig::standard().with_max_lives(0).validate().is_err());

        let mut slow = SessionConfig::standard();
        slow.sample_interval = Duration::from_millis(250);
        assert!(matches!(slow.validate(), Err(SessionError::InvalidConfig(_))));

        let mut zero = SessionConfig::standard();
        zero.monitor_interval = Duration::ZERO;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_timeout_policy_loser() {
        assert_eq!(JudgeTimeoutPolicy::NoLoser.loser(), None);
        assert_eq!(JudgeTimeoutPolicy::Against(TeamId::Team2).loser(), Some(TeamId::Team2));
    }

    #[test]
    fn test_config_serde_uses_millis() {
        let config = SessionConfig::tutorial();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["think"], 15_000);
        assert_eq!(json["transitions"]["skip_grace"], 350);

        let back: SessionConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}

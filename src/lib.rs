//! # interview-battle
//!
//! Round and turn engine for a two-team job interview battle game.
//!
//! Each round shows one interview question, gives both teams a timed
//! answer window, then lets the audience vote which team answered worse.
//! The losing side drops a life and the other side scores. A match ends
//! when a team runs out of lives or the rounds run out.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: all waiting happens on a [`VirtualClock`] that the
//!    host advances explicitly. No threads, no wall-clock reads. A seed
//!    plus an input script replays a match exactly.
//!
//! 2. **Pause-Aware**: pausing freezes every pending wake-up with its exact
//!    remaining delay, so a countdown of D always lasts D of unpaused time.
//!
//! 3. **Explicit Configuration**: a [`SessionConfig`] is built once and
//!    handed to the machine. Nothing reads ambient settings.
//!
//! 4. **Presentation at the Edge**: the machine only talks to a
//!    [`Presenter`], so phase logic is testable without a screen.
//!
//! ## Modules
//!
//! - `core`: teams, RNG, configuration, persisted settings, errors
//! - `clock`: virtual clock, pause bookkeeping, visual countdowns
//! - `turn`: one team's answer window
//! - `judging`: the audience vote
//! - `questions`: question data, role catalog, per-match selection
//! - `session`: session aggregate, game-over monitor, round machine
//! - `render`: the presenter boundary

pub mod core;
pub mod clock;
pub mod turn;
pub mod judging;
pub mod questions;
pub mod session;
pub mod render;

// Re-export commonly used types
pub use crate::core::{
    GameRng, GameSettings, JudgeTimeoutPolicy, Result, SelectionOrder, SessionConfig, SessionError,
    SettingsStore, TeamId, TeamMap, TransitionTimings,
};

pub use crate::clock::{Fired, PauseController, TimerId, VirtualClock, VisualTimer};

pub use crate::turn::{TurnEnd, TurnTimer};

pub use crate::judging::{JudgingPanel, Verdict};

pub use crate::questions::{Question, QuestionBank, QuestionSelector, RoleInfo};

pub use crate::session::{
    GameOutcome, GameOverMonitor, Input, Phase, RoundMachine, Session, SessionSnapshot, VictoryReason,
};

pub use crate::render::{Bars, Presenter, RecordingPresenter, SoundCue, Surface, TracingPresenter};

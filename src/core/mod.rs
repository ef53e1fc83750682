//! Core types: teams, RNG, configuration, settings and errors.
//!
//! Everything here is independent of timing and of the round flow.

pub mod team;
pub mod rng;
pub mod config;
pub mod settings;
pub mod error;
pub mod serde_duration;

pub use team::{TeamId, TeamMap};
pub use rng::GameRng;
pub use config::{JudgeTimeoutPolicy, SelectionOrder, SessionConfig, TransitionTimings, MAX_SAMPLE_INTERVAL};
pub use settings::{GameSettings, SettingsStore};
pub use error::{Result, SessionError};

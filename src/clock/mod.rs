//! Pause-aware timing: the virtual clock, pause bookkeeping and visual
//! countdowns.
//!
//! Nothing in this module knows about sessions, teams or phases. Callers
//! pick their own payload type and dispatch on it when wake-ups fire.

pub mod pause;
pub mod virtual_clock;
pub mod visual_timer;

pub use pause::PauseController;
pub use virtual_clock::{Fired, TimerId, VirtualClock, MIN_PERIOD};
pub use visual_timer::{fill_degrees, TimerTick, VisualTimer};

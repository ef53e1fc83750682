//! Turn timing for the two answer windows of a round.

pub mod timer;

pub use timer::{TurnEnd, TurnSample, TurnTick, TurnTimer};

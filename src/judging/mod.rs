//! Judging: the audience vote that costs one team a life.

pub mod panel;

pub use panel::{JudgingPanel, JudgingTick, Verdict};

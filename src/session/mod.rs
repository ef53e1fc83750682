//! One match: the session aggregate, the game-over monitor and the round
//! state machine that drives both.

pub mod machine;
pub mod monitor;
pub mod outcome;
pub mod phase;
pub mod state;

pub use machine::RoundMachine;
pub use monitor::GameOverMonitor;
pub use outcome::{GameOutcome, VictoryReason};
pub use phase::{Input, Phase, Wakeup};
pub use state::{RoundRecord, Session, SessionSnapshot};

//! Question data, role catalog and per-match selection.

pub mod bank;
pub mod role;
pub mod selector;

pub use bank::{Question, QuestionBank, GENERAL_KEY};
pub use role::{RoleInfo, ROLES};
pub use selector::{QuestionSelector, DEFAULT_CAP};

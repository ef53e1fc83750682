//! Error types for session construction.
//!
//! Only initialization can fail: once a session has questions and a valid
//! configuration, every later irregularity (stale wake-ups, zero remaining
//! time, missing question) is absorbed by the round machine.

use thiserror::Error;

/// Errors raised while building a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The requested role has no entry in the question data.
    #[error("invalid role selection: '{0}'")]
    UnknownRole(String),

    /// The role exists but has no role-specific questions.
    #[error("no questions available for role '{0}'")]
    EmptyPool(String),

    /// The question data could not be read.
    #[error("failed to read question data: {0}")]
    Io(#[from] std::io::Error),

    /// The question data is not valid JSON or has the wrong shape.
    #[error("failed to parse question data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration knob is out of range.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// Creates an InvalidConfig error
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SessionError::UnknownRole("astronaut".into()).to_string(),
            "invalid role selection: 'astronaut'"
        );
        assert_eq!(
            SessionError::config("max_rounds must be at least 1").to_string(),
            "invalid session configuration: max_rounds must be at least 1"
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: SessionError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SessionError::Parse(_)));
    }
}

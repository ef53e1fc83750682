//! Question data document.
//!
//! The static document maps a role key to a list of `{ "question": ... }`
//! objects. The `general` key holds the questions shared by every role:
//!
//! ```json
//! {
//!   "general":   [{ "question": "Tell me about yourself." }],
//!   "developer": [{ "question": "Explain a tricky bug you fixed." }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Result, SessionError};

/// Key of the shared pool.
pub const GENERAL_KEY: &str = "general";

/// A single interview question.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// All question pools, keyed by lowercase role key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionBank {
    pools: BTreeMap<String, Vec<Question>>,
}

impl QuestionBank {
    /// Build a bank from in-memory pools.
    pub fn from_pools<K: Into<String>>(pools: impl IntoIterator<Item = (K, Vec<Question>)>) -> Self {
        Self {
            pools: pools
                .into_iter()
                .map(|(key, questions)| (normalize(&key.into()), questions))
                .collect(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let pools: BTreeMap<String, Vec<Question>> = serde_json::from_str(text)?;
        Ok(Self::from_pools(pools))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let pools: BTreeMap<String, Vec<Question>> = serde_json::from_reader(reader)?;
        Ok(Self::from_pools(pools))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// The shared pool (empty when the document has none).
    #[must_use]
    pub fn general(&self) -> &[Question] {
        self.pools
            .get(GENERAL_KEY)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// A role's pool, matched case-insensitively.
    #[must_use]
    pub fn pool(&self, role: &str) -> Option<&[Question]> {
        self.pools.get(&normalize(role)).map(Vec::as_slice)
    }

    /// Role keys present in the document, `general` included.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// The (general, role-specific) pools a match for `role` draws from.
    ///
    /// The general role uses the shared pool as its role-specific pool and
    /// draws nothing from a separate general half, so questions never repeat.
    pub fn pools_for(&self, role: &str) -> Result<(&[Question], &[Question])> {
        let key = normalize(role);
        let specific = self
            .pools
            .get(&key)
            .ok_or_else(|| SessionError::UnknownRole(role.trim().to_string()))?;
        if specific.is_empty() {
            return Err(SessionError::EmptyPool(key));
        }
        let general: &[Question] = if key == GENERAL_KEY { &[] } else { self.general() };
        Ok((general, specific.as_slice()))
    }
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

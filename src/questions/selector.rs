//! Picks the question list for a match.
//!
//! `total = min(cap, |general| + |role|)` and `half = total / 2`. Half the
//! list comes from the general pool, the rest from the role pool, each
//! drawn uniformly without replacement. If one pool is too small for its
//! share, the other pool covers the shortfall.

use serde::{Deserialize, Serialize};

use super::bank::Question;
use crate::core::{GameRng, Result, SelectionOrder, SessionError};

/// Default number of questions per match.
pub const DEFAULT_CAP: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSelector {
    pub cap: usize,
    pub order: SelectionOrder,
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new(DEFAULT_CAP)
    }
}

impl QuestionSelector {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            order: SelectionOrder::default(),
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: SelectionOrder) -> Self {
        self.order = order;
        self
    }

    /// How many questions come from each pool: `(general, role)`.
    #[must_use]
    pub fn split(&self, general: usize, role_specific: usize) -> (usize, usize) {
        let total = self.cap.min(general + role_specific);
        let half = total / 2;

        let from_general = half.min(general);
        let from_role = (total - from_general).min(role_specific);
        // Whatever the role pool could not cover goes back to the general pool.
        let from_general = (total - from_role).min(general);
        (from_general, from_role)
    }

    /// Draw the question list. Fails when the role pool is empty.
    pub fn select(&self, general: &[Question], role_specific: &[Question], rng: &GameRng) -> Result<Vec<Question>> {
        if role_specific.is_empty() {
            return Err(SessionError::EmptyPool("role-specific".to_string()));
        }

        let (from_general, from_role) = self.split(general.len(), role_specific.len());
        let mut picked = rng.for_context("general").sample(general, from_general);
        picked.extend(rng.for_context("role").sample(role_specific, from_role));

        if self.order == SelectionOrder::Shuffled {
            rng.for_context("order").shuffle(&mut picked);
        }

        tracing::debug!(
            general = from_general,
            role = from_role,
            order = ?self.order,
            "questions selected"
        );
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(prefix: &str, n: usize) -> Vec<Question> {
        (0..n).map(|i| Question::new(format!("{prefix}-{i}"))).collect()
    }

    #[test]
    fn test_even_split() {
        let selector = QuestionSelector::default();
        assert_eq!(selector.split(20, 20), (5, 5));
        assert_eq!(selector.split(3, 4), (3, 4));
        assert_eq!(QuestionSelector::new(7).split(10, 10), (3, 4));
    }

    #[test]
    fn test_short_pool_backfills() {
        let selector = QuestionSelector::default();
        assert_eq!(selector.split(20, 3), (7, 3));
        assert_eq!(selector.split(2, 20), (2, 8));
        assert_eq!(selector.split(0, 4), (0, 4));
    }

    #[test]
    fn test_empty_role_pool_fails() {
        let rng = GameRng::new(1);
        let err = QuestionSelector::default().select(&pool("g", 20), &[], &rng);
        assert!(matches!(err, Err(SessionError::EmptyPool(_))));
    }

    #[test]
    fn test_general_first_order() {
        let rng = GameRng::new(9);
        let selector = QuestionSelector::new(4).with_order(SelectionOrder::GeneralFirst);
        let picked = selector.select(&pool("g", 5), &pool("r", 5), &rng).unwrap();

        assert_eq!(picked.len(), 4);
        assert!(picked[..2].iter().all(|q| q.text.starts_with("g-")));
        assert!(picked[2..].iter().all(|q| q.text.starts_with("r-")));
    }

    #[test]
    fn test_seed_determines_selection() {
        let general = pool("g", 12);
        let role = pool("r", 12);
        let selector = QuestionSelector::default();

        let a = selector.select(&general, &role, &GameRng::new(42)).unwrap();
        let b = selector.select(&general, &role, &GameRng::new(42)).unwrap();
        assert_eq!(a, b);
    }
}

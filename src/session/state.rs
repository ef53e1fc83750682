//! Session aggregate: the mutable record of one match.
//!
//! ## Invariants
//!
//! - `0 <= lives[team] <= max_lives`
//! - `current_index <= questions.len()`, and it only moves forward
//! - at most one life-changing verdict is applied per round
//! - the outcome is latched: once set it never changes
//!
//! Only the round machine writes to a `Session`; the game-over monitor
//! reads it.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::outcome::GameOutcome;
use crate::core::{TeamId, TeamMap};
use crate::questions::Question;

/// What happened in one resolved round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub index: usize,
    /// Team that lost a life, if any.
    pub loser: Option<TeamId>,
    /// Lives after the verdict.
    pub lives: TeamMap<u32>,
    /// Scores after the verdict.
    pub scores: TeamMap<u32>,
}

/// Serializable view of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub role: String,
    pub current_index: usize,
    pub question_count: usize,
    pub lives: TeamMap<u32>,
    pub scores: TeamMap<u32>,
    pub max_lives: u32,
    pub outcome: Option<GameOutcome>,
    pub rounds: Vec<RoundRecord>,
}

/// Root aggregate for one match.
///
/// Uses `im` vectors so snapshots and clones share structure.
#[derive(Clone, Debug)]
pub struct Session {
    role: String,
    questions: Vector<Question>,
    current_index: usize,
    scores: TeamMap<u32>,
    lives: TeamMap<u32>,
    max_lives: u32,
    outcome: Option<GameOutcome>,
    history: Vector<RoundRecord>,
    /// Index of the last round a verdict was applied to.
    last_resolved: Option<usize>,
}

impl Session {
    /// Create a session over a fixed question list.
    #[must_use]
    pub fn new(role: impl Into<String>, questions: impl IntoIterator<Item = Question>, max_lives: u32) -> Self {
        Self {
            role: role.into(),
            questions: questions.into_iter().collect(),
            current_index: 0,
            scores: TeamMap::with_value(0),
            lives: TeamMap::with_value(max_lives),
            max_lives,
            outcome: None,
            history: Vector::new(),
            last_resolved: None,
        }
    }

    // === Questions ===

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn questions(&self) -> &Vector<Question> {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Move to the next question. Never passes the end of the list.
    pub fn advance_index(&mut self) -> usize {
        if self.current_index < self.questions.len() {
            self.current_index += 1;
        }
        self.current_index
    }

    // === Lives and scores ===

    #[must_use]
    pub fn lives(&self) -> &TeamMap<u32> {
        &self.lives
    }

    #[must_use]
    pub fn scores(&self) -> &TeamMap<u32> {
        &self.scores
    }

    #[must_use]
    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Apply a judging verdict to the current round.
    ///
    /// The loser drops one life (never below zero) and the other team
    /// scores a point. Returns false if the round was already resolved or
    /// the session is over.
    pub fn apply_verdict(&mut self, loser: Option<TeamId>) -> bool {
        if self.is_over() || self.last_resolved == Some(self.current_index) {
            return false;
        }
        self.last_resolved = Some(self.current_index);

        if let Some(loser) = loser {
            self.lives[loser] = self.lives[loser].saturating_sub(1);
            self.scores[loser.other()] += 1;
        }

        self.history.push_back(RoundRecord {
            index: self.current_index,
            loser,
            lives: self.lives,
            scores: self.scores,
        });
        true
    }

    /// Overwrite a team's lives, clamped to `max_lives`.
    pub fn force_lives(&mut self, team: TeamId, lives: u32) {
        self.lives[team] = lives.min(self.max_lives);
    }

    #[must_use]
    pub fn history(&self) -> &Vector<RoundRecord> {
        &self.history
    }

    // === Outcome ===

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Latch the outcome. Returns false if one was already set.
    pub fn mark_over(&mut self, outcome: GameOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            role: self.role.clone(),
            current_index: self.current_index,
            question_count: self.questions.len(),
            lives: self.lives,
            scores: self.scores,
            max_lives: self.max_lives,
            outcome: self.outcome,
            rounds: self.history.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::VictoryReason;

    fn session(n: usize) -> Session {
        Session::new("developer", (0..n).map(|i| Question::new(format!("q{i}"))), 5)
    }

    #[test]
    fn test_verdict_moves_life_and_point() {
        let mut s = session(3);
        assert!(s.apply_verdict(Some(TeamId::Team1)));
        assert_eq!(s.lives()[TeamId::Team1], 4);
        assert_eq!(s.lives()[TeamId::Team2], 5);
        assert_eq!(s.scores()[TeamId::Team2], 1);
        assert_eq!(s.scores()[TeamId::Team1], 0);
    }

    #[test]
    fn test_one_verdict_per_round() {
        let mut s = session(3);
        assert!(s.apply_verdict(Some(TeamId::Team2)));
        assert!(!s.apply_verdict(Some(TeamId::Team2)));
        assert_eq!(s.lives()[TeamId::Team2], 4);

        s.advance_index();
        assert!(s.apply_verdict(None));
        assert_eq!(s.lives()[TeamId::Team2], 4);
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_lives_floor_at_zero() {
        let mut s = session(3);
        s.force_lives(TeamId::Team1, 0);
        assert!(s.apply_verdict(Some(TeamId::Team1)));
        assert_eq!(s.lives()[TeamId::Team1], 0);

        s.force_lives(TeamId::Team2, 99);
        assert_eq!(s.lives()[TeamId::Team2], 5);
    }

    #[test]
    fn test_index_stops_at_end() {
        let mut s = session(2);
        assert_eq!(s.advance_index(), 1);
        assert_eq!(s.advance_index(), 2);
        assert_eq!(s.advance_index(), 2);
        assert!(s.current_question().is_none());
    }

    #[test]
    fn test_outcome_latched() {
        let mut s = session(1);
        assert!(s.mark_over(GameOutcome::Draw));
        assert!(!s.mark_over(GameOutcome::Winner {
            team: TeamId::Team1,
            reason: VictoryReason::Knockout,
        }));
        assert_eq!(s.outcome(), Some(GameOutcome::Draw));
        assert!(!s.apply_verdict(Some(TeamId::Team1)));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut s = session(2);
        s.apply_verdict(Some(TeamId::Team1));
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rounds.len(), 1);
        assert_eq!(back.lives.team1, 4);
        assert_eq!(back.role, "developer");
    }
}

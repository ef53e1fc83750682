//! Game-over detection.
//!
//! Conditions, in priority order:
//! 1. team 2 has no lives left: team 1 wins
//! 2. team 1 has no lives left: team 2 wins
//! 3. the round index reached `max_rounds`: more lives wins, equal is a draw
//!
//! A life-based win takes priority even when the round cap is reached on
//! the same check. The monitor fires at most once.

use std::cmp::Ordering;
use std::time::Duration;

use super::outcome::{GameOutcome, VictoryReason};
use super::state::Session;
use crate::clock::{TimerId, VirtualClock};
use crate::core::{TeamId, TeamMap};

/// Evaluate the end conditions without side effects.
#[must_use]
pub fn evaluate(lives: &TeamMap<u32>, round_index: usize, max_rounds: usize) -> Option<GameOutcome> {
    if lives.team2 == 0 {
        return Some(knockout(TeamId::Team1));
    }
    if lives.team1 == 0 {
        return Some(knockout(TeamId::Team2));
    }
    if round_index >= max_rounds {
        return Some(compare_lives(lives));
    }
    None
}

/// Lives comparison used when the rounds run out.
#[must_use]
pub fn compare_lives(lives: &TeamMap<u32>) -> GameOutcome {
    let winner = match lives.team1.cmp(&lives.team2) {
        Ordering::Greater => TeamId::Team1,
        Ordering::Less => TeamId::Team2,
        Ordering::Equal => return GameOutcome::Draw,
    };
    GameOutcome::Winner {
        team: winner,
        reason: VictoryReason::MoreLives,
    }
}

fn knockout(team: TeamId) -> GameOutcome {
    GameOutcome::Winner {
        team,
        reason: VictoryReason::Knockout,
    }
}

/// Periodic poll over a session's end conditions.
#[derive(Clone, Debug)]
pub struct GameOverMonitor {
    max_rounds: usize,
    interval: Duration,
    poll: Option<TimerId>,
    fired: Option<GameOutcome>,
}

impl GameOverMonitor {
    #[must_use]
    pub fn new(max_rounds: usize, interval: Duration) -> Self {
        Self {
            max_rounds,
            interval,
            poll: None,
            fired: None,
        }
    }

    /// Begin polling every `interval`. No-op once fired or already polling.
    pub fn start<E: Clone>(&mut self, payload: E, clock: &mut VirtualClock<E>) {
        if self.poll.is_none() && self.fired.is_none() {
            self.poll = Some(clock.every(self.interval, payload));
        }
    }

    pub fn stop<E: Clone>(&mut self, clock: &mut VirtualClock<E>) {
        if let Some(id) = self.poll.take() {
            clock.cancel(id);
        }
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    /// Whether `id` is this monitor's poll.
    #[must_use]
    pub fn owns(&self, id: TimerId) -> bool {
        self.poll == Some(id)
    }

    /// The outcome this monitor reported, if it has fired.
    #[must_use]
    pub fn fired(&self) -> Option<GameOutcome> {
        self.fired
    }

    /// One poll tick. Returns the outcome the first time a condition
    /// holds, and `None` on every later call.
    pub fn check<E: Clone>(&mut self, session: &Session, clock: &mut VirtualClock<E>) -> Option<GameOutcome> {
        if self.fired.is_some() || session.is_over() {
            return None;
        }
        let outcome = evaluate(session.lives(), session.current_index(), self.max_rounds)?;
        self.latch(outcome, clock);
        Some(outcome)
    }

    /// Decide the match when the question list is exhausted.
    ///
    /// Returns the already reported outcome if the monitor has fired.
    pub fn conclude<E: Clone>(&mut self, session: &Session, clock: &mut VirtualClock<E>) -> GameOutcome {
        if let Some(outcome) = self.fired {
            return outcome;
        }
        let outcome = evaluate(session.lives(), session.current_index(), self.max_rounds)
            .unwrap_or_else(|| compare_lives(session.lives()));
        self.latch(outcome, clock);
        outcome
    }

    fn latch<E: Clone>(&mut self, outcome: GameOutcome, clock: &mut VirtualClock<E>) {
        self.fired = Some(outcome);
        self.stop(clock);
        tracing::debug!(%outcome, "game-over condition met");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::Question;

    fn lives(team1: u32, team2: u32) -> TeamMap<u32> {
        TeamMap { team1, team2 }
    }

    #[test]
    fn test_evaluate_priority() {
        assert_eq!(evaluate(&lives(3, 3), 0, 9), None);
        assert_eq!(evaluate(&lives(3, 0), 0, 9), Some(knockout(TeamId::Team1)));
        assert_eq!(evaluate(&lives(0, 2), 0, 9), Some(knockout(TeamId::Team2)));
        // Both at zero: the team 2 check comes first.
        assert_eq!(evaluate(&lives(0, 0), 0, 9), Some(knockout(TeamId::Team1)));
    }

    #[test]
    fn test_life_zero_beats_round_cap() {
        assert_eq!(evaluate(&lives(0, 5), 9, 9), Some(knockout(TeamId::Team2)));
    }

    #[test]
    fn test_round_cap_compares_lives() {
        assert_eq!(evaluate(&lives(3, 3), 9, 9), Some(GameOutcome::Draw));
        assert_eq!(
            evaluate(&lives(4, 5), 1, 1),
            Some(GameOutcome::Winner {
                team: TeamId::Team2,
                reason: VictoryReason::MoreLives
            })
        );
    }

    #[test]
    fn test_check_fires_once_and_stops_polling() {
        let mut clock: VirtualClock<()> = VirtualClock::new();
        let mut session = Session::new("qa", vec![Question::new("q")], 5);
        let mut monitor = GameOverMonitor::new(9, Duration::from_millis(100));
        monitor.start((), &mut clock);
        assert!(monitor.is_polling());

        assert_eq!(monitor.check(&session, &mut clock), None);
        session.force_lives(TeamId::Team1, 0);
        assert_eq!(monitor.check(&session, &mut clock), Some(knockout(TeamId::Team2)));
        assert!(!monitor.is_polling());
        assert_eq!(clock.pending_count(), 0);

        assert_eq!(monitor.check(&session, &mut clock), None);
        assert_eq!(monitor.conclude(&session, &mut clock), knockout(TeamId::Team2));
    }
}

//! Audience vote deciding which team answered worse.
//!
//! The panel offers one control per team. The first vote closes it; the
//! countdown closing it first applies the configured timeout policy. The
//! panel only reports the loser, it never touches lives or scores.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{TimerId, TimerTick, VirtualClock, VisualTimer};
use crate::core::{JudgeTimeoutPolicy, TeamId};

/// Result of a judging phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The audience picked this team as the losing side.
    Voted(TeamId),
    /// The countdown ran out; `loser` comes from the timeout policy.
    TimedOut { loser: Option<TeamId> },
}

impl Verdict {
    /// The team that loses a life, if any.
    #[must_use]
    pub fn loser(&self) -> Option<TeamId> {
        match *self {
            Verdict::Voted(team) => Some(team),
            Verdict::TimedOut { loser } => loser,
        }
    }
}

/// How a fired wake-up relates to the panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JudgingTick {
    Sample { remaining: Duration, fill_degrees: f32 },
    Closed(Verdict),
    Stale,
}

/// One judging phase. Closes exactly once.
#[derive(Clone, Debug)]
pub struct JudgingPanel<E> {
    countdown: VisualTimer<E>,
    policy: JudgeTimeoutPolicy,
    verdict: Option<Verdict>,
}

impl<E: Clone> JudgingPanel<E> {
    /// Open the panel and start its countdown.
    pub fn open(
        duration: Duration,
        policy: JudgeTimeoutPolicy,
        sample_every: Duration,
        payload: E,
        clock: &mut VirtualClock<E>,
    ) -> Self {
        let mut countdown = VisualTimer::new(duration, sample_every, payload);
        countdown.start(clock);
        Self {
            countdown,
            policy,
            verdict: None,
        }
    }

    /// Whether the vote controls are still enabled.
    #[must_use]
    pub fn accepts_votes(&self) -> bool {
        self.verdict.is_none()
    }

    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    #[must_use]
    pub fn remaining(&self, clock: &VirtualClock<E>) -> Duration {
        self.countdown.remaining(clock)
    }

    #[must_use]
    pub fn fill_degrees(&self, clock: &VirtualClock<E>) -> f32 {
        self.countdown.fill_degrees(clock)
    }

    /// Register a vote naming `loser`. Only the first vote is honored.
    pub fn vote(&mut self, loser: TeamId, clock: &mut VirtualClock<E>) -> Option<Verdict> {
        if self.verdict.is_some() {
            tracing::debug!(%loser, "vote ignored, panel already closed");
            return None;
        }
        self.countdown.finish_now(clock);
        let verdict = Verdict::Voted(loser);
        self.verdict = Some(verdict);
        tracing::debug!(%loser, "vote accepted");
        Some(verdict)
    }

    /// Classify a fired wake-up, closing the panel on countdown expiry.
    pub fn on_fired(&mut self, id: TimerId, clock: &mut VirtualClock<E>) -> JudgingTick {
        if self.verdict.is_some() {
            return JudgingTick::Stale;
        }
        match self.countdown.on_fired(id, clock) {
            TimerTick::Expired => {
                let verdict = Verdict::TimedOut {
                    loser: self.policy.loser(),
                };
                self.verdict = Some(verdict);
                tracing::debug!(?verdict, "judging timed out");
                JudgingTick::Closed(verdict)
            }
            TimerTick::Sample => JudgingTick::Sample {
                remaining: self.countdown.remaining(clock),
                fill_degrees: self.countdown.fill_degrees(clock),
            },
            TimerTick::Stale => JudgingTick::Stale,
        }
    }

    /// Tear down without a verdict (session over).
    pub fn close(&mut self, clock: &mut VirtualClock<E>) {
        self.countdown.reset(clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(panel: &mut JudgingPanel<()>, clock: &mut VirtualClock<()>, dt: Duration) -> Vec<JudgingTick> {
        let horizon = clock.now() + dt;
        let mut ticks = Vec::new();
        while let Some(fired) = clock.pop_due(horizon) {
            ticks.push(panel.on_fired(fired.id, clock));
        }
        clock.settle(horizon);
        ticks
    }

    #[test]
    fn test_first_vote_wins() {
        let mut clock = VirtualClock::new();
        let mut panel = JudgingPanel::open(ms(5000), JudgeTimeoutPolicy::NoLoser, ms(100), (), &mut clock);

        assert_eq!(panel.vote(TeamId::Team2, &mut clock), Some(Verdict::Voted(TeamId::Team2)));
        assert_eq!(panel.vote(TeamId::Team1, &mut clock), None);
        assert!(!panel.accepts_votes());
        assert_eq!(panel.verdict().and_then(|v| v.loser()), Some(TeamId::Team2));
        assert!(drain(&mut panel, &mut clock, ms(10_000)).is_empty());
    }

    #[test]
    fn test_timeout_defaults_to_no_loser() {
        let mut clock = VirtualClock::new();
        let mut panel = JudgingPanel::open(ms(300), JudgeTimeoutPolicy::NoLoser, ms(100), (), &mut clock);

        let ticks = drain(&mut panel, &mut clock, ms(300));
        assert!(ticks.contains(&JudgingTick::Closed(Verdict::TimedOut { loser: None })));
        assert_eq!(panel.vote(TeamId::Team1, &mut clock), None);
    }

    #[test]
    fn test_timeout_policy_against_team() {
        let mut clock = VirtualClock::new();
        let policy = JudgeTimeoutPolicy::Against(TeamId::Team1);
        let mut panel = JudgingPanel::open(ms(100), policy, ms(50), (), &mut clock);

        drain(&mut panel, &mut clock, ms(100));
        assert_eq!(panel.verdict(), Some(Verdict::TimedOut { loser: Some(TeamId::Team1) }));
    }
}

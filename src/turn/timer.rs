//! One team's answer window.
//!
//! The turn ends on whichever comes first: its pause-aware deadline or an
//! "end turn" signal. The displayed remaining time is derived from the
//! clock's cumulative pause counter, which the caller resets right before
//! starting each turn, so earlier pauses never leak into this turn.

use std::time::Duration;

use crate::clock::{fill_degrees, TimerId, VirtualClock};
use crate::core::TeamId;

/// How a turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEnd {
    TimedOut,
    EndedEarly,
}

/// Countdown state for redrawing the turn ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnSample {
    pub team: TeamId,
    pub remaining: Duration,
    pub fill_degrees: f32,
}

/// How a fired wake-up relates to the turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurnTick {
    Sample(TurnSample),
    Ended(TurnEnd),
    Stale,
}

/// Countdown for a single team's turn. Resolves exactly once.
#[derive(Clone, Debug)]
pub struct TurnTimer {
    team: TeamId,
    duration: Duration,
    started_at: Duration,
    deadline: TimerId,
    sampler: TimerId,
    ended: Option<(TurnEnd, Duration)>,
}

impl TurnTimer {
    /// Start a turn for `team` lasting `duration` of unpaused time.
    pub fn start<E: Clone>(
        team: TeamId,
        duration: Duration,
        sample_every: Duration,
        payload: E,
        clock: &mut VirtualClock<E>,
    ) -> Self {
        let deadline = clock.after(duration, payload.clone());
        let sampler = clock.every(sample_every, payload);
        tracing::debug!(%team, duration_ms = duration.as_millis() as u64, "turn started");
        Self {
            team,
            duration,
            started_at: clock.now(),
            deadline,
            sampler,
            ended: None,
        }
    }

    #[must_use]
    pub fn team(&self) -> TeamId {
        self.team
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// How the turn ended, once it has.
    #[must_use]
    pub fn outcome(&self) -> Option<TurnEnd> {
        self.ended.map(|(end, _)| end)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ended.is_none()
    }

    /// Unpaused time left in the turn.
    #[must_use]
    pub fn remaining<E: Clone>(&self, clock: &VirtualClock<E>) -> Duration {
        if let Some((_, left)) = self.ended {
            return left;
        }
        let elapsed = clock
            .now()
            .saturating_sub(self.started_at)
            .saturating_sub(clock.paused_total());
        self.duration.saturating_sub(elapsed)
    }

    #[must_use]
    pub fn sample<E: Clone>(&self, clock: &VirtualClock<E>) -> TurnSample {
        let remaining = self.remaining(clock);
        TurnSample {
            team: self.team,
            remaining,
            fill_degrees: fill_degrees(remaining, self.duration),
        }
    }

    /// The "end turn" signal. Only the first resolution counts.
    pub fn end_early<E: Clone>(&mut self, clock: &mut VirtualClock<E>) -> Option<TurnEnd> {
        if self.ended.is_some() {
            return None;
        }
        let left = self.remaining(clock);
        self.resolve(TurnEnd::EndedEarly, left, clock);
        Some(TurnEnd::EndedEarly)
    }

    /// Classify a fired wake-up.
    pub fn on_fired<E: Clone>(&mut self, id: TimerId, clock: &mut VirtualClock<E>) -> TurnTick {
        if self.ended.is_some() {
            return TurnTick::Stale;
        }
        if id == self.deadline {
            self.resolve(TurnEnd::TimedOut, Duration::ZERO, clock);
            TurnTick::Ended(TurnEnd::TimedOut)
        } else if id == self.sampler {
            TurnTick::Sample(self.sample(clock))
        } else {
            TurnTick::Stale
        }
    }

    /// Drop both wake-ups without resolving (session teardown).
    pub fn abandon<E: Clone>(&mut self, clock: &mut VirtualClock<E>) {
        clock.cancel(self.deadline);
        clock.cancel(self.sampler);
    }

    fn resolve<E: Clone>(&mut self, end: TurnEnd, left: Duration, clock: &mut VirtualClock<E>) {
        self.abandon(clock);
        self.ended = Some((end, left));
        tracing::debug!(team = %self.team, ?end, "turn ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drive(turn: &mut TurnTimer, clock: &mut VirtualClock<()>, dt: Duration) -> Vec<TurnTick> {
        let horizon = clock.now() + dt;
        let mut ticks = Vec::new();
        while let Some(fired) = clock.pop_due(horizon) {
            ticks.push(turn.on_fired(fired.id, clock));
        }
        clock.settle(horizon);
        ticks
    }

    #[test]
    fn test_times_out_after_duration() {
        let mut clock = VirtualClock::new();
        let mut turn = TurnTimer::start(TeamId::Team1, ms(1000), ms(100), (), &mut clock);

        let ticks = drive(&mut turn, &mut clock, ms(999));
        assert!(ticks.iter().all(|t| matches!(t, TurnTick::Sample(_))));
        assert!(turn.is_running());

        let ticks = drive(&mut turn, &mut clock, ms(1));
        assert!(ticks.contains(&TurnTick::Ended(TurnEnd::TimedOut)));
        assert_eq!(turn.outcome(), Some(TurnEnd::TimedOut));
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn test_end_early_resolves_once() {
        let mut clock = VirtualClock::new();
        let mut turn = TurnTimer::start(TeamId::Team2, ms(1000), ms(100), (), &mut clock);
        drive(&mut turn, &mut clock, ms(250));

        assert_eq!(turn.end_early(&mut clock), Some(TurnEnd::EndedEarly));
        assert_eq!(turn.end_early(&mut clock), None);
        assert_eq!(turn.remaining(&clock), ms(750));

        // The deadline can no longer fire.
        assert!(drive(&mut turn, &mut clock, ms(5000)).is_empty());
        assert_eq!(turn.outcome(), Some(TurnEnd::EndedEarly));
    }

    #[test]
    fn test_remaining_excludes_pauses() {
        let mut clock = VirtualClock::new();
        clock.reset_pause_time();
        let mut turn = TurnTimer::start(TeamId::Team1, ms(1000), ms(100), (), &mut clock);

        drive(&mut turn, &mut clock, ms(300));
        clock.pause();
        drive(&mut turn, &mut clock, ms(2000));
        assert_eq!(turn.remaining(&clock), ms(700));
        clock.resume();
        drive(&mut turn, &mut clock, ms(200));

        let sample = turn.sample(&clock);
        assert_eq!(sample.remaining, ms(500));
        assert!((sample.fill_degrees - 180.0).abs() < 0.01);
    }
}

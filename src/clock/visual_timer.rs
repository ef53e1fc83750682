//! Countdown bound to a visual surface.
//!
//! A `VisualTimer` owns two wake-ups on the clock while it runs: a one-shot
//! deadline and a periodic sampler used to redraw the countdown ring. Both
//! carry the same payload; `on_fired` tells them apart by `TimerId`.

use std::time::Duration;

use super::virtual_clock::{TimerId, VirtualClock};

/// How a fired wake-up relates to a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTick {
    /// The deadline fired; the timer is now finished.
    Expired,
    /// The sampler fired; redraw.
    Sample,
    /// Not one of this timer's live wake-ups.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Inert,
    Running { deadline: TimerId, sampler: TimerId },
    Suspended { remaining: Duration },
    Finished,
}

/// Pausable countdown (`start` → `pause`/`resume`* → finished, `reset` to re-arm).
#[derive(Clone, Debug)]
pub struct VisualTimer<E> {
    duration: Duration,
    sample_every: Duration,
    payload: E,
    state: State,
}

impl<E: Clone> VisualTimer<E> {
    pub fn new(duration: Duration, sample_every: Duration, payload: E) -> Self {
        Self {
            duration,
            sample_every,
            payload,
            state: State::Inert,
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Arm an inert timer. Returns false in any other state.
    pub fn start(&mut self, clock: &mut VirtualClock<E>) -> bool {
        if self.state != State::Inert {
            return false;
        }
        self.arm(clock, self.duration);
        true
    }

    /// Suspend a running timer, keeping its remaining time.
    pub fn pause(&mut self, clock: &mut VirtualClock<E>) -> bool {
        let State::Running { deadline, .. } = self.state else {
            return false;
        };
        let remaining = clock.remaining(deadline).unwrap_or(Duration::ZERO);
        self.disarm(clock);
        self.state = State::Suspended { remaining };
        true
    }

    /// Re-arm a suspended timer with what it had left.
    ///
    /// A timer suspended with nothing left expires on the next flush.
    pub fn resume(&mut self, clock: &mut VirtualClock<E>) -> bool {
        let State::Suspended { remaining } = self.state else {
            return false;
        };
        self.arm(clock, remaining);
        true
    }

    /// Finish immediately (the "skip" path). No expiry wake-up is delivered.
    pub fn finish_now(&mut self, clock: &mut VirtualClock<E>) -> bool {
        match self.state {
            State::Running { .. } | State::Suspended { .. } => {
                self.disarm(clock);
                self.state = State::Finished;
                true
            }
            State::Inert | State::Finished => false,
        }
    }

    /// Back to inert; the only way to clear `is_finished`.
    pub fn reset(&mut self, clock: &mut VirtualClock<E>) {
        self.disarm(clock);
        self.state = State::Inert;
    }

    /// Classify a fired wake-up, finishing the timer on its deadline.
    pub fn on_fired(&mut self, id: TimerId, clock: &mut VirtualClock<E>) -> TimerTick {
        let State::Running { deadline, sampler } = self.state else {
            return TimerTick::Stale;
        };
        if id == deadline {
            clock.cancel(sampler);
            self.state = State::Finished;
            TimerTick::Expired
        } else if id == sampler {
            TimerTick::Sample
        } else {
            TimerTick::Stale
        }
    }

    #[must_use]
    pub fn remaining(&self, clock: &VirtualClock<E>) -> Duration {
        match self.state {
            State::Inert => self.duration,
            State::Running { deadline, .. } => clock.remaining(deadline).unwrap_or(Duration::ZERO),
            State::Suspended { remaining } => remaining,
            State::Finished => Duration::ZERO,
        }
    }

    #[must_use]
    pub fn elapsed(&self, clock: &VirtualClock<E>) -> Duration {
        self.duration.saturating_sub(self.remaining(clock))
    }

    /// Degrees of the countdown ring still filled (360 at start, 0 at the end).
    #[must_use]
    pub fn fill_degrees(&self, clock: &VirtualClock<E>) -> f32 {
        fill_degrees(self.remaining(clock), self.duration)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Suspended on its own, or running under a paused clock.
    #[must_use]
    pub fn is_paused(&self, clock: &VirtualClock<E>) -> bool {
        match self.state {
            State::Suspended { .. } => true,
            State::Running { .. } => clock.is_paused(),
            State::Inert | State::Finished => false,
        }
    }

    fn arm(&mut self, clock: &mut VirtualClock<E>, remaining: Duration) {
        let deadline = clock.after(remaining, self.payload.clone());
        let sampler = clock.every(self.sample_every, self.payload.clone());
        self.state = State::Running { deadline, sampler };
    }

    fn disarm(&mut self, clock: &mut VirtualClock<E>) {
        if let State::Running { deadline, sampler } = self.state {
            clock.cancel(deadline);
            clock.cancel(sampler);
        }
    }
}

/// Ring fill for `remaining` out of `total`, in degrees.
#[must_use]
pub fn fill_degrees(remaining: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 0.0;
    }
    let fraction = remaining.as_secs_f64() / total.as_secs_f64();
    (fraction.clamp(0.0, 1.0) * 360.0) as f32
}

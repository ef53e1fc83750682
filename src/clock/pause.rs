//! Pause bookkeeping shared by everything scheduled on a clock.

use std::time::Duration;

/// Tracks whether the session is paused and for how long it has been.
///
/// `accumulated` only covers pauses since the last `reset`; turns reset it
/// when they begin so their remaining-time arithmetic starts from zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PauseController {
    paused_since: Option<Duration>,
    accumulated: Duration,
}

impl PauseController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Instant the current pause began, if paused.
    #[must_use]
    pub fn paused_since(&self) -> Option<Duration> {
        self.paused_since
    }

    /// Enter the paused state. Returns false if already paused.
    pub fn begin(&mut self, now: Duration) -> bool {
        if self.paused_since.is_some() {
            return false;
        }
        self.paused_since = Some(now);
        true
    }

    /// Leave the paused state. Returns false if not paused.
    pub fn end(&mut self, now: Duration) -> bool {
        let Some(since) = self.paused_since.take() else {
            return false;
        };
        self.accumulated += now.saturating_sub(since);
        true
    }

    /// Paused time since the last reset, including an ongoing pause.
    #[must_use]
    pub fn total(&self, now: Duration) -> Duration {
        let ongoing = self
            .paused_since
            .map_or(Duration::ZERO, |since| now.saturating_sub(since));
        self.accumulated + ongoing
    }

    /// Forget accumulated pause time. An ongoing pause restarts at `now`.
    pub fn reset(&mut self, now: Duration) {
        self.accumulated = Duration::ZERO;
        if self.paused_since.is_some() {
            self.paused_since = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_accumulates_across_cycles() {
        let mut pause = PauseController::new();
        assert!(pause.begin(ms(100)));
        assert!(!pause.begin(ms(150)));
        assert!(pause.end(ms(300)));
        assert!(!pause.end(ms(310)));

        assert!(pause.begin(ms(1000)));
        assert_eq!(pause.total(ms(1050)), ms(250));
        pause.end(ms(1100));
        assert_eq!(pause.total(ms(5000)), ms(300));
    }

    #[test]
    fn test_reset_while_paused_restarts_ongoing_pause() {
        let mut pause = PauseController::new();
        pause.begin(ms(0));
        pause.reset(ms(400));
        assert_eq!(pause.total(ms(400)), Duration::ZERO);
        pause.end(ms(500));
        assert_eq!(pause.total(ms(900)), ms(100));
    }
}

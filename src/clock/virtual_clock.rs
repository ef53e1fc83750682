//! Pause-aware scheduler driven by explicit time advancement.
//!
//! The clock never reads wall time. The host moves it forward with
//! `advance` (or `pop_due` + `settle` when it needs to react between
//! wake-ups), and every due wake-up is released at its exact virtual
//! instant, earliest first, FIFO among equal deadlines.
//!
//! ## Pausing
//!
//! - `pause` freezes every pending one-shot wake-up with
//!   `remaining = deadline - now`
//! - `resume` re-arms each frozen wake-up at `now + remaining`
//! - one-shots scheduled while paused start out frozen
//! - periodic wake-ups keep their cadence but are swallowed while paused
//!
//! So a one-shot of delay D fires after exactly D of unpaused time, however
//! many pause/resume cycles happen in between.

use std::collections::BTreeMap;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::pause::PauseController;

/// Smallest allowed period for `every`.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle for a scheduled wake-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// A wake-up released by the clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<E> {
    pub id: TimerId,
    pub payload: E,
    /// Virtual instant the wake-up was due.
    pub at: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cadence {
    Once,
    Every(Duration),
}

/// (deadline, sequence); sequence breaks ties in scheduling order.
type QueueKey = (Duration, u64);

#[derive(Clone, Copy, Debug)]
enum Slot {
    Armed(QueueKey),
    Frozen(Duration),
}

#[derive(Clone, Debug)]
struct Entry<E> {
    payload: E,
    cadence: Cadence,
    slot: Slot,
}

/// Virtual clock with pause-aware one-shot and periodic wake-ups.
///
/// `E` is the payload handed back when a wake-up fires; the owner of the
/// clock dispatches on it.
#[derive(Clone, Debug)]
pub struct VirtualClock<E> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: FxHashMap<TimerId, Entry<E>>,
    queue: BTreeMap<QueueKey, TimerId>,
    /// Frozen one-shots in the order they were due.
    frozen: SmallVec<[TimerId; 8]>,
    pause: PauseController,
}

impl<E> Default for VirtualClock<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            entries: FxHashMap::default(),
            queue: BTreeMap::new(),
            frozen: SmallVec::new(),
            pause: PauseController::new(),
        }
    }
}

impl<E: Clone> VirtualClock<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` to fire once after `delay` of unpaused time.
    pub fn after(&mut self, delay: Duration, payload: E) -> TimerId {
        let id = self.alloc_id();
        let slot = if self.pause.is_paused() {
            self.frozen.push(id);
            Slot::Frozen(delay)
        } else {
            Slot::Armed(self.arm(id, self.now + delay))
        };
        self.entries.insert(
            id,
            Entry {
                payload,
                cadence: Cadence::Once,
                slot,
            },
        );
        id
    }

    /// Schedule `payload` to fire every `period` (at least `MIN_PERIOD`).
    pub fn every(&mut self, period: Duration, payload: E) -> TimerId {
        let period = period.max(MIN_PERIOD);
        let id = self.alloc_id();
        let key = self.arm(id, self.now + period);
        self.entries.insert(
            id,
            Entry {
                payload,
                cadence: Cadence::Every(period),
                slot: Slot::Armed(key),
            },
        );
        id
    }

    /// Cancel a wake-up. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(entry) = self.entries.remove(&id) else {
            return false;
        };
        match entry.slot {
            Slot::Armed(key) => {
                self.queue.remove(&key);
            }
            Slot::Frozen(_) => self.frozen.retain(|f| *f != id),
        }
        true
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of scheduled wake-ups (armed or frozen).
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Unpaused time left before `id` fires.
    #[must_use]
    pub fn remaining(&self, id: TimerId) -> Option<Duration> {
        self.entries.get(&id).map(|entry| match entry.slot {
            Slot::Armed((deadline, _)) => deadline.saturating_sub(self.now),
            Slot::Frozen(remaining) => remaining,
        })
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Freeze all pending one-shots. No-op when already paused.
    pub fn pause(&mut self) -> bool {
        if !self.pause.begin(self.now) {
            return false;
        }

        let one_shots: Vec<(QueueKey, TimerId)> = self
            .queue
            .iter()
            .filter(|(_, id)| {
                self.entries
                    .get(id)
                    .is_some_and(|e| e.cadence == Cadence::Once)
            })
            .map(|(key, id)| (*key, *id))
            .collect();

        for (key, id) in one_shots {
            self.queue.remove(&key);
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.slot = Slot::Frozen(key.0.saturating_sub(self.now));
                self.frozen.push(id);
            }
        }

        tracing::debug!(at_ms = self.now.as_millis() as u64, frozen = self.frozen.len(), "clock paused");
        true
    }

    /// Re-arm every frozen one-shot with its recorded remaining delay.
    /// No-op when not paused.
    pub fn resume(&mut self) -> bool {
        if !self.pause.end(self.now) {
            return false;
        }

        let thawed = std::mem::take(&mut self.frozen);
        for id in &thawed {
            let Some(Slot::Frozen(remaining)) = self.entries.get(id).map(|e| e.slot) else {
                continue;
            };
            let key = self.arm(*id, self.now + remaining);
            if let Some(entry) = self.entries.get_mut(id) {
                entry.slot = Slot::Armed(key);
            }
        }

        tracing::debug!(at_ms = self.now.as_millis() as u64, thawed = thawed.len(), "clock resumed");
        true
    }

    /// Flip the pause state. Returns the new state (true = paused).
    pub fn toggle_pause(&mut self) -> bool {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
        self.is_paused()
    }

    /// Paused time since the last `reset_pause_time`.
    #[must_use]
    pub fn paused_total(&self) -> Duration {
        self.pause.total(self.now)
    }

    pub fn reset_pause_time(&mut self) {
        self.pause.reset(self.now);
    }

    /// Release the earliest wake-up due at or before `horizon`.
    ///
    /// Moves `now` to the wake-up's deadline. Periodic wake-ups are re-armed
    /// first and skipped while paused.
    pub fn pop_due(&mut self, horizon: Duration) -> Option<Fired<E>> {
        loop {
            let (key, id) = self.queue.first_key_value().map(|(k, i)| (*k, *i))?;
            if key.0 > horizon {
                return None;
            }
            self.queue.remove(&key);
            self.now = self.now.max(key.0);

            let Some(cadence) = self.entries.get(&id).map(|e| e.cadence) else {
                continue;
            };

            match cadence {
                Cadence::Once => {
                    let entry = self.entries.remove(&id)?;
                    return Some(Fired {
                        id,
                        payload: entry.payload,
                        at: key.0,
                    });
                }
                Cadence::Every(period) => {
                    let next = self.arm(id, key.0 + period);
                    let entry = self.entries.get_mut(&id)?;
                    entry.slot = Slot::Armed(next);
                    if self.pause.is_paused() {
                        continue;
                    }
                    return Some(Fired {
                        id,
                        payload: entry.payload.clone(),
                        at: key.0,
                    });
                }
            }
        }
    }

    /// Move `now` forward to `horizon` once nothing else is due.
    pub fn settle(&mut self, horizon: Duration) {
        self.now = self.now.max(horizon);
    }

    /// Advance by `dt`, returning every wake-up released on the way.
    pub fn advance(&mut self, dt: Duration) -> Vec<Fired<E>> {
        let horizon = self.now + dt;
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(horizon) {
            fired.push(f);
        }
        self.settle(horizon);
        fired
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn arm(&mut self, id: TimerId, deadline: Duration) -> QueueKey {
        let key = (deadline, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, id);
        key
    }
}

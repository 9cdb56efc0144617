//! Timers for the controller: keyed delayed tasks and trailing-edge debounce.
//!
//! Nothing here runs on its own thread. The host asks for the next
//! deadline, waits until then (or until input arrives), and calls the
//! controller's `poll`, which drains whatever is due.

use std::time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Fixed delays used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait between requesting a scroll and re-measuring the target.
    pub settle_delay: Duration,

    /// Quiet period after the last scroll/resize before re-measuring.
    pub debounce: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(300),
            debounce: Duration::from_millis(100),
        }
    }
}

/// A single pending task, tagged with the key it was issued for.
///
/// Scheduling again replaces the pending task. The caller compares the
/// fired key against its current state and drops stale results.
#[derive(Debug)]
pub struct DelayedTask<K> {
    pending: Option<(K, Instant)>,
}

impl<K: Copy> DelayedTask<K> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn schedule(&mut self, key: K, due: Instant) {
        self.pending = Some((key, due));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, due)| due)
    }

    /// Removes and returns the task's key if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<K> {
        match self.pending {
            Some((key, due)) if due <= now => {
                self.pending = None;
                Some(key)
            }
            _ => None,
        }
    }
}

impl<K: Copy> Default for DelayedTask<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trailing-edge debounce: fires once, `window` after the last trigger.
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    due: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, due: None }
    }

    /// Records an event; pushes the deadline out to `now + window`.
    pub fn trigger(&mut self, now: Instant) {
        self.due = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }

    /// Returns `true` once the quiet period has elapsed, then resets.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// The earlier of two optional deadlines.
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

//! Trailing-edge debouncing with an injected clock.
//!
//! The UI calls [`Debouncer::poll`] once per frame with the frame time; tests
//! pass synthetic instants instead of sleeping.

use std::time::{Duration, Instant};

/// Holds at most one pending value that fires after a quiet period.
///
/// Every [`call`](Debouncer::call) replaces the pending value and restarts the
/// window, so only the last value in a burst is ever delivered.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, cancelling whatever was pending.
    pub fn call(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Take the pending value immediately, regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(v, _)| v)
    }

    /// Remaining quiet time, for scheduling a repaint. `None` when idle.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, due)| due.saturating_duration_since(now))
    }
}

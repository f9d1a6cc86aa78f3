//! Throttle: at most one emission per fixed interval.

use std::time::Duration;

use tokio::time::Instant;

/// Rate limiter emitting at most one value per interval.
///
/// The first input (or any input arriving a full interval after the last
/// emission) is emitted immediately. Inputs arriving inside the window
/// replace a single pending value that becomes due when the window closes
/// (last-write-wins), so a burst always ends with its final value emitted.
///
/// Emitted values are always historical inputs — the throttle never
/// interpolates.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    /// When the last value was emitted. `None` until the first emission.
    last_emit: Option<Instant>,
    /// Latest input waiting for the current window to close.
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Create a throttle with the given minimum emission interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    /// Submit a new input value.
    ///
    /// Returns `Some(value)` when the value is emitted immediately (outside
    /// the rate window), `None` when it was stored as the pending trailing
    /// value. A stored value becomes due at [`deadline`](Self::deadline)
    /// and is released by [`poll`](Self::poll).
    pub fn submit(&mut self, value: T, now: Instant) -> Option<T> {
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.interval => {
                self.pending = Some(value);
                None
            }
            _ => {
                self.last_emit = Some(now);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// When the pending trailing value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.pending, self.last_emit) {
            (Some(_), Some(last)) => Some(last + self.interval),
            _ => None,
        }
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let deadline = self.deadline()?;
        if now >= deadline {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Mark the current time as an emission without going through
    /// [`submit`](Self::submit).
    ///
    /// Used to seed the throttle when the first value bypasses rate
    /// limiting: subsequent inputs are still held to the interval.
    pub fn mark_emitted(&mut self, now: Instant) {
        self.last_emit = Some(now);
        self.pending = None;
    }

    /// Drop any pending trailing value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a trailing value is waiting for the window to close.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

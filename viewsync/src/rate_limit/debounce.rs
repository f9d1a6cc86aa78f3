//! Debounce: emission only after a quiet period.

use std::time::Duration;

use tokio::time::Instant;

/// Rate limiter emitting only after `delay` of input silence.
///
/// Every new input supersedes the previous pending emission and restarts
/// the quiet-period timer, so the eventual emission always carries the most
/// recent input at the time silence began.
#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

impl<T> Debounce<T> {
    /// Create a debounce with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Submit a new input value, superseding any pending emission.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
    }

    /// When the pending emission becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Release the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Drop any pending emission.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether an emission is waiting for silence.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

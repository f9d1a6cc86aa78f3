//! Two-stage bounds pipeline: throttle, then debounce.
//!
//! Raw movement ticks enter at up to 60/sec. The throttle stage caps them
//! to one update per interval for UI feedback; the debounce stage waits
//! for movement to stop before declaring the bounds "settled". A settled
//! value is surfaced only when it differs structurally from the previous
//! one, so consumers see genuine transitions rather than every timer fire.
//!
//! ```text
//! report_pan ──► Throttle(250ms) ──► throttled ──► Debounce(300ms) ──► settled
//! ```
//!
//! The pipeline is a pure state machine driven by caller-supplied
//! timestamps; the coordinator owns the timers.

use tokio::time::Instant;

use crate::coord::MapBounds;
use crate::rate_limit::{Debounce, Throttle};

use super::config::MapFeedConfig;

/// Chained throttle/debounce state for map bounds.
#[derive(Debug)]
pub struct BoundsPipeline {
    throttle: Throttle<MapBounds>,
    debounce: Debounce<MapBounds>,
    /// Most recent raw bounds, updated on every tick.
    raw: Option<MapBounds>,
    /// Output of the throttle stage.
    throttled: Option<MapBounds>,
    /// Last value surfaced as settled (dedupe reference).
    settled: Option<MapBounds>,
}

impl BoundsPipeline {
    /// Create a pipeline with the given stage timings.
    pub fn new(config: &MapFeedConfig) -> Self {
        Self {
            throttle: Throttle::new(config.throttle_interval),
            debounce: Debounce::new(config.debounce_delay),
            raw: None,
            throttled: None,
            settled: None,
        }
    }

    /// Seed the pipeline with the initial bounds, bypassing both stages.
    ///
    /// Returns the bounds for a single initial settled dispatch. The
    /// throttle window starts at `now`, so movement ticks immediately after
    /// load are already rate limited.
    pub fn seed(&mut self, bounds: MapBounds, now: Instant) -> MapBounds {
        self.raw = Some(bounds);
        self.throttled = Some(bounds);
        self.settled = Some(bounds);
        self.throttle.mark_emitted(now);
        self.debounce.cancel();
        bounds
    }

    /// Feed a raw movement tick into the pipeline.
    ///
    /// Never produces a settled value directly — the debounce stage always
    /// delays — but may advance the throttled value on the leading edge.
    pub fn submit(&mut self, bounds: MapBounds, now: Instant) {
        self.raw = Some(bounds);
        if let Some(passed) = self.throttle.submit(bounds, now) {
            self.throttled = Some(passed);
            self.debounce.submit(passed, now);
        }
    }

    /// Fire any due stage timers and return a newly settled value.
    ///
    /// Returns `Some` only when the debounced value differs structurally
    /// from the last settled value.
    pub fn advance(&mut self, now: Instant) -> Option<MapBounds> {
        if let Some(passed) = self.throttle.poll(now) {
            self.throttled = Some(passed);
            self.debounce.submit(passed, now);
        }
        let candidate = self.debounce.poll(now)?;
        if self.settled == Some(candidate) {
            tracing::debug!(bounds = %candidate, "bounds unchanged, suppressing settled event");
            return None;
        }
        self.settled = Some(candidate);
        Some(candidate)
    }

    /// The earliest pending stage deadline, if any timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.throttle.deadline(), self.debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    /// Most recent raw bounds.
    pub fn raw(&self) -> Option<MapBounds> {
        self.raw
    }

    /// Output of the throttle stage.
    pub fn throttled(&self) -> Option<MapBounds> {
        self.throttled
    }

    /// Last settled bounds.
    pub fn settled(&self) -> Option<MapBounds> {
        self.settled
    }
}

//! Configuration for the map/feed coordinator.

use std::time::Duration;

/// Default throttle interval for raw bounds updates (250ms).
///
/// Bounds flowing out of the throttle stage change at most four times a
/// second, fast enough for UI feedback without re-rendering on every tick.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(250);

/// Default debounce delay before bounds are considered settled (300ms).
///
/// Combined with the throttle stage this puts the settled event between
/// 250ms and 550ms after the last movement tick.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Default minimum zoom applied when selecting a listing from the feed.
///
/// If the map is zoomed out below this level when a feed entry is chosen,
/// the pan request raises the zoom so the marker is identifiable.
pub const DEFAULT_SELECT_ZOOM_THRESHOLD: f64 = 15.0;

/// Configuration for [`MapFeedCoordinator`](super::MapFeedCoordinator).
#[derive(Debug, Clone)]
pub struct MapFeedConfig {
    /// Minimum interval between throttled bounds updates.
    ///
    /// Default: 250ms ([`DEFAULT_THROTTLE_INTERVAL`]).
    pub throttle_interval: Duration,

    /// Quiet period before bounds are considered settled.
    ///
    /// Default: 300ms ([`DEFAULT_DEBOUNCE_DELAY`]).
    pub debounce_delay: Duration,

    /// Zoom level the map is raised to when selecting from the feed.
    ///
    /// Default: 15 ([`DEFAULT_SELECT_ZOOM_THRESHOLD`]).
    pub select_zoom_threshold: f64,
}

impl Default for MapFeedConfig {
    fn default() -> Self {
        Self {
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            select_zoom_threshold: DEFAULT_SELECT_ZOOM_THRESHOLD,
        }
    }
}

impl MapFeedConfig {
    /// Set the throttle interval.
    pub fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    /// Set the debounce delay.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Set the zoom threshold for feed selections.
    pub fn with_select_zoom_threshold(mut self, zoom: f64) -> Self {
        self.select_zoom_threshold = zoom;
        self
    }
}

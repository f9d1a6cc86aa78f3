//! Configuration for the viewport playback controller.

use super::policy::RetryPolicy;

/// Default fraction of element area that must be visible to count as
/// "entered".
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.5;

/// Configuration for
/// [`ViewportPlaybackController`](super::ViewportPlaybackController).
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Fraction of element area that must be visible for viewport entry.
    ///
    /// Default: 0.5 ([`DEFAULT_VISIBILITY_THRESHOLD`]).
    pub visibility_threshold: f64,

    /// Suppress automatic play entirely; visibility tracking (and the
    /// enter/exit callbacks) still occur.
    ///
    /// Default: false.
    pub low_bandwidth_mode: bool,

    /// Request eager buffering while visible and drop back to conservative
    /// buffering when not.
    ///
    /// Default: false.
    pub preload_next: bool,

    /// Retry policy for failed play attempts.
    pub retry: RetryPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            low_bandwidth_mode: false,
            preload_next: false,
            retry: RetryPolicy::default(),
        }
    }
}

impl PlaybackConfig {
    /// Set the visibility threshold (clamped to `[0, 1]`).
    pub fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Enable or disable low-bandwidth mode.
    pub fn with_low_bandwidth_mode(mut self, enabled: bool) -> Self {
        self.low_bandwidth_mode = enabled;
        self
    }

    /// Enable or disable eager preloading while visible.
    pub fn with_preload_next(mut self, enabled: bool) -> Self {
        self.preload_next = enabled;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

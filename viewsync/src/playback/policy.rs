//! Retry policy for transient playback failures.

use std::time::Duration;

/// Default maximum number of automatic retries before requiring manual
/// intervention.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first automatic retry (1 second).
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default multiplier applied to the delay after each failure.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Exponential backoff policy for automatic play retries.
///
/// The attempt counter `n` starts at 1 on the first failure. While
/// `n <= max_retries` a retry is scheduled after
/// `base_delay * multiplier^(n-1)`; once `n` exceeds `max_retries` the
/// error state is terminal and only a manual retry can recover.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of automatic retries. Default: 3.
    pub max_retries: u32,

    /// Delay before the first retry. Default: 1s.
    pub base_delay: Duration,

    /// Multiplier applied to the delay after each failure. Default: 2.0.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry cap and base delay.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    /// Calculate the backoff delay for a failed attempt.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The failure count (1-based: 1 after the first failure)
    ///
    /// # Returns
    ///
    /// The delay before the automatic retry, or `None` when the attempt
    /// count has exhausted the policy.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_retries {
            return None;
        }
        let factor = self.multiplier.powi((attempt - 1) as i32);
        Some(Duration::from_millis(
            (self.base_delay.as_millis() as f64 * factor) as u64,
        ))
    }
}

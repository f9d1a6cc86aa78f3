//! ViewSync - interaction synchronization for listings marketplace UIs.
//!
//! This library coordinates high-frequency, asynchronous UI events (map
//! panning, feed selection, video viewport transitions) into consistent,
//! rate-limited, retry-safe state transitions:
//!
//! - [`rate_limit`]: throttle and debounce primitives (pure,
//!   timestamp-injected state machines).
//! - [`map_feed`]: bidirectional map/feed synchronization with two-stage
//!   rate limiting and cross-view selection/scroll choreography.
//! - [`playback`]: viewport-driven media playback with bounded
//!   exponential-backoff recovery and buffering detection.
//!
//! All waiting is a cancellable tokio timer owned by a driver task; every
//! coordinator/controller cancels its timers on drop, so no scheduled work
//! can outlive its owner.

pub mod coord;
pub mod map_feed;
pub mod playback;
pub mod rate_limit;

//! Viewport-driven media playback.
//!
//! One [`ViewportPlaybackController`] owns one media element's play/pause
//! lifecycle: play on viewport entry, pause on exit, bounded exponential
//! backoff for failed play attempts, and stall/resume buffering tracking.
//!
//! The media element and the visibility source are injected capabilities:
//! the consumer feeds `visibility_changed` fractions in from whatever
//! observer mechanism it has and implements [`MediaElement`] over its
//! player handle. The state machine itself
//! ([`machine::PlaybackMachine`]) is pure and testable without either.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use viewsync::playback::{PlaybackConfig, ViewportPlaybackController};
//!
//! let controller = ViewportPlaybackController::new(
//!     PlaybackConfig::default(),
//!     player,   // Arc<dyn MediaElement>
//!     events,   // Arc<dyn PlaybackEvents>
//! );
//!
//! // From the visibility observer:
//! controller.visibility_changed(0.75);   // enters viewport, play() attempted
//! controller.visibility_changed(0.1);    // exits: pause, retry cancelled
//! ```

mod config;
mod controller;
mod error;
pub mod machine;
mod policy;

pub use config::{PlaybackConfig, DEFAULT_VISIBILITY_THRESHOLD};
pub use controller::{
    MediaElement, NoopPlaybackEvents, PlaybackEvents, ViewportPlaybackController,
};
pub use error::PlaybackError;
pub use machine::{PlaybackState, PreloadMode};
pub use policy::{
    RetryPolicy, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES,
};

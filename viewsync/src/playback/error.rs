//! Error types for playback attempts.

use thiserror::Error;

/// Why a play attempt failed.
///
/// Playback failures are expected, recoverable occurrences — they are
/// stored in the controller's state and drive the retry machinery rather
/// than being propagated as hard errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The platform refused to start playback (autoplay policy).
    #[error("playback blocked by autoplay policy")]
    AutoplayBlocked,

    /// The media source failed (network hiccup, decode error).
    #[error("media source error: {0}")]
    Source(String),

    /// The attempt was aborted by the element before completing.
    #[error("playback aborted: {0}")]
    Aborted(String),
}

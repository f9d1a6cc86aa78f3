//! Viewport playback controller: effect interpreter and retry driver.
//!
//! Wraps the pure [`PlaybackMachine`](super::machine::PlaybackMachine)
//! with the two external capabilities (the media element and the consumer
//! callbacks) and a single driver task that owns the retry timer. The
//! driver's [`CancellationToken`] is cancelled on drop, so a scheduled
//! retry can never fire into a torn-down controller.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::PlaybackConfig;
use super::error::PlaybackError;
use super::machine::{Effect, PlaybackMachine, PlaybackState, PreloadMode};

/// Imperative handle onto one media element.
///
/// Direct play/pause/preload manipulation is external I/O; injecting it
/// keeps the state machine pure and lets tests script failures.
pub trait MediaElement: Send + Sync {
    /// Attempt to start playback.
    fn play(&self) -> Result<(), PlaybackError>;

    /// Pause playback. Cannot fail.
    fn pause(&self);

    /// Change the element's buffering behavior.
    fn set_preload(&self, mode: PreloadMode);
}

/// Viewport enter/exit callbacks, invoked exactly once per threshold edge.
pub trait PlaybackEvents: Send + Sync {
    /// The element's visible fraction crossed the threshold inward.
    fn entered_viewport(&self) {}

    /// The element's visible fraction crossed the threshold outward.
    fn exited_viewport(&self) {}
}

/// Events sink that ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlaybackEvents;

impl PlaybackEvents for NoopPlaybackEvents {}

struct ControllerInner {
    machine: PlaybackMachine,
    /// When the armed retry fires, if any.
    retry_at: Option<Instant>,
}

/// State shared between the public handle and the driver task.
struct Shared {
    inner: Mutex<ControllerInner>,
    element: Arc<dyn MediaElement>,
    events: Arc<dyn PlaybackEvents>,
    /// Wakes the driver when the retry deadline changes.
    wake: Notify,
}

/// Owns one media element's play state, driven by visibility, with bounded
/// automatic recovery from transient playback failures.
///
/// One controller instance per media element; two instances share nothing.
pub struct ViewportPlaybackController {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
}

impl ViewportPlaybackController {
    /// Create a controller and spawn its retry driver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: PlaybackConfig,
        element: Arc<dyn MediaElement>,
        events: Arc<dyn PlaybackEvents>,
    ) -> Self {
        let shared = Arc::new(Shared {
            inner: Mutex::new(ControllerInner {
                machine: PlaybackMachine::new(config),
                retry_at: None,
            }),
            element,
            events,
            wake: Notify::new(),
        });
        let shutdown = CancellationToken::new();

        tokio::spawn(run_driver(Arc::clone(&shared), shutdown.clone()));

        Self { shared, shutdown }
    }

    /// Report a visibility update (visible fraction in `[0, 1]`).
    pub fn visibility_changed(&self, fraction: f64) {
        let effects = self.shared.inner.lock().machine.visibility_changed(fraction);
        apply_effects(&self.shared, effects);
    }

    /// Manual play request.
    pub fn play(&self) {
        let effects = self.shared.inner.lock().machine.request_play();
        apply_effects(&self.shared, effects);
    }

    /// Manual pause request. Always wins over a pending retry.
    pub fn pause(&self) {
        let effects = self.shared.inner.lock().machine.request_pause();
        apply_effects(&self.shared, effects);
    }

    /// Manual retry: clears the error state and reattempts immediately.
    pub fn retry(&self) {
        let effects = self.shared.inner.lock().machine.request_retry();
        apply_effects(&self.shared, effects);
    }

    /// The element reported stalled output.
    pub fn media_stalled(&self) {
        let effects = self.shared.inner.lock().machine.stalled();
        apply_effects(&self.shared, effects);
    }

    /// The element reported it can resume after a stall.
    pub fn media_resumed(&self) {
        let effects = self.shared.inner.lock().machine.resumed();
        apply_effects(&self.shared, effects);
    }

    /// The element reached the end of the media.
    pub fn media_ended(&self) {
        let effects = self.shared.inner.lock().machine.ended();
        apply_effects(&self.shared, effects);
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.shared.inner.lock().machine.state().clone()
    }

    /// Whether the controller is in an error state (spinner/retry UI cue).
    pub fn is_errored(&self) -> bool {
        self.shared.inner.lock().machine.is_errored()
    }

    /// Consecutive failed attempts (0 outside the error state).
    pub fn retry_attempts(&self) -> u32 {
        self.shared.inner.lock().machine.retry_attempts()
    }

    /// Whether the element is currently buffering.
    pub fn is_buffering(&self) -> bool {
        self.shared.inner.lock().machine.is_buffering()
    }

    /// Whether the element is currently inside the viewport.
    pub fn in_viewport(&self) -> bool {
        self.shared.inner.lock().machine.in_viewport()
    }
}

impl Drop for ViewportPlaybackController {
    fn drop(&mut self) {
        // Stops the driver and with it any scheduled retry.
        self.shutdown.cancel();
    }
}

/// Interpret effects, feeding play outcomes back into the machine.
///
/// The machine lock is never held across a call into the element or the
/// consumer callbacks.
fn apply_effects(shared: &Shared, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::Play => {
                let result = shared.element.play();
                let follow = shared.inner.lock().machine.play_result(result);
                queue.extend(follow);
            }
            Effect::Pause => shared.element.pause(),
            Effect::SetPreload(mode) => shared.element.set_preload(mode),
            Effect::ScheduleRetry(delay) => {
                shared.inner.lock().retry_at = Some(Instant::now() + delay);
                shared.wake.notify_one();
            }
            Effect::CancelRetry => {
                shared.inner.lock().retry_at = None;
                shared.wake.notify_one();
            }
            Effect::EnteredViewport => shared.events.entered_viewport(),
            Effect::ExitedViewport => shared.events.exited_viewport(),
        }
    }
}

/// Driver loop: sleep until the armed retry deadline, then reattempt.
async fn run_driver(shared: Arc<Shared>, shutdown: CancellationToken) {
    loop {
        let deadline = shared.inner.lock().retry_at;
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = shared.wake.notified() => {
                // Deadline changed; recompute and go around.
            }
            _ = wait_until(deadline) => {
                let effects = {
                    let mut inner = shared.inner.lock();
                    inner.retry_at = None;
                    inner.machine.retry_due()
                };
                apply_effects(&shared, effects);
            }
        }
    }
    debug!("playback driver stopped");
}

/// Sleep until `deadline`, or forever when no retry is armed.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

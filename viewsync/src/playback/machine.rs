//! Pure playback state machine.
//!
//! The machine owns the play/pause/error state for one media element and
//! expresses all external I/O as [`Effect`] values for the controller to
//! interpret. It performs no timer scheduling and never touches the media
//! element itself, which keeps every transition independently testable.
//!
//! # State Machine
//!
//! ```text
//!                  enter viewport / manual play
//!       Idle ───────────────────────────────────► play attempt
//!                                                      │
//!                        Ok                            │ Err
//!       Playing ◄──────────────────────────────────────┤
//!          │                                           ▼
//!          │ exit viewport / manual pause      Errored(n) ──► retry after
//!          ▼                                           │      base·2^(n-1)
//!       Paused                                         │ n > max_retries
//!                                                      ▼
//!                                              terminal (manual retry only)
//! ```
//!
//! Buffering is an orthogonal flag toggled by stall/resume signals; it
//! never interrupts the machine above.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::config::PlaybackConfig;
use super::error::PlaybackError;

/// Requested element buffering behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadMode {
    /// Buffer ahead aggressively (element is visible).
    Eager,
    /// Keep only minimal data buffered (element is off screen).
    Conservative,
}

/// Top-level playback state of one media element.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    /// No playback requested yet (or playback ended).
    Idle,
    /// The element is playing.
    Playing,
    /// The element is paused.
    Paused,
    /// A play attempt failed; `attempts` counts consecutive failures.
    Errored {
        /// Consecutive failed attempts (1-based).
        attempts: u32,
        /// The most recent failure.
        error: PlaybackError,
    },
}

/// External I/O requested by a transition, interpreted by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Attempt `play()` on the media element and report the result back.
    Play,
    /// Pause the media element.
    Pause,
    /// Change the element's buffering behavior.
    SetPreload(PreloadMode),
    /// Arm the retry timer for this delay.
    ScheduleRetry(Duration),
    /// Disarm any pending retry timer.
    CancelRetry,
    /// The element crossed the visibility threshold inward.
    EnteredViewport,
    /// The element crossed the visibility threshold outward.
    ExitedViewport,
}

/// Pure state machine driving one media element's lifecycle.
#[derive(Debug)]
pub struct PlaybackMachine {
    config: PlaybackConfig,
    state: PlaybackState,
    buffering: bool,
    in_viewport: bool,
}

impl PlaybackMachine {
    /// Create a machine in the `Idle` state, outside the viewport.
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            state: PlaybackState::Idle,
            buffering: false,
            in_viewport: false,
        }
    }

    /// Process a visibility update from the observer capability.
    ///
    /// Only threshold crossings produce effects; repeated updates on the
    /// same side of the threshold are ignored. Entry triggers a fresh play
    /// attempt (any previous error is cleared), exit pauses unconditionally
    /// and abandons a pending retry.
    pub fn visibility_changed(&mut self, fraction: f64) -> Vec<Effect> {
        let visible = fraction >= self.config.visibility_threshold;
        if visible == self.in_viewport {
            return Vec::new();
        }
        self.in_viewport = visible;

        if visible {
            debug!(fraction, "entered viewport");
            let mut effects = vec![Effect::EnteredViewport];
            if self.config.preload_next {
                effects.push(Effect::SetPreload(PreloadMode::Eager));
            }
            if self.config.low_bandwidth_mode {
                debug!("low-bandwidth mode, suppressing automatic play");
            } else if self.state != PlaybackState::Playing {
                // A fresh attempt: a prior error's counter is not preserved
                // across an exit/enter cycle.
                if matches!(self.state, PlaybackState::Errored { .. }) {
                    self.state = PlaybackState::Idle;
                }
                effects.push(Effect::Play);
            }
            effects
        } else {
            debug!(fraction, "exited viewport");
            let mut effects = vec![Effect::ExitedViewport, Effect::CancelRetry, Effect::Pause];
            if self.config.preload_next {
                effects.push(Effect::SetPreload(PreloadMode::Conservative));
            }
            if self.state == PlaybackState::Playing {
                self.state = PlaybackState::Paused;
            }
            effects
        }
    }

    /// Record the outcome of a play attempt.
    pub fn play_result(&mut self, result: Result<(), PlaybackError>) -> Vec<Effect> {
        match result {
            Ok(()) => {
                info!("playback started");
                self.state = PlaybackState::Playing;
                Vec::new()
            }
            Err(error) => {
                let attempts = match &self.state {
                    PlaybackState::Errored { attempts, .. } => attempts + 1,
                    _ => 1,
                };
                self.state = PlaybackState::Errored {
                    attempts,
                    error: error.clone(),
                };
                match self.config.retry.delay_for_attempt(attempts) {
                    Some(delay) => {
                        info!(attempts, ?delay, %error, "play failed, scheduling retry");
                        vec![Effect::ScheduleRetry(delay)]
                    }
                    None => {
                        warn!(attempts, %error, "play failed, retries exhausted");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// The retry timer fired.
    ///
    /// Exit cancels the timer before it can fire, so by construction this
    /// runs only while visible; a stale fire after an exit is abandoned.
    pub fn retry_due(&mut self) -> Vec<Effect> {
        if !self.in_viewport {
            debug!("retry due after viewport exit, abandoning");
            return Vec::new();
        }
        match self.state {
            PlaybackState::Errored { attempts, .. } => {
                info!(attempts, "retrying playback");
                vec![Effect::Play]
            }
            _ => Vec::new(),
        }
    }

    /// Manual play request.
    pub fn request_play(&mut self) -> Vec<Effect> {
        vec![Effect::Play]
    }

    /// Manual pause request. Pause always wins over a pending retry.
    pub fn request_pause(&mut self) -> Vec<Effect> {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
        vec![Effect::CancelRetry, Effect::Pause]
    }

    /// Manual retry: clears the error and reattempts immediately, not
    /// subject to the backoff delay. The counter restarts at 1 on the next
    /// failure.
    pub fn request_retry(&mut self) -> Vec<Effect> {
        if matches!(self.state, PlaybackState::Errored { .. }) {
            info!("manual retry, clearing error state");
            self.state = PlaybackState::Idle;
        }
        vec![Effect::CancelRetry, Effect::Play]
    }

    /// The element reported stalled output.
    pub fn stalled(&mut self) -> Vec<Effect> {
        if !self.buffering {
            debug!("buffering started");
        }
        self.buffering = true;
        Vec::new()
    }

    /// The element reported it can resume.
    pub fn resumed(&mut self) -> Vec<Effect> {
        if self.buffering {
            debug!("buffering ended");
        }
        self.buffering = false;
        Vec::new()
    }

    /// The element reached the end of the media.
    pub fn ended(&mut self) -> Vec<Effect> {
        self.state = PlaybackState::Idle;
        self.buffering = false;
        Vec::new()
    }

    /// Current top-level state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Whether the machine is in an error state.
    pub fn is_errored(&self) -> bool {
        matches!(self.state, PlaybackState::Errored { .. })
    }

    /// Consecutive failed attempts (0 outside the error state).
    pub fn retry_attempts(&self) -> u32 {
        match self.state {
            PlaybackState::Errored { attempts, .. } => attempts,
            _ => 0,
        }
    }

    /// Whether the element is currently buffering (orthogonal to state).
    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    /// Whether the element is currently inside the viewport.
    pub fn in_viewport(&self) -> bool {
        self.in_viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::policy::RetryPolicy;

    fn machine() -> PlaybackMachine {
        PlaybackMachine::new(PlaybackConfig::default())
    }

    fn err() -> PlaybackError {
        PlaybackError::AutoplayBlocked
    }

    #[test]
    fn test_enter_triggers_single_play() {
        let mut m = machine();
        let effects = m.visibility_changed(0.6);
        assert_eq!(effects, vec![Effect::EnteredViewport, Effect::Play]);

        // Same side of the threshold: no new edge
        assert!(m.visibility_changed(0.9).is_empty());
        assert!(m.in_viewport());
    }

    #[test]
    fn test_below_threshold_is_not_an_entry() {
        let mut m = machine();
        assert!(m.visibility_changed(0.4).is_empty());
        assert!(!m.in_viewport());
    }

    #[test]
    fn test_low_bandwidth_suppresses_play_but_tracks_visibility() {
        let mut m = PlaybackMachine::new(PlaybackConfig::default().with_low_bandwidth_mode(true));
        let effects = m.visibility_changed(0.6);
        assert_eq!(effects, vec![Effect::EnteredViewport]);
        assert!(m.in_viewport());
    }

    #[test]
    fn test_preload_toggles_with_visibility() {
        let mut m = PlaybackMachine::new(PlaybackConfig::default().with_preload_next(true));
        let enter = m.visibility_changed(0.6);
        assert!(enter.contains(&Effect::SetPreload(PreloadMode::Eager)));

        let exit = m.visibility_changed(0.2);
        assert!(exit.contains(&Effect::SetPreload(PreloadMode::Conservative)));
    }

    #[test]
    fn test_exit_pauses_and_cancels_retry() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Ok(()));
        assert_eq!(m.state(), &PlaybackState::Playing);

        let effects = m.visibility_changed(0.1);
        assert_eq!(
            effects,
            vec![Effect::ExitedViewport, Effect::CancelRetry, Effect::Pause]
        );
        assert_eq!(m.state(), &PlaybackState::Paused);
    }

    #[test]
    fn test_exit_pauses_even_while_errored() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Err(err()));
        assert!(m.is_errored());

        let effects = m.visibility_changed(0.0);
        assert!(effects.contains(&Effect::Pause));
        assert!(effects.contains(&Effect::CancelRetry));
    }

    #[test]
    fn test_failure_schedules_backoff() {
        let mut m = machine();
        m.visibility_changed(0.6);

        let effects = m.play_result(Err(err()));
        assert_eq!(
            effects,
            vec![Effect::ScheduleRetry(Duration::from_secs(1))]
        );
        assert_eq!(m.retry_attempts(), 1);

        m.retry_due();
        let effects = m.play_result(Err(err()));
        assert_eq!(
            effects,
            vec![Effect::ScheduleRetry(Duration::from_secs(2))]
        );
        assert_eq!(m.retry_attempts(), 2);
    }

    #[test]
    fn test_two_failures_then_success_resets_counter() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Err(err()));
        m.retry_due();
        m.play_result(Err(err()));
        m.retry_due();
        m.play_result(Ok(()));

        assert_eq!(m.state(), &PlaybackState::Playing);
        assert_eq!(m.retry_attempts(), 0);
        assert!(!m.is_errored());
    }

    #[test]
    fn test_exhaustion_is_terminal() {
        let mut m = machine();
        m.visibility_changed(0.6);

        // max_retries = 3: failures 1..=3 schedule, the 4th does not
        for _ in 0..3 {
            let effects = m.play_result(Err(err()));
            assert!(matches!(effects.as_slice(), [Effect::ScheduleRetry(_)]));
            assert_eq!(m.retry_due(), vec![Effect::Play]);
        }
        let effects = m.play_result(Err(err()));
        assert!(effects.is_empty());
        assert_eq!(m.retry_attempts(), 4);
        assert!(m.is_errored());
    }

    #[test]
    fn test_manual_retry_recovers_from_terminal_state() {
        let mut m = machine();
        m.visibility_changed(0.6);
        for _ in 0..4 {
            m.play_result(Err(err()));
        }
        assert!(m.is_errored());

        let effects = m.request_retry();
        assert_eq!(effects, vec![Effect::CancelRetry, Effect::Play]);
        m.play_result(Ok(()));
        assert_eq!(m.state(), &PlaybackState::Playing);
    }

    #[test]
    fn test_manual_retry_restarts_counter() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Err(err()));
        m.play_result(Err(err()));
        assert_eq!(m.retry_attempts(), 2);

        m.request_retry();
        m.play_result(Err(err()));
        assert_eq!(m.retry_attempts(), 1);
    }

    #[test]
    fn test_reentry_makes_fresh_attempt() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Err(err()));
        m.play_result(Err(err()));

        m.visibility_changed(0.0);
        let effects = m.visibility_changed(0.8);
        assert_eq!(effects, vec![Effect::EnteredViewport, Effect::Play]);
        // Counter was not preserved across the exit/enter cycle
        m.play_result(Err(err()));
        assert_eq!(m.retry_attempts(), 1);
    }

    #[test]
    fn test_stale_retry_after_exit_is_abandoned() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Err(err()));
        m.visibility_changed(0.0);

        assert!(m.retry_due().is_empty());
    }

    #[test]
    fn test_buffering_is_orthogonal() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Ok(()));

        assert!(m.stalled().is_empty());
        assert!(m.is_buffering());
        assert_eq!(m.state(), &PlaybackState::Playing);

        assert!(m.resumed().is_empty());
        assert!(!m.is_buffering());
    }

    #[test]
    fn test_ended_returns_to_idle() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Ok(()));
        m.stalled();
        m.ended();

        assert_eq!(m.state(), &PlaybackState::Idle);
        assert!(!m.is_buffering());
    }

    #[test]
    fn test_manual_pause_wins() {
        let mut m = machine();
        m.visibility_changed(0.6);
        m.play_result(Ok(()));

        let effects = m.request_pause();
        assert_eq!(effects, vec![Effect::CancelRetry, Effect::Pause]);
        assert_eq!(m.state(), &PlaybackState::Paused);
    }

    #[test]
    fn test_custom_threshold() {
        let mut m =
            PlaybackMachine::new(PlaybackConfig::default().with_visibility_threshold(0.9));
        assert!(m.visibility_changed(0.8).is_empty());
        assert_eq!(
            m.visibility_changed(0.95),
            vec![Effect::EnteredViewport, Effect::Play]
        );
    }

    #[test]
    fn test_custom_retry_policy_applies() {
        let config = PlaybackConfig::default()
            .with_retry(RetryPolicy::new(1, Duration::from_millis(100)));
        let mut m = PlaybackMachine::new(config);
        m.visibility_changed(0.6);

        let effects = m.play_result(Err(err()));
        assert_eq!(
            effects,
            vec![Effect::ScheduleRetry(Duration::from_millis(100))]
        );
        // Second failure exhausts the single retry
        assert!(m.play_result(Err(err())).is_empty());
    }
}

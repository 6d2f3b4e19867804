//! The playback session: state synchronizer plus command issuing.
//!
//! [`PlayerSession`] owns the [`PlaybackState`], the buffered amount and
//! the last backend error. Backend events flow in through
//! [`PlayerSession::handle_event`]; user intents flow out through a
//! borrowed [`MediaHandle`]. A command never mutates state synchronously,
//! the backend's answer does.

use tracing::{debug, warn};

use crate::handle::MediaHandle;
use crate::playback::{PlaybackEvent, PlaybackState, is_playback_rate};
use crate::seek;

#[derive(Debug, Default)]
pub struct PlayerSession {
    state: PlaybackState,
    /// How far the stream is buffered, in microseconds. Drawn behind the
    /// progress fill; not part of [`PlaybackState`].
    buffered_us: i64,
    /// Last backend error, cleared when playback starts again.
    error: Option<String>,
}

impl PlayerSession {
    pub fn new(autoplay: bool) -> Self {
        Self {
            state: PlaybackState::new(autoplay),
            buffered_us: 0,
            error: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn buffered_us(&self) -> i64 {
        self.buffered_us
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Buffered fraction of the media, 0.0 while the duration is
    /// unknown.
    pub fn buffered_fraction(&self) -> f64 {
        if self.state.duration_us > 0 {
            (self.buffered_us as f64 / self.state.duration_us as f64).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Fold one backend event into the session. Returns true when any
    /// observable value changed, which is when widgets need a repaint.
    pub fn handle_event(&mut self, event: PlaybackEvent) -> bool {
        let mut changed = false;

        match &event {
            PlaybackEvent::Progress { buffered_us } => {
                let buffered_us = (*buffered_us).max(0);
                if self.buffered_us != buffered_us {
                    self.buffered_us = buffered_us;
                    changed = true;
                }
            }
            PlaybackEvent::Error { message } => {
                warn!("playback error: {}", message);
                if self.error.as_deref() != Some(message.as_str()) {
                    self.error = Some(message.clone());
                    changed = true;
                }
            }
            PlaybackEvent::Play | PlaybackEvent::Playing => {
                // Playback resuming means the previous error no longer
                // describes what is on screen.
                if self.error.take().is_some() {
                    changed = true;
                }
            }
            _ => {}
        }

        changed |= self.state.apply(&event);
        debug_assert!(!(self.state.is_playing && self.state.is_waiting));
        changed
    }

    /// Ask the backend to pause when playing, to play otherwise.
    ///
    /// The flags are left untouched here: the transition arrives through
    /// [`Self::handle_event`] once the backend reports it.
    pub fn toggle_play_pause(&self, handle: &dyn MediaHandle) {
        if self.state.is_playing {
            debug!("toggle: requesting pause");
            handle.pause();
        } else {
            debug!("toggle: requesting play");
            handle.play();
        }
    }

    /// Select a playback rate from the fixed menu set.
    ///
    /// Rates outside [`crate::PLAYBACK_RATES`] are rejected without
    /// touching anything. The handle is written only when its current
    /// rate differs, so re-selecting the active menu entry issues no
    /// backend work. Returns true when a write went out.
    pub fn set_playback_rate(&mut self, handle: &dyn MediaHandle, rate: f64) -> bool {
        if !is_playback_rate(rate) {
            warn!("ignoring unsupported playback rate {}", rate);
            return false;
        }

        self.state.playback_rate = rate;
        if handle.playback_rate() == rate {
            return false;
        }

        debug!("applying playback rate {}", rate);
        handle.set_playback_rate(rate);
        true
    }

    /// Seek to a fraction of the media duration, as computed from a
    /// click on the timeline. Out-of-range fractions and an unknown
    /// duration are ignored without a command. Returns true when a seek
    /// was issued.
    pub fn seek_to_fraction(&self, handle: &dyn MediaHandle, fraction: f64) -> bool {
        let duration_us = handle.duration_us();
        let Some(target_us) = seek::seek_target_us(fraction, duration_us) else {
            debug!(
                "ignoring seek: fraction={} duration_us={}",
                fraction, duration_us
            );
            return false;
        };

        debug!("seeking to {}us", target_us);
        handle.seek_to(target_us);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::US_PER_SEC;
    use std::cell::{Cell, RefCell};

    /// Records every command so tests can assert on exactly what was
    /// issued.
    struct RecordingHandle {
        duration_us: Cell<i64>,
        rate: Cell<f64>,
        plays: Cell<u32>,
        pauses: Cell<u32>,
        seeks: RefCell<Vec<i64>>,
        rate_writes: RefCell<Vec<f64>>,
    }

    impl RecordingHandle {
        fn new() -> Self {
            Self {
                duration_us: Cell::new(0),
                rate: Cell::new(1.0),
                plays: Cell::new(0),
                pauses: Cell::new(0),
                seeks: RefCell::new(Vec::new()),
                rate_writes: RefCell::new(Vec::new()),
            }
        }

        fn with_duration(duration_us: i64) -> Self {
            let handle = Self::new();
            handle.duration_us.set(duration_us);
            handle
        }
    }

    impl MediaHandle for RecordingHandle {
        fn play(&self) {
            self.plays.set(self.plays.get() + 1);
        }

        fn pause(&self) {
            self.pauses.set(self.pauses.get() + 1);
        }

        fn seek_to(&self, position_us: i64) {
            self.seeks.borrow_mut().push(position_us);
        }

        fn playback_rate(&self) -> f64 {
            self.rate.get()
        }

        fn set_playback_rate(&self, rate: f64) {
            self.rate.set(rate);
            self.rate_writes.borrow_mut().push(rate);
        }

        fn duration_us(&self) -> i64 {
            self.duration_us.get()
        }
    }

    #[test]
    fn test_toggle_from_paused_requests_play() {
        let session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        session.toggle_play_pause(&handle);

        assert_eq!(handle.plays.get(), 1);
        assert_eq!(handle.pauses.get(), 0);
    }

    #[test]
    fn test_toggle_while_playing_requests_pause() {
        let mut session = PlayerSession::new(false);
        session.handle_event(PlaybackEvent::Playing);
        let handle = RecordingHandle::new();

        session.toggle_play_pause(&handle);

        assert_eq!(handle.plays.get(), 0);
        assert_eq!(handle.pauses.get(), 1);
    }

    #[test]
    fn test_toggle_does_not_mutate_state() {
        // The flag flips when the backend answers, not when the command
        // goes out.
        let session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        session.toggle_play_pause(&handle);

        assert!(!session.state().is_playing);
    }

    #[test]
    fn test_state_follows_backend_answer() {
        let mut session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        session.toggle_play_pause(&handle);
        session.handle_event(PlaybackEvent::Playing);
        assert!(session.state().is_playing);

        session.toggle_play_pause(&handle);
        session.handle_event(PlaybackEvent::Pause);
        assert!(!session.state().is_playing);
    }

    #[test]
    fn test_set_rate_writes_handle_once() {
        let mut session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        assert!(session.set_playback_rate(&handle, 1.5));
        assert!(!session.set_playback_rate(&handle, 1.5));
        assert!(!session.set_playback_rate(&handle, 1.5));

        assert_eq!(*handle.rate_writes.borrow(), vec![1.5]);
        assert_eq!(session.state().playback_rate, 1.5);
    }

    #[test]
    fn test_set_rate_skips_write_when_handle_already_matches() {
        let mut session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        assert!(!session.set_playback_rate(&handle, 1.0));
        assert!(handle.rate_writes.borrow().is_empty());
        assert_eq!(session.state().playback_rate, 1.0);
    }

    #[test]
    fn test_set_rate_rejects_values_outside_menu() {
        let mut session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        assert!(!session.set_playback_rate(&handle, 0.75));
        assert!(!session.set_playback_rate(&handle, 4.0));

        assert!(handle.rate_writes.borrow().is_empty());
        assert_eq!(session.state().playback_rate, 1.0);
    }

    #[test]
    fn test_rate_survives_rate_cycle() {
        let mut session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        session.set_playback_rate(&handle, 2.0);
        session.set_playback_rate(&handle, 1.0);
        session.set_playback_rate(&handle, 2.0);

        assert_eq!(*handle.rate_writes.borrow(), vec![2.0, 1.0, 2.0]);
        assert_eq!(handle.playback_rate(), 2.0);
    }

    #[test]
    fn test_seek_to_fraction_issues_absolute_position() {
        let session = PlayerSession::new(false);
        let handle = RecordingHandle::with_duration(120 * US_PER_SEC);

        assert!(session.seek_to_fraction(&handle, 0.5));
        assert_eq!(*handle.seeks.borrow(), vec![60 * US_PER_SEC]);
    }

    #[test]
    fn test_seek_with_unknown_duration_is_silent() {
        let session = PlayerSession::new(false);
        let handle = RecordingHandle::new();

        assert!(!session.seek_to_fraction(&handle, 0.5));
        assert!(handle.seeks.borrow().is_empty());
    }

    #[test]
    fn test_seek_outside_track_is_silent() {
        let session = PlayerSession::new(false);
        let handle = RecordingHandle::with_duration(120 * US_PER_SEC);

        assert!(!session.seek_to_fraction(&handle, -0.1));
        assert!(!session.seek_to_fraction(&handle, 1.1));
        assert!(handle.seeks.borrow().is_empty());
    }

    #[test]
    fn test_progress_updates_buffered_only() {
        let mut session = PlayerSession::new(false);

        assert!(session.handle_event(PlaybackEvent::Progress {
            buffered_us: 40 * US_PER_SEC,
        }));

        assert_eq!(session.buffered_us(), 40 * US_PER_SEC);
        assert_eq!(*session.state(), PlaybackState::default());
    }

    #[test]
    fn test_buffered_fraction_clamps_past_duration() {
        let mut session = PlayerSession::new(false);
        session.handle_event(PlaybackEvent::TimeUpdate {
            position_us: 0,
            duration_us: 100 * US_PER_SEC,
        });
        session.handle_event(PlaybackEvent::Progress {
            buffered_us: 150 * US_PER_SEC,
        });

        assert_eq!(session.buffered_fraction(), 1.0);
    }

    #[test]
    fn test_error_event_is_recorded_and_clears_flags() {
        let mut session = PlayerSession::new(false);
        session.handle_event(PlaybackEvent::Playing);

        assert!(session.handle_event(PlaybackEvent::Error {
            message: "source unreachable".to_string(),
        }));

        assert_eq!(session.error(), Some("source unreachable"));
        assert!(!session.state().is_playing);
        assert!(!session.state().is_waiting);
    }

    #[test]
    fn test_error_cleared_when_playback_resumes() {
        let mut session = PlayerSession::new(false);
        session.handle_event(PlaybackEvent::Error {
            message: "source unreachable".to_string(),
        });

        assert!(session.handle_event(PlaybackEvent::Playing));
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_handle_event_reports_no_change_for_repeats() {
        let mut session = PlayerSession::new(false);
        assert!(session.handle_event(PlaybackEvent::Playing));
        assert!(!session.handle_event(PlaybackEvent::Playing));

        assert!(session.handle_event(PlaybackEvent::Progress { buffered_us: 10 }));
        assert!(!session.handle_event(PlaybackEvent::Progress { buffered_us: 10 }));
    }
}

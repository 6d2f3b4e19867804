//! Playback state machine.
//!
//! [`PlaybackState`] mirrors what the media backend reports and nothing
//! else: commands never mutate it directly, they go out through the
//! handle and the resulting transition comes back as a
//! [`PlaybackEvent`]. The session folds events in with
//! [`PlaybackState::apply`].

/// The playback speeds offered by the rate menu. Rate selection rejects
/// anything not in this list.
pub const PLAYBACK_RATES: [f64; 3] = [1.0, 1.5, 2.0];

/// True when `rate` is one of [`PLAYBACK_RATES`].
pub fn is_playback_rate(rate: f64) -> bool {
    PLAYBACK_RATES.iter().any(|r| *r == rate)
}

/// Display label for a rate menu entry, e.g. `1.5x`. Always one decimal
/// so the entries line up in the menu.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}x", rate)
}

/// A lifecycle event reported by the media backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Playback stalled waiting for data.
    Waiting,
    /// Playback was requested; frames may not be flowing yet.
    Play,
    /// Frames are actually advancing.
    Playing,
    Pause,
    /// More of the stream has been buffered. Feeds the timeline's buffer
    /// fill only; [`PlaybackState`] ignores it.
    Progress { buffered_us: i64 },
    /// Clock tick from the backend. `duration_us` is 0 while the media
    /// length is still unknown.
    TimeUpdate { position_us: i64, duration_us: i64 },
    /// The backend failed. The message is what gets surfaced to the
    /// user, so it should already be human-readable.
    Error { message: String },
}

/// Snapshot of playback as last reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Stalled on buffering. Never true together with `is_playing`.
    pub is_waiting: bool,
    /// Current speed multiplier, always a member of [`PLAYBACK_RATES`].
    pub playback_rate: f64,
    /// Media length in microseconds, 0 while unknown.
    pub duration_us: i64,
    /// Playhead position in microseconds. Once a duration is known the
    /// position is clamped into `0..=duration_us`.
    pub position_us: i64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl PlaybackState {
    /// Initial state before the first backend event. With `autoplay` the
    /// player starts in the playing state so the controls render the
    /// pause affordance immediately.
    pub fn new(autoplay: bool) -> Self {
        Self {
            is_playing: autoplay,
            is_waiting: false,
            playback_rate: 1.0,
            duration_us: 0,
            position_us: 0,
        }
    }

    /// Fold one backend event into the state. Returns true when any
    /// field changed.
    ///
    /// `Progress` carries no state here; `Error` clears both activity
    /// flags (the session records the message itself).
    pub fn apply(&mut self, event: &PlaybackEvent) -> bool {
        let before = self.clone();

        match event {
            PlaybackEvent::Waiting => {
                self.is_playing = false;
                self.is_waiting = true;
            }
            PlaybackEvent::Play | PlaybackEvent::Playing => {
                self.is_waiting = false;
                self.is_playing = true;
            }
            PlaybackEvent::Pause | PlaybackEvent::Error { .. } => {
                self.is_playing = false;
                self.is_waiting = false;
            }
            PlaybackEvent::Progress { .. } => {}
            PlaybackEvent::TimeUpdate {
                position_us,
                duration_us,
            } => {
                self.is_waiting = false;
                self.duration_us = (*duration_us).max(0);
                self.position_us = if self.duration_us > 0 {
                    (*position_us).clamp(0, self.duration_us)
                } else {
                    (*position_us).max(0)
                };
            }
        }

        *self != before
    }

    /// Played fraction of the media, 0.0 while the duration is unknown.
    pub fn progress_fraction(&self) -> f64 {
        if self.duration_us > 0 {
            self.position_us as f64 / self.duration_us as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::US_PER_SEC;

    fn playing_state() -> PlaybackState {
        let mut state = PlaybackState::default();
        state.apply(&PlaybackEvent::Playing);
        state
    }

    #[test]
    fn test_initial_state() {
        let state = PlaybackState::new(false);
        assert!(!state.is_playing);
        assert!(!state.is_waiting);
        assert_eq!(state.playback_rate, 1.0);
        assert_eq!(state.duration_us, 0);
        assert_eq!(state.position_us, 0);
    }

    #[test]
    fn test_initial_state_with_autoplay() {
        let state = PlaybackState::new(true);
        assert!(state.is_playing);
        assert!(!state.is_waiting);
    }

    #[test]
    fn test_waiting_clears_playing() {
        let mut state = playing_state();
        assert!(state.apply(&PlaybackEvent::Waiting));
        assert!(!state.is_playing);
        assert!(state.is_waiting);
    }

    #[test]
    fn test_play_and_playing_clear_waiting() {
        for event in [PlaybackEvent::Play, PlaybackEvent::Playing] {
            let mut state = PlaybackState::default();
            state.apply(&PlaybackEvent::Waiting);
            assert!(state.apply(&event));
            assert!(state.is_playing);
            assert!(!state.is_waiting);
        }
    }

    #[test]
    fn test_pause_clears_both_flags() {
        let mut state = playing_state();
        assert!(state.apply(&PlaybackEvent::Pause));
        assert!(!state.is_playing);
        assert!(!state.is_waiting);
    }

    #[test]
    fn test_error_clears_both_flags() {
        let mut state = playing_state();
        assert!(state.apply(&PlaybackEvent::Error {
            message: "decode failed".to_string(),
        }));
        assert!(!state.is_playing);
        assert!(!state.is_waiting);
    }

    #[test]
    fn test_time_update_stores_clock() {
        let mut state = PlaybackState::default();
        assert!(state.apply(&PlaybackEvent::TimeUpdate {
            position_us: 30 * US_PER_SEC,
            duration_us: 120 * US_PER_SEC,
        }));
        assert_eq!(state.position_us, 30 * US_PER_SEC);
        assert_eq!(state.duration_us, 120 * US_PER_SEC);
    }

    #[test]
    fn test_time_update_clamps_position_to_duration() {
        let mut state = PlaybackState::default();
        state.apply(&PlaybackEvent::TimeUpdate {
            position_us: 150 * US_PER_SEC,
            duration_us: 120 * US_PER_SEC,
        });
        assert_eq!(state.position_us, 120 * US_PER_SEC);

        state.apply(&PlaybackEvent::TimeUpdate {
            position_us: -3,
            duration_us: 120 * US_PER_SEC,
        });
        assert_eq!(state.position_us, 0);
    }

    #[test]
    fn test_time_update_without_duration_keeps_raw_position() {
        let mut state = PlaybackState::default();
        state.apply(&PlaybackEvent::TimeUpdate {
            position_us: 5 * US_PER_SEC,
            duration_us: 0,
        });
        assert_eq!(state.position_us, 5 * US_PER_SEC);
        assert_eq!(state.duration_us, 0);
    }

    #[test]
    fn test_time_update_ends_waiting() {
        let mut state = PlaybackState::default();
        state.apply(&PlaybackEvent::Waiting);
        state.apply(&PlaybackEvent::TimeUpdate {
            position_us: 0,
            duration_us: 0,
        });
        assert!(!state.is_waiting);
    }

    #[test]
    fn test_progress_does_not_touch_state() {
        let mut state = playing_state();
        let before = state.clone();
        assert!(!state.apply(&PlaybackEvent::Progress {
            buffered_us: 40 * US_PER_SEC,
        }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_waiting_then_time_update_then_playing() {
        // Stall, tick, recover: the tick already ends the waiting state,
        // the playing event then restores playback.
        let mut state = PlaybackState::default();
        state.apply(&PlaybackEvent::Waiting);
        state.apply(&PlaybackEvent::TimeUpdate {
            position_us: 30 * US_PER_SEC,
            duration_us: 120 * US_PER_SEC,
        });
        state.apply(&PlaybackEvent::Playing);

        assert!(state.is_playing);
        assert!(!state.is_waiting);
        assert_eq!(state.position_us, 30 * US_PER_SEC);
        assert_eq!(state.duration_us, 120 * US_PER_SEC);
    }

    #[test]
    fn test_flags_stay_mutually_exclusive() {
        let events = [
            PlaybackEvent::Waiting,
            PlaybackEvent::Play,
            PlaybackEvent::Playing,
            PlaybackEvent::Pause,
            PlaybackEvent::Progress { buffered_us: 1 },
            PlaybackEvent::TimeUpdate {
                position_us: 1,
                duration_us: 2,
            },
            PlaybackEvent::Error {
                message: "x".to_string(),
            },
        ];

        for first in &events {
            for second in &events {
                let mut state = PlaybackState::default();
                state.apply(first);
                state.apply(second);
                assert!(
                    !(state.is_playing && state.is_waiting),
                    "{:?} then {:?} left both flags set",
                    first,
                    second
                );
            }
        }
    }

    #[test]
    fn test_apply_reports_no_change_for_repeat_events() {
        let mut state = playing_state();
        assert!(!state.apply(&PlaybackEvent::Playing));

        let mut state = PlaybackState::default();
        assert!(!state.apply(&PlaybackEvent::Pause));
    }

    #[test]
    fn test_progress_fraction() {
        let mut state = PlaybackState::default();
        assert_eq!(state.progress_fraction(), 0.0);

        state.apply(&PlaybackEvent::TimeUpdate {
            position_us: 30 * US_PER_SEC,
            duration_us: 120 * US_PER_SEC,
        });
        assert_eq!(state.progress_fraction(), 0.25);
    }

    #[test]
    fn test_is_playback_rate() {
        assert!(is_playback_rate(1.0));
        assert!(is_playback_rate(1.5));
        assert!(is_playback_rate(2.0));
        assert!(!is_playback_rate(0.5));
        assert!(!is_playback_rate(1.25));
        assert!(!is_playback_rate(3.0));
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1.0), "1.0x");
        assert_eq!(format_rate(1.5), "1.5x");
        assert_eq!(format_rate(2.0), "2.0x");
    }
}

//! Integration tests driving a full playback session the way the
//! application does: commands against a handle, backend answers folded
//! back in as events.

use std::cell::{Cell, RefCell};

use vibeplayer_core::timecode::US_PER_SEC;
use vibeplayer_core::{MediaHandle, PlaybackEvent, PlayerSession};

/// Test double standing in for the media pipeline. Records every
/// command and mimics the pipeline's rate cache.
struct FakePipeline {
    duration_us: Cell<i64>,
    rate: Cell<f64>,
    commands: RefCell<Vec<String>>,
}

impl FakePipeline {
    fn new(duration_secs: i64) -> Self {
        Self {
            duration_us: Cell::new(duration_secs * US_PER_SEC),
            rate: Cell::new(1.0),
            commands: RefCell::new(Vec::new()),
        }
    }

    fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl MediaHandle for FakePipeline {
    fn play(&self) {
        self.commands.borrow_mut().push("play".to_string());
    }

    fn pause(&self) {
        self.commands.borrow_mut().push("pause".to_string());
    }

    fn seek_to(&self, position_us: i64) {
        self.commands
            .borrow_mut()
            .push(format!("seek:{}", position_us));
    }

    fn playback_rate(&self) -> f64 {
        self.rate.get()
    }

    fn set_playback_rate(&self, rate: f64) {
        self.rate.set(rate);
        self.commands.borrow_mut().push(format!("rate:{}", rate));
    }

    fn duration_us(&self) -> i64 {
        self.duration_us.get()
    }
}

#[test]
fn test_full_watch_session() {
    let pipeline = FakePipeline::new(120);
    let mut session = PlayerSession::new(false);

    // User presses play; the backend buffers first, then starts.
    session.toggle_play_pause(&pipeline);
    session.handle_event(PlaybackEvent::Waiting);
    assert!(session.state().is_waiting);

    session.handle_event(PlaybackEvent::Progress {
        buffered_us: 20 * US_PER_SEC,
    });
    session.handle_event(PlaybackEvent::Playing);
    assert!(session.state().is_playing);
    assert!(!session.state().is_waiting);

    // Clock ticks arrive.
    session.handle_event(PlaybackEvent::TimeUpdate {
        position_us: 5 * US_PER_SEC,
        duration_us: 120 * US_PER_SEC,
    });
    assert_eq!(session.state().position_us, 5 * US_PER_SEC);

    // User speeds up, then scrubs to the middle.
    session.set_playback_rate(&pipeline, 1.5);
    session.seek_to_fraction(&pipeline, 0.5);

    // User pauses; backend confirms.
    session.toggle_play_pause(&pipeline);
    session.handle_event(PlaybackEvent::Pause);
    assert!(!session.state().is_playing);

    assert_eq!(
        pipeline.commands(),
        vec![
            "play".to_string(),
            "rate:1.5".to_string(),
            format!("seek:{}", 60 * US_PER_SEC),
            "pause".to_string(),
        ]
    );
    // The chosen rate survives the pause.
    assert_eq!(session.state().playback_rate, 1.5);
}

#[test]
fn test_buffering_stall_and_recovery() {
    let pipeline = FakePipeline::new(300);
    let mut session = PlayerSession::new(true);

    session.handle_event(PlaybackEvent::Playing);
    session.handle_event(PlaybackEvent::TimeUpdate {
        position_us: 30 * US_PER_SEC,
        duration_us: 300 * US_PER_SEC,
    });

    // Network hiccup: stall, partial buffer reports, then recovery.
    session.handle_event(PlaybackEvent::Waiting);
    assert!(session.state().is_waiting);
    assert!(!session.state().is_playing);

    session.handle_event(PlaybackEvent::Progress {
        buffered_us: 45 * US_PER_SEC,
    });
    assert!(session.state().is_waiting, "buffer report keeps the stall");

    session.handle_event(PlaybackEvent::Playing);
    assert!(session.state().is_playing);
    assert!(!session.state().is_waiting);

    // Position survived the stall untouched.
    assert_eq!(session.state().position_us, 30 * US_PER_SEC);
    assert_eq!(session.buffered_us(), 45 * US_PER_SEC);
    assert!(pipeline.commands().is_empty(), "recovery needed no command");
}

#[test]
fn test_repeated_rate_selection_stays_idempotent() {
    let pipeline = FakePipeline::new(60);
    let mut session = PlayerSession::new(false);

    for _ in 0..3 {
        session.set_playback_rate(&pipeline, 2.0);
    }

    let rate_commands: Vec<_> = pipeline
        .commands()
        .into_iter()
        .filter(|c| c.starts_with("rate:"))
        .collect();
    assert_eq!(rate_commands, vec!["rate:2"]);
}

#[test]
fn test_seek_before_duration_known_is_dropped() {
    let pipeline = FakePipeline::new(0);
    let session = PlayerSession::new(false);

    assert!(!session.seek_to_fraction(&pipeline, 0.5));
    assert!(pipeline.commands().is_empty());
}

#[test]
fn test_error_surfaces_and_clears_on_retry() {
    let pipeline = FakePipeline::new(120);
    let mut session = PlayerSession::new(false);

    session.handle_event(PlaybackEvent::Playing);
    session.handle_event(PlaybackEvent::Error {
        message: "Could not read from resource".to_string(),
    });

    assert_eq!(session.error(), Some("Could not read from resource"));
    assert!(!session.state().is_playing);

    // The toggle now requests play again since playback stopped.
    session.toggle_play_pause(&pipeline);
    assert_eq!(pipeline.commands(), vec!["play"]);

    session.handle_event(PlaybackEvent::Playing);
    assert_eq!(session.error(), None);
    assert!(session.state().is_playing);
}

#[test]
fn test_looped_playback_restart() {
    // End of stream with looping: the app seeks back to zero and keeps
    // playing. The session only sees the resulting events.
    let pipeline = FakePipeline::new(90);
    let mut session = PlayerSession::new(true);

    session.handle_event(PlaybackEvent::Playing);
    session.handle_event(PlaybackEvent::TimeUpdate {
        position_us: 90 * US_PER_SEC,
        duration_us: 90 * US_PER_SEC,
    });

    session.seek_to_fraction(&pipeline, 0.0);
    session.handle_event(PlaybackEvent::TimeUpdate {
        position_us: 0,
        duration_us: 90 * US_PER_SEC,
    });

    assert_eq!(pipeline.commands(), vec!["seek:0"]);
    assert!(session.state().is_playing);
    assert_eq!(session.state().position_us, 0);
}

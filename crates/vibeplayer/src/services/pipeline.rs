//! GStreamer playback pipeline.
//!
//! Wraps a `playbin` element behind [`MediaHandle`] and translates bus
//! traffic into [`PlaybackEvent`]s. Everything here runs on the GTK main
//! thread; the bus watch and the position timer are detached on drop.
//!
//! Rate handling is the one quirk worth knowing: GStreamer carries the
//! playback rate inside seek events, so changing speed means issuing a
//! flushing seek to the current position with the new rate. The last
//! applied rate is cached here; that cache is what makes re-selecting
//! the active rate free.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use gstreamer as gst;
use gstreamer::prelude::*;
use gtk4::{gdk, glib};
use tracing::{debug, info, warn};

use vibeplayer_core::error::{Error, Result};
use vibeplayer_core::{MediaHandle, PlaybackEvent};

/// Interval between position/duration polls.
const POSITION_POLL_INTERVAL: Duration = Duration::from_millis(500);

type EventCallback = Rc<dyn Fn(PlaybackEvent)>;

/// Resolve a config/CLI source string to a URI playbin accepts.
///
/// Anything with a scheme passes through; everything else is treated as
/// a local path and must exist.
pub fn source_to_uri(source: &str) -> Result<String> {
    if source.contains("://") {
        return Ok(source.to_string());
    }

    let path = std::fs::canonicalize(source)
        .map_err(|e| Error::Media(format!("cannot access '{}': {}", source, e)))?;
    glib::filename_to_uri(&path, None)
        .map(|uri| uri.to_string())
        .map_err(|e| Error::Media(format!("invalid media path '{}': {}", source, e)))
}

/// The playback backend.
///
/// Owns the playbin, the GTK paintable the sink renders into, and the
/// watchers that translate pipeline activity into events.
pub struct Pipeline {
    playbin: gst::Element,
    /// What the video widget draws. Lives as long as the sink.
    paintable: gdk::Paintable,
    /// Last rate applied through a seek.
    rate: Cell<f64>,
    /// Whether the user wants playback running. Survives the internal
    /// pauses buffering forces on the pipeline.
    intent_playing: Cell<bool>,
    /// True while paused internally for a buffering stall.
    buffering: Cell<bool>,
    /// Restart from zero on end of stream.
    loop_playback: Cell<bool>,
    duration_us: Cell<i64>,
    events: EventCallback,
    bus_watch: RefCell<Option<gst::bus::BusWatchGuard>>,
    poll_source: RefCell<Option<glib::SourceId>>,
}

impl Pipeline {
    /// Build the pipeline. Fails when GStreamer can't initialize or the
    /// required elements (playbin, the GTK4 video sink) are missing.
    pub fn new(events: EventCallback, muted: bool, loop_playback: bool) -> Result<Rc<Self>> {
        gst::init().map_err(|e| Error::Media(format!("failed to initialize GStreamer: {}", e)))?;

        let playbin = gst::ElementFactory::make("playbin")
            .name("vibeplayer")
            .build()
            .map_err(|_| {
                Error::Media("playbin element unavailable; check the GStreamer installation".into())
            })?;

        // The gtk4 sink ships separately from core GStreamer, so treat
        // its absence as a user-facing error rather than a crash.
        let video_sink = gst::ElementFactory::make("gtk4paintablesink")
            .build()
            .map_err(|_| {
                Error::Media(
                    "gtk4paintablesink element not found; install the GStreamer GTK4 plugin"
                        .into(),
                )
            })?;

        let paintable = video_sink.property::<gdk::Paintable>("paintable");
        playbin.set_property("video-sink", &video_sink);
        playbin.set_property("mute", muted);

        let pipeline = Rc::new(Self {
            playbin,
            paintable,
            rate: Cell::new(1.0),
            intent_playing: Cell::new(false),
            buffering: Cell::new(false),
            loop_playback: Cell::new(loop_playback),
            duration_us: Cell::new(0),
            events,
            bus_watch: RefCell::new(None),
            poll_source: RefCell::new(None),
        });

        pipeline.attach_bus_watch()?;
        pipeline.start_position_poll();

        Ok(pipeline)
    }

    /// The paintable the video widget renders.
    pub fn paintable(&self) -> gdk::Paintable {
        self.paintable.clone()
    }

    /// Point the pipeline at a new URI and preroll it. With `autoplay`
    /// (or when playback was already running) the stream starts
    /// immediately, otherwise it holds on the first frame.
    pub fn set_uri(&self, uri: &str, autoplay: bool) {
        info!("Loading media: {}", uri);

        // playbin only accepts a new uri in NULL/READY
        let _ = self.playbin.set_state(gst::State::Null);
        self.buffering.set(false);
        self.duration_us.set(0);
        self.rate.set(1.0);
        self.playbin.set_property("uri", uri);

        if autoplay || self.intent_playing.get() {
            self.intent_playing.set(true);
            self.start_or_report();
        } else if let Err(e) = self.playbin.set_state(gst::State::Paused) {
            warn!("Failed to preroll pipeline: {}", e);
            self.emit(PlaybackEvent::Error {
                message: format!("failed to open media: {}", e),
            });
        }
    }

    /// Mute or unmute audio. Takes effect immediately.
    pub fn set_muted(&self, muted: bool) {
        self.playbin.set_property("mute", muted);
    }

    pub fn set_loop(&self, loop_playback: bool) {
        self.loop_playback.set(loop_playback);
    }

    fn emit(&self, event: PlaybackEvent) {
        (self.events)(event);
    }

    fn attach_bus_watch(self: &Rc<Self>) -> Result<()> {
        let bus = self
            .playbin
            .bus()
            .ok_or_else(|| Error::Media("pipeline has no message bus".into()))?;

        let weak = Rc::downgrade(self);
        let guard = bus
            .add_watch_local(move |_bus, message| {
                if let Some(pipeline) = weak.upgrade() {
                    pipeline.handle_bus_message(message);
                }
                glib::ControlFlow::Continue
            })
            .map_err(|e| Error::Media(format!("failed to attach bus watch: {}", e)))?;

        *self.bus_watch.borrow_mut() = Some(guard);
        Ok(())
    }

    fn start_position_poll(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let source = glib::timeout_add_local(POSITION_POLL_INTERVAL, move || {
            let Some(pipeline) = weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            pipeline.emit_time_update();
            pipeline.emit_buffered();
            glib::ControlFlow::Continue
        });
        *self.poll_source.borrow_mut() = Some(source);
    }

    fn handle_bus_message(&self, message: &gst::Message) {
        use gst::MessageView;

        match message.view() {
            MessageView::Buffering(buffering) => {
                let percent = buffering.percent();
                if percent < 100 {
                    if !self.buffering.get() {
                        debug!("Buffering stall ({}%)", percent);
                        self.buffering.set(true);
                        // Hold the pipeline so the sink doesn't starve
                        // while the buffer refills.
                        let _ = self.playbin.set_state(gst::State::Paused);
                        self.emit(PlaybackEvent::Waiting);
                    }
                } else if self.buffering.get() {
                    debug!("Buffering complete");
                    self.buffering.set(false);
                    if self.intent_playing.get() {
                        let _ = self.playbin.set_state(gst::State::Playing);
                    } else {
                        // The user paused during the stall; settle there.
                        self.emit(PlaybackEvent::Pause);
                    }
                }
            }
            MessageView::StateChanged(state_changed) => {
                // Only the playbin's own transitions matter, not the
                // per-element churn inside it.
                if message.src() == Some(self.playbin.upcast_ref::<gst::Object>()) {
                    match state_changed.current() {
                        gst::State::Playing => self.emit(PlaybackEvent::Playing),
                        gst::State::Paused => {
                            // The internal buffering pause already shows
                            // as waiting; don't overwrite it.
                            if !self.buffering.get() {
                                self.emit(PlaybackEvent::Pause);
                            }
                        }
                        _ => {}
                    }
                }
            }
            MessageView::Eos(..) => {
                debug!("End of stream");
                if self.loop_playback.get() {
                    self.flushing_seek(0);
                    let _ = self.playbin.set_state(gst::State::Playing);
                } else {
                    self.intent_playing.set(false);
                    let _ = self.playbin.set_state(gst::State::Paused);
                    self.emit(PlaybackEvent::Pause);
                }
            }
            MessageView::Error(err) => {
                let message = err.error().to_string();
                warn!(
                    "Pipeline error from {:?}: {} ({:?})",
                    err.src().map(|s| s.path_string()),
                    message,
                    err.debug()
                );
                self.intent_playing.set(false);
                let _ = self.playbin.set_state(gst::State::Null);
                self.emit(PlaybackEvent::Error { message });
            }
            MessageView::DurationChanged(_) | MessageView::AsyncDone(_) => {
                // New duration, or a seek just completed: snap the clock
                // now instead of waiting for the next poll tick.
                self.emit_time_update();
            }
            _ => {}
        }
    }

    fn emit_time_update(&self) {
        let duration_us = self
            .playbin
            .query_duration::<gst::ClockTime>()
            .map(|t| t.useconds() as i64)
            .unwrap_or(0);
        self.duration_us.set(duration_us);

        let Some(position) = self.playbin.query_position::<gst::ClockTime>() else {
            return;
        };

        self.emit(PlaybackEvent::TimeUpdate {
            position_us: position.useconds() as i64,
            duration_us,
        });
    }

    fn emit_buffered(&self) {
        let duration_us = self.duration_us.get();
        if duration_us <= 0 {
            return;
        }

        let mut query = gst::query::Buffering::new(gst::Format::Time);
        let buffered_us = if self.playbin.query(&mut query) {
            match query.range().1 {
                gst::GenericFormattedValue::Time(Some(stop)) => stop.useconds() as i64,
                _ => duration_us,
            }
        } else {
            // No buffering machinery in the pipeline (local files):
            // the whole stream is available.
            duration_us
        };

        self.emit(PlaybackEvent::Progress { buffered_us });
    }

    /// All seeks are flushing and carry the cached rate, because a plain
    /// seek would silently reset the rate to 1.0.
    fn flushing_seek(&self, position_us: i64) {
        let position = gst::ClockTime::from_useconds(position_us.max(0) as u64);
        let result = self.playbin.seek(
            self.rate.get(),
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            gst::SeekType::Set,
            position,
            gst::SeekType::End,
            gst::ClockTime::ZERO,
        );
        if let Err(e) = result {
            warn!("Seek to {}us failed: {}", position_us, e);
        }
    }

    fn start_or_report(&self) {
        match self.playbin.set_state(gst::State::Playing) {
            // Async means the pipeline accepted the request and is still
            // prerolling; report that playback is underway.
            Ok(gst::StateChangeSuccess::Async) => self.emit(PlaybackEvent::Play),
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to start playback: {}", e);
                self.emit(PlaybackEvent::Error {
                    message: format!("failed to start playback: {}", e),
                });
            }
        }
    }
}

impl MediaHandle for Pipeline {
    fn play(&self) {
        self.intent_playing.set(true);
        self.start_or_report();
    }

    fn pause(&self) {
        self.intent_playing.set(false);
        if let Err(e) = self.playbin.set_state(gst::State::Paused) {
            warn!("Failed to pause pipeline: {}", e);
        }
    }

    fn seek_to(&self, position_us: i64) {
        self.flushing_seek(position_us);
    }

    fn playback_rate(&self) -> f64 {
        self.rate.get()
    }

    fn set_playback_rate(&self, rate: f64) {
        let position_us = self
            .playbin
            .query_position::<gst::ClockTime>()
            .map(|t| t.useconds() as i64)
            .unwrap_or(0);
        self.rate.set(rate);
        self.flushing_seek(position_us);
    }

    fn duration_us(&self) -> i64 {
        self.duration_us.get()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if let Some(source) = self.poll_source.borrow_mut().take() {
            source.remove();
        }
        // Dropping the guard detaches the bus watch.
        self.bus_watch.borrow_mut().take();
        let _ = self.playbin.set_state(gst::State::Null);
        debug!("Pipeline torn down");
    }
}

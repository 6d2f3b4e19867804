//! Playback service.
//!
//! Owns the [`PlayerSession`] state machine and the GStreamer
//! [`Pipeline`], and fans state snapshots out to the widgets. One
//! instance per GTK main thread, initialized from the loaded config
//! before any widget is built.
//!
//! Pipeline events are routed through an idle source rather than
//! dispatched inline, so a command issued from inside a snapshot
//! callback can never re-enter the session mid-update.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::{gdk, glib};
use tracing::{debug, info, warn};

use vibeplayer_core::config::VideoConfig;
use vibeplayer_core::{PlaybackEvent, PlaybackState, PlayerSession};

use crate::services::callbacks::{CallbackId, Callbacks};
use crate::services::pipeline::{Pipeline, source_to_uri};

thread_local! {
    static PLAYER_SERVICE_INSTANCE: RefCell<Option<Rc<PlayerService>>> =
        const { RefCell::new(None) };
}

/// Immutable view of the playback state handed to subscribers.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub playback: PlaybackState,
    pub buffered_us: i64,
    pub error: Option<String>,
}

pub struct PlayerService {
    session: RefCell<PlayerSession>,
    pipeline: RefCell<Option<Rc<Pipeline>>>,
    /// Source string currently loaded, for reload diffing.
    source: RefCell<Option<String>>,
    /// CLI override; wins over the config source for the whole run.
    source_override: Option<String>,
    video: RefCell<VideoConfig>,
    callbacks: Callbacks<PlayerSnapshot>,
}

impl PlayerService {
    /// Create the global instance and bring up the media pipeline.
    pub fn init_global(video: &VideoConfig, source_override: Option<&str>) {
        let service = PLAYER_SERVICE_INSTANCE.with(|instance| {
            let mut slot = instance.borrow_mut();
            if slot.is_some() {
                warn!("PlayerService already initialized");
                return None;
            }
            let service = Rc::new(Self {
                session: RefCell::new(PlayerSession::new(video.autoplay)),
                pipeline: RefCell::new(None),
                source: RefCell::new(None),
                source_override: source_override.map(String::from),
                video: RefCell::new(video.clone()),
                callbacks: Callbacks::new(),
            });
            *slot = Some(service.clone());
            Some(service)
        });

        if let Some(service) = service {
            service.setup_pipeline();
        }
    }

    /// The shared instance. Panics when called before [`Self::init_global`].
    pub fn global() -> Rc<Self> {
        PLAYER_SERVICE_INSTANCE.with(|instance| {
            instance
                .borrow()
                .clone()
                .expect("PlayerService not initialized")
        })
    }

    fn setup_pipeline(&self) {
        let video = self.video.borrow().clone();
        let events = Rc::new(|event: PlaybackEvent| {
            // Defer to the main loop so commands issued from snapshot
            // callbacks cannot re-enter the session.
            glib::idle_add_local_once(move || {
                PlayerService::global().dispatch_event(event);
            });
        });

        match Pipeline::new(events, video.muted, video.loop_playback) {
            Ok(pipeline) => {
                *self.pipeline.borrow_mut() = Some(pipeline);
                self.load_configured_source();
            }
            Err(e) => {
                warn!("Media pipeline unavailable: {}", e);
                self.dispatch_event(PlaybackEvent::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    fn load_configured_source(&self) {
        let source = self
            .video
            .borrow()
            .effective_source(self.source_override.as_deref());
        match source {
            Some(source) => self.load_source(&source),
            None => info!("No media source configured"),
        }
    }

    /// Load a media source (URI or local path) into the pipeline. The
    /// playback rate snaps back to normal for the new stream.
    pub fn load_source(&self, source: &str) {
        let Some(pipeline) = self.current_pipeline() else {
            return;
        };

        let uri = match source_to_uri(source) {
            Ok(uri) => uri,
            Err(e) => {
                warn!("Cannot load '{}': {}", source, e);
                self.dispatch_event(PlaybackEvent::Error {
                    message: format!("cannot open '{}': {}", source, e),
                });
                return;
            }
        };

        *self.source.borrow_mut() = Some(source.to_string());
        pipeline.set_uri(&uri, self.video.borrow().autoplay);

        let rate_reset = self
            .session
            .borrow_mut()
            .set_playback_rate(pipeline.as_ref(), 1.0);
        if rate_reset {
            self.notify();
        }
    }

    /// Fold one pipeline event into the session and notify subscribers
    /// when anything visible changed.
    pub fn dispatch_event(&self, event: PlaybackEvent) {
        let changed = self.session.borrow_mut().handle_event(event);
        if changed {
            self.notify();
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let session = self.session.borrow();
        PlayerSnapshot {
            playback: session.state().clone(),
            buffered_us: session.buffered_us(),
            error: session.error().map(String::from),
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        self.callbacks.emit(&snapshot);
    }

    /// Subscribe to state snapshots. Widgets read [`Self::snapshot`]
    /// for their initial state and rely on this for every change after.
    pub fn connect(&self, callback: impl Fn(&PlayerSnapshot) + 'static) -> CallbackId {
        self.callbacks.connect(callback)
    }

    pub fn disconnect(&self, id: CallbackId) -> bool {
        self.callbacks.disconnect(id)
    }

    /// Paintable carrying the video frames, once the pipeline exists.
    pub fn paintable(&self) -> Option<gdk::Paintable> {
        self.pipeline.borrow().as_ref().map(|p| p.paintable())
    }

    fn current_pipeline(&self) -> Option<Rc<Pipeline>> {
        self.pipeline.borrow().as_ref().cloned()
    }

    pub fn toggle_play_pause(&self) {
        let Some(pipeline) = self.current_pipeline() else {
            debug!("Toggle ignored; no media pipeline");
            return;
        };
        self.session.borrow().toggle_play_pause(pipeline.as_ref());
    }

    pub fn set_playback_rate(&self, rate: f64) {
        let Some(pipeline) = self.current_pipeline() else {
            return;
        };
        let before = self.session.borrow().state().playback_rate;
        self.session
            .borrow_mut()
            .set_playback_rate(pipeline.as_ref(), rate);
        if self.session.borrow().state().playback_rate != before {
            self.notify();
        }
    }

    pub fn seek_to_fraction(&self, fraction: f64) {
        let Some(pipeline) = self.current_pipeline() else {
            return;
        };
        self.session
            .borrow()
            .seek_to_fraction(pipeline.as_ref(), fraction);
    }

    /// Apply a reloaded video config. Mute and looping change in place;
    /// a changed source swaps the stream unless the CLI pinned one.
    pub fn reconfigure(&self, video: &VideoConfig) {
        let old = self.video.replace(video.clone());
        let Some(pipeline) = self.current_pipeline() else {
            return;
        };

        if old.muted != video.muted {
            info!("Mute {}", if video.muted { "enabled" } else { "disabled" });
            pipeline.set_muted(video.muted);
        }
        if old.loop_playback != video.loop_playback {
            pipeline.set_loop(video.loop_playback);
        }

        let new_source = video.effective_source(self.source_override.as_deref());
        if new_source != *self.source.borrow() {
            match new_source {
                Some(source) => self.load_source(&source),
                None => debug!("Media source removed from config; keeping current stream"),
            }
        }
    }

    /// Tear the pipeline down. Called on application shutdown.
    pub fn shutdown(&self) {
        debug!("Shutting down player service");
        *self.pipeline.borrow_mut() = None;
    }
}

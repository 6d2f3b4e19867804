//! Core logic for vibeplayer.
//!
//! Everything in this crate is independent of GTK and GStreamer: the
//! playback state machine, seek math, timecode formatting, configuration
//! loading and the theme palette. The binary crate owns the pipeline and
//! the widgets; this crate owns the rules they follow.

pub mod config;
pub mod error;
pub mod handle;
pub mod logging;
pub mod playback;
pub mod seek;
pub mod session;
pub mod theme;
pub mod timecode;

pub use config::Config;
pub use error::{Error, Result};
pub use handle::MediaHandle;
pub use playback::{PLAYBACK_RATES, PlaybackEvent, PlaybackState};
pub use session::PlayerSession;
pub use theme::{ThemePalette, ThemeSizes};

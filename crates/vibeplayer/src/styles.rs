//! Shared CSS class constants for vibeplayer.
//!
//! This module centralizes all CSS class names used across the codebase,
//! making them discoverable, avoiding typos, and enabling IDE autocompletion.
//!
//! # Usage
//!
//! ```ignore
//! use crate::styles::{class, color, controls};
//!
//! widget.add_css_class(class::PLAYER_VIEW);
//! label.add_css_class(color::MUTED);
//! button.add_css_class(controls::BUTTON);
//! ```

/// Core structural/layout CSS classes.
pub mod class {
    /// Main application window (`.player-window`).
    pub const PLAYER_WINDOW: &str = "player-window";

    /// Player view overlay root (`.player-view`).
    pub const PLAYER_VIEW: &str = "player-view";

    /// Video picture widget (`.player-video`).
    pub const PLAYER_VIDEO: &str = "player-video";

    /// Centered waiting spinner (`.player-spinner`).
    pub const PLAYER_SPINNER: &str = "player-spinner";
}

/// Foreground/text color classes.
///
/// These apply `color: var(--color-foreground-*)` to text and icons.
pub mod color {
    /// Primary foreground color (`.vp-primary`).
    pub const PRIMARY: &str = "vp-primary";

    /// Muted/secondary foreground color (`.vp-muted`).
    pub const MUTED: &str = "vp-muted";

    /// Accent color (`.vp-accent`).
    pub const ACCENT: &str = "vp-accent";

    /// Error color (`.vp-error`).
    pub const ERROR: &str = "vp-error";
}

/// Button style classes.
pub mod button {
    /// Reset button - strips all GTK chrome (`.vp-btn-reset`).
    ///
    /// Use for buttons that need custom styling without default backgrounds,
    /// borders, shadows, or padding.
    pub const RESET: &str = "vp-btn-reset";
}

/// Control bar classes.
pub mod controls {
    /// Revealer wrapping the control bar (`.controls-reveal`).
    pub const REVEAL: &str = "controls-reveal";

    /// Control bar container (`.controls-bar`).
    pub const BAR: &str = "controls-bar";

    /// Generic control button (`.controls-btn`).
    pub const BUTTON: &str = "controls-btn";

    /// Play/pause button (`.controls-play-btn`).
    pub const PLAY_BUTTON: &str = "controls-play-btn";

    /// Elapsed time label (`.controls-position`).
    pub const POSITION: &str = "controls-position";

    /// Duration label (`.controls-duration`).
    pub const DURATION: &str = "controls-duration";

    /// Rate selector button (`.controls-rate-btn`).
    pub const RATE_BUTTON: &str = "controls-rate-btn";

    /// Rate selector label (`.controls-rate-label`).
    pub const RATE_LABEL: &str = "controls-rate-label";

    /// Icon for paused state (shows play arrow).
    pub const ICON_PLAY: &str = "media-playback-start-symbolic";

    /// Icon for playing state (shows pause bars).
    pub const ICON_PAUSE: &str = "media-playback-pause-symbolic";
}

/// Timeline bar classes.
pub mod timeline {
    /// Timeline drawing area (`.timeline`).
    pub const BAR: &str = "timeline";
}

/// Playback rate menu classes.
pub mod rate {
    /// Rate menu popover (`.rate-menu`).
    pub const MENU: &str = "rate-menu";

    /// Rate menu content container (`.rate-menu-content`).
    pub const MENU_CONTENT: &str = "rate-menu-content";

    /// Menu heading label (`.rate-menu-title`).
    pub const MENU_TITLE: &str = "rate-menu-title";

    /// Selectable rate row (`.rate-menu-item`).
    pub const MENU_ITEM: &str = "rate-menu-item";

    /// Active-rate check icon (`.rate-menu-check`).
    pub const MENU_CHECK: &str = "rate-menu-check";

    /// Rate row label (`.rate-menu-label`).
    pub const MENU_LABEL: &str = "rate-menu-label";

    /// Icon marking the active rate.
    pub const ICON_CHECK: &str = "object-select-symbolic";
}

/// Error banner classes.
pub mod banner {
    /// Error banner container (`.error-banner`).
    pub const ERROR: &str = "error-banner";

    /// Error banner icon (`.error-banner-icon`).
    pub const ERROR_ICON: &str = "error-banner-icon";

    /// Error banner message label (`.error-banner-label`).
    pub const ERROR_LABEL: &str = "error-banner-label";

    /// Icon for the error banner.
    pub const ICON_ERROR: &str = "dialog-error-symbolic";
}

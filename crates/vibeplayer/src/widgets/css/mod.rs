//! CSS for the vibeplayer window and widgets.
//!
//! All styling is generated here and loaded once per config apply:
//! - `utility_css()` - Shared utility classes (colors, button reset, popovers)
//! - `widget_css()` - Widget-specific styling (player surface, control bar)
//!
//! Sizes and colors come in through the CSS variables the theme palette
//! emits, so the submodules stay static strings.
//!
//! CSS is organized into submodules by component:
//! - `base` - Shared utility classes used across all surfaces
//! - `player` - Player window, video surface, spinner, error banner
//! - `controls` - Control bar, timeline, rate menu

mod base;
mod controls;
mod player;

/// Return shared utility CSS.
pub fn utility_css() -> &'static str {
    base::css()
}

/// Generate all widget CSS.
pub fn widget_css() -> String {
    let player_css = player::css();
    let controls_css = controls::css();

    format!("{player_css}\n{controls_css}")
}

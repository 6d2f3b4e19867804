//! Player window implementation using GTK4.

use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, glib};
use std::cell::RefCell;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use vibeplayer_core::{Config, ThemePalette};

use crate::services::state::{self, PersistedState};
use crate::styles::class;
use crate::widgets::{self, PlayerView};

/// Create and configure the main player window.
///
/// Geometry comes from the persisted state file when one exists,
/// falling back to the `[window]` config section on first run.
pub fn create_player_window(app: &Application, config: &Config) -> ApplicationWindow {
    let persisted = state::load();

    let (width, height) = if persisted.window.has_geometry() {
        (persisted.window.width, persisted.window.height)
    } else {
        (config.window.width as i32, config.window.height as i32)
    };

    let window = ApplicationWindow::builder()
        .application(app)
        .title(config.window.title.as_str())
        .default_width(width)
        .default_height(height)
        .build();

    window.add_css_class(class::PLAYER_WINDOW);

    if persisted.window.maximized {
        window.maximize();
    }

    let view = PlayerView::new();
    window.set_child(Some(view.widget()));

    // Attach the view to the window so its Rust-side state (callback
    // ids) stays alive for the lifetime of the window.
    unsafe {
        window.set_data("vibeplayer-player-view", view);
    }

    window.connect_close_request(|win| {
        save_window_state(win);
        glib::Propagation::Proceed
    });

    info!(
        "Player window created: {}x{}{}",
        width,
        height,
        if persisted.window.maximized {
            " (maximized)"
        } else {
            ""
        }
    );

    window
}

/// Persist the window geometry on close.
fn save_window_state(window: &ApplicationWindow) {
    // default_size tracks the last unmaximized size
    let (width, height) = window.default_size();

    let mut persisted = PersistedState::default();
    persisted.window.width = width;
    persisted.window.height = height;
    persisted.window.maximized = window.is_maximized();
    state::save(&persisted);
}

/// Load and apply CSS styling to the application.
pub fn load_css(config: &Config) {
    let provider = gtk4::CssProvider::new();

    // Create theme palette and generate CSS
    let palette = ThemePalette::from_config(config);
    let css = generate_css(&palette);

    // Debug: print theme configuration
    debug!("Generated theme CSS:");
    debug!("  mode = {}", config.theme.mode);
    debug!("  accent_primary = {}", palette.accent_primary);
    debug!("  surface_background = {}", palette.surface_background);

    provider.load_from_string(&css);

    // Apply to default display with USER priority to override GTK themes
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_USER,
        );
        debug!("CSS loaded and applied (dark_mode={})", palette.is_dark_mode);

        // Load user's custom style.css if it exists
        load_user_css(&display);
    } else {
        warn!("No default display available, CSS styling not applied");
    }
}

/// Priority for user CSS - higher than everything else to ensure overrides work.
const USER_CSS_PRIORITY: u32 = gtk4::STYLE_PROVIDER_PRIORITY_USER + 100;

// Thread-local storage for the user CSS provider so we can replace it on reload
thread_local! {
    static USER_CSS_PROVIDER: RefCell<Option<gtk4::CssProvider>> = const { RefCell::new(None) };
}

/// Search paths for user style.css, following XDG conventions.
fn user_css_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. $XDG_CONFIG_HOME/vibeplayer/style.css
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg_config).join("vibeplayer/style.css"));
    }

    // 2. ~/.config/vibeplayer/style.css
    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config/vibeplayer/style.css"));
    }

    // 3. ./style.css (current working directory)
    paths.push(PathBuf::from("style.css"));

    paths
}

/// Find user's style.css file if it exists.
fn find_user_css() -> Option<PathBuf> {
    user_css_search_paths()
        .into_iter()
        .find(|path| path.exists())
}

/// Load user's custom CSS from style.css with highest priority.
fn load_user_css(display: &gtk4::gdk::Display) {
    let Some(path) = find_user_css() else {
        debug!("No user style.css found");
        return;
    };

    match std::fs::read_to_string(&path) {
        Ok(css) => {
            let provider = gtk4::CssProvider::new();
            provider.load_from_string(&css);

            gtk4::style_context_add_provider_for_display(display, &provider, USER_CSS_PRIORITY);

            // Store the provider so we can remove it later on reload
            USER_CSS_PROVIDER.with(|cell| {
                *cell.borrow_mut() = Some(provider);
            });

            info!(
                "Loaded user CSS from: {} (priority={})",
                path.display(),
                USER_CSS_PRIORITY
            );
        }
        Err(e) => {
            warn!("Failed to read user CSS from {}: {}", path.display(), e);
        }
    }
}

/// Reload user's custom CSS (called when style.css file changes).
pub fn reload_user_css() {
    let Some(display) = gtk4::gdk::Display::default() else {
        warn!("No default display available for CSS reload");
        return;
    };

    // Remove the old provider if it exists
    USER_CSS_PROVIDER.with(|cell| {
        if let Some(old_provider) = cell.borrow_mut().take() {
            gtk4::style_context_remove_provider_for_display(&display, &old_provider);
            debug!("Removed old user CSS provider");
        }
    });

    // Load the new CSS
    load_user_css(&display);
}

/// Generate CSS string from the theme palette.
fn generate_css(palette: &ThemePalette) -> String {
    // CSS variables from the theme palette
    let css_vars = palette.css_vars_block();

    // Utility CSS shared across surfaces
    let utility_css = widgets::css::utility_css();

    // Widget-specific CSS
    let widget_css = widgets::css::widget_css();

    format!("{}\n{}\n{}", css_vars, utility_css, widget_css)
}

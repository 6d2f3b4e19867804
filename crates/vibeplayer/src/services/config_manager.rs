//! Configuration manager with live reload support.
//!
//! This service watches the configuration file for changes and coordinates
//! updates across the player when the config changes.
//!
//! ## Architecture
//!
//! - A file watcher thread monitors `config.toml` for modifications.
//! - On change, the new config is parsed and validated.
//! - If valid, changes are dispatched to the GTK main thread via glib::idle_add_once.
//! - The main thread applies changes by diffing old against new config.
//!
//! ## Supported Live Reload
//!
//! - `theme.*`: Updates colors, CSS variables, and timeline painting.
//! - `video.*`: Mute, looping, and source swaps apply in place.
//! - `window.*` changes only take effect on restart.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use gtk4::glib;
use notify_debouncer_mini::{DebounceEventResult, new_debouncer, notify::RecursiveMode};
use tracing::{debug, error, info, warn};

use vibeplayer_core::{Config, ThemePalette, ThemeSizes};

use crate::app;
use crate::services::callbacks::{CallbackId, Callbacks};
use crate::services::player::PlayerService;

/// Debounce interval (in ms) for file change events. Editors often trigger
/// multiple events for a single save; this batches them into one reload.
const FILE_CHANGE_DEBOUNCE_MS: u64 = 300;

/// Messages sent from the file watcher thread to the GTK main thread.
#[derive(Debug)]
pub enum ConfigMessage {
    /// A new valid config was loaded.
    Reloaded(Box<Config>),
    /// Config file changed but failed to load/validate.
    Error(String),
    /// User style.css file changed and should be reloaded.
    StyleCssChanged,
}

/// Send a config message to the main thread via glib::idle_add_once.
fn send_config_message(msg: ConfigMessage) {
    glib::idle_add_once(move || {
        ConfigManager::global().handle_config_message(msg);
    });
}

/// Manages configuration state and live reload.
///
/// This is a singleton service that:
/// - Holds the current configuration
/// - Watches the config file for changes
/// - Coordinates updates to the theme and the player when config changes
pub struct ConfigManager {
    /// Current configuration.
    config: RefCell<Config>,
    /// Path to the config file being watched (if any).
    config_path: RefCell<Option<PathBuf>>,
    /// Widgets that repaint from the palette subscribe here.
    theme_callbacks: Callbacks<ThemePalette>,
    /// Shutdown flag for the file watcher thread.
    shutdown_flag: Arc<AtomicBool>,
}

// Thread-local singleton storage
thread_local! {
    static CONFIG_MANAGER_INSTANCE: RefCell<Option<Rc<ConfigManager>>> = const { RefCell::new(None) };
}

impl ConfigManager {
    /// Create a new ConfigManager with the given initial config.
    fn new(config: Config, config_path: Option<PathBuf>) -> Rc<Self> {
        Rc::new(Self {
            config: RefCell::new(config),
            config_path: RefCell::new(config_path),
            theme_callbacks: Callbacks::new(),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the global ConfigManager singleton.
    ///
    /// Panics if `init_global` hasn't been called.
    pub fn global() -> Rc<Self> {
        CONFIG_MANAGER_INSTANCE.with(|cell| {
            cell.borrow()
                .as_ref()
                .expect("ConfigManager not initialized; call init_global first")
                .clone()
        })
    }

    /// Initialize the global ConfigManager singleton.
    ///
    /// Must be called once during application startup, before `global()` is used.
    pub fn init_global(config: Config, config_path: Option<PathBuf>) {
        CONFIG_MANAGER_INSTANCE.with(|cell| {
            let mut opt = cell.borrow_mut();
            if opt.is_some() {
                warn!("ConfigManager already initialized, ignoring init_global call");
                return;
            }
            *opt = Some(ConfigManager::new(config, config_path));
        });
    }

    /// Compute the theme palette from the current configuration.
    pub fn theme_palette(&self) -> ThemePalette {
        ThemePalette::from_config(&self.config.borrow())
    }

    /// Get the computed control sizes from the current configuration.
    pub fn theme_sizes(&self) -> ThemeSizes {
        self.theme_palette().sizes.clone()
    }

    /// Subscribe to theme changes. The callback runs on the main thread
    /// after a reload changed anything theme-related.
    pub fn on_theme_change(&self, callback: impl Fn(&ThemePalette) + 'static) -> CallbackId {
        self.theme_callbacks.connect(callback)
    }

    /// Remove a theme change subscription. Widgets call this on unmap.
    pub fn disconnect_theme_callback(&self, id: CallbackId) -> bool {
        self.theme_callbacks.disconnect(id)
    }

    /// Start watching the config file for changes.
    ///
    /// This spawns a background thread that monitors the config file. When changes
    /// are detected, the new config is parsed and sent to the GTK main thread.
    ///
    /// Does nothing if no config file path is set (using defaults).
    pub fn start_watching(self: &Rc<Self>) {
        let config_path = self.config_path.borrow().clone();
        let Some(path) = config_path else {
            info!("No config file to watch (using defaults)");
            return;
        };

        if !path.exists() {
            warn!(
                "Config file does not exist, cannot watch: {}",
                path.display()
            );
            return;
        }

        info!("Starting config file watcher for: {}", path.display());

        let watch_path = path.clone();
        let shutdown_flag = self.shutdown_flag.clone();

        thread::spawn(move || {
            Self::run_file_watcher(watch_path, shutdown_flag);
        });
    }

    /// Run the file watcher loop (called on a background thread).
    fn run_file_watcher(path: PathBuf, shutdown_flag: Arc<AtomicBool>) {
        // Debounce events to avoid multiple reloads for a single save
        let debounce_duration = Duration::from_millis(FILE_CHANGE_DEBOUNCE_MS);

        // Canonicalize the path so we can compare with absolute paths from notify
        let path_for_handler = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                error!("Failed to canonicalize config path: {}", e);
                return;
            }
        };

        // Also watch for style.css in the same directory
        let style_css_path = path_for_handler.parent().map(|p| p.join("style.css"));

        let mut debouncer =
            match new_debouncer(debounce_duration, move |res: DebounceEventResult| {
                match res {
                    Ok(events) => {
                        let config_changed = events.iter().any(|e| e.path == path_for_handler);
                        if config_changed {
                            debug!("Config file change detected");
                            Self::reload_and_send(&path_for_handler);
                        }

                        if let Some(ref style_path) = style_css_path {
                            let style_changed = events.iter().any(|e| e.path == *style_path);
                            if style_changed {
                                debug!("User style.css change detected");
                                send_config_message(ConfigMessage::StyleCssChanged);
                            }
                        }
                    }
                    Err(err) => {
                        error!("File watcher error: {}", err);
                    }
                }
            }) {
                Ok(d) => d,
                Err(e) => {
                    error!("Failed to create file watcher: {}", e);
                    return;
                }
            };

        // Watch the config file's parent directory (more reliable than watching
        // the file directly; editors often replace the file on save)
        let canonical_path = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                error!("Failed to canonicalize config path for watching: {}", e);
                return;
            }
        };
        let watch_dir = canonical_path.parent().unwrap_or(&canonical_path);
        if let Err(e) = debouncer
            .watcher()
            .watch(watch_dir, RecursiveMode::NonRecursive)
        {
            error!("Failed to watch config directory: {}", e);
            return;
        }

        info!("File watcher started, watching: {}", watch_dir.display());

        // Keep the thread alive until shutdown is signaled
        while !shutdown_flag.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(500));
        }

        debug!("Config file watcher thread shutting down");
    }

    /// Reload config from file and send result to GTK thread via idle_add_once.
    fn reload_and_send(path: &std::path::Path) {
        match Config::load(path) {
            Ok(new_config) => {
                if let Err(e) = new_config.validate() {
                    let msg = format!("Config validation failed: {}", e);
                    warn!("{}", msg);
                    send_config_message(ConfigMessage::Error(msg));
                    return;
                }

                info!("Config reloaded successfully from: {}", path.display());
                send_config_message(ConfigMessage::Reloaded(Box::new(new_config)));
            }
            Err(e) => {
                let msg = format!("Failed to reload config: {}", e);
                warn!("{}", msg);
                send_config_message(ConfigMessage::Error(msg));
            }
        }
    }

    /// Handle a config message from the file watcher.
    /// Called via glib::idle_add_once from send_config_message.
    pub(crate) fn handle_config_message(&self, msg: ConfigMessage) {
        match msg {
            ConfigMessage::Reloaded(new_config) => {
                self.apply_config(*new_config);
            }
            ConfigMessage::Error(err) => {
                // Just log the error - keep using the old config
                error!("Config reload error: {}", err);
            }
            ConfigMessage::StyleCssChanged => {
                info!("Reloading user style.css...");
                app::reload_user_css();
            }
        }
    }

    /// Apply a new configuration, updating the theme and the player.
    ///
    /// This is the central "fan-out" function that coordinates updates
    /// when the config changes.
    fn apply_config(&self, new_config: Config) {
        let old_config = self.config.borrow().clone();

        info!("Applying new configuration...");

        let theme_changed = config_theme_changed(&old_config, &new_config);
        let video_changed = config_video_changed(&old_config, &new_config);

        if config_window_changed(&old_config, &new_config) {
            info!("Window settings changed; they take effect on restart");
        }

        // Store the new config BEFORE fanning out, so callbacks that read
        // the manager see the new values.
        *self.config.borrow_mut() = new_config.clone();

        if theme_changed {
            info!("Theme configuration changed, updating styles...");
            app::load_css(&new_config);
            let palette = ThemePalette::from_config(&new_config);
            self.theme_callbacks.emit(&palette);
            debug!("Theme styles updated");
        }

        if video_changed {
            info!("Video configuration changed");
            PlayerService::global().reconfigure(&new_config.video);
        }

        info!("Configuration applied successfully");
    }

    /// Stop watching the config file.
    pub fn stop_watching(&self) {
        self.shutdown_flag.store(true, Ordering::Relaxed);
        debug!("Config watcher stopped");
    }
}

/// Check if theme-related config has changed.
fn config_theme_changed(old: &Config, new: &Config) -> bool {
    old.theme.mode != new.theme.mode
        || old.theme.accent != new.theme.accent
        || old.theme.buffer_color != new.theme.buffer_color
        || old.theme.surface_color != new.theme.surface_color
        || old.theme.overlay_opacity != new.theme.overlay_opacity
        || old.theme.typography.font_family != new.theme.typography.font_family
        || old.theme.typography.font_size != new.theme.typography.font_size
}

/// Check if playback-related config has changed.
fn config_video_changed(old: &Config, new: &Config) -> bool {
    old.video.source != new.video.source
        || old.video.autoplay != new.video.autoplay
        || old.video.muted != new.video.muted
        || old.video.loop_playback != new.video.loop_playback
}

/// Check if window config has changed (restart required).
fn config_window_changed(old: &Config, new: &Config) -> bool {
    old.window.width != new.window.width
        || old.window.height != new.window.height
        || old.window.title != new.window.title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_theme_changed_mode() {
        let old = Config::default();
        let mut new = Config::default();

        assert!(!config_theme_changed(&old, &new));

        new.theme.mode = "light".to_string();
        assert!(config_theme_changed(&old, &new));
    }

    #[test]
    fn test_config_theme_changed_accent() {
        let old = Config::default();
        let mut new = Config::default();

        new.theme.accent = "#ff0000".to_string();
        assert!(config_theme_changed(&old, &new));
    }

    #[test]
    fn test_config_theme_changed_overlay_opacity() {
        let old = Config::default();
        let mut new = Config::default();

        new.theme.overlay_opacity = 0.5;
        assert!(config_theme_changed(&old, &new));
    }

    #[test]
    fn test_config_video_changed_source() {
        let old = Config::default();
        let mut new = Config::default();

        assert!(!config_video_changed(&old, &new));

        new.video.source = "file:///tmp/other.mp4".to_string();
        assert!(config_video_changed(&old, &new));
    }

    #[test]
    fn test_config_video_changed_muted() {
        let old = Config::default();
        let mut new = Config::default();

        new.video.muted = !old.video.muted;
        assert!(config_video_changed(&old, &new));
    }

    #[test]
    fn test_config_window_changed_size() {
        let old = Config::default();
        let mut new = Config::default();

        assert!(!config_window_changed(&old, &new));

        new.window.width = 1280;
        assert!(config_window_changed(&old, &new));
    }

    #[test]
    fn test_video_change_does_not_flag_theme() {
        let old = Config::default();
        let mut new = Config::default();

        new.video.autoplay = !old.video.autoplay;
        assert!(!config_theme_changed(&old, &new));
        assert!(config_video_changed(&old, &new));
    }
}

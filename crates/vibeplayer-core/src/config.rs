//! Configuration types and parsing.
//!
//! This module defines the player configuration schema. The Config type
//! is a stable, serialization-friendly description of what the user
//! asked for; derived values (computed theme palettes, the resolved
//! media URI) live elsewhere.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use toml::Table;

use crate::error::{Error, Result};

/// Known valid values for theme.mode.
const VALID_THEME_MODES: &[&str] = &["auto", "dark", "light"];

/// Played when the command line and the config both name no source.
pub const DEFAULT_SOURCE: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

/// Embedded default configuration TOML, compiled into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config.toml");

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path where config was found, if any.
    pub source: Option<PathBuf>,
    /// Whether defaults were used (no config file found).
    pub used_defaults: bool,
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[derive(Default)]
pub struct Config {
    /// What to play and how playback starts.
    pub video: VideoConfig,

    /// Window geometry and title.
    pub window: WindowConfig,

    /// Theme configuration (colors, typography).
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from the embedded default TOML string.
    pub fn from_default_toml() -> Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, merging with embedded defaults.
    ///
    /// User-provided values override defaults; any missing sections or
    /// fields fall back to the embedded default config.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_with_defaults(&content)
    }

    /// Load configuration from a TOML string, merging with embedded defaults.
    ///
    /// This parses both the default config and user config as TOML tables,
    /// deep-merges them (user values win), then deserializes the result.
    fn load_with_defaults(user_toml: &str) -> Result<Self> {
        // This should never fail since it's embedded and tested
        let mut base: Table = toml::from_str(DEFAULT_CONFIG_TOML)
            .expect("embedded DEFAULT_CONFIG_TOML should always be valid");

        let user: Table = toml::from_str(user_toml)?;

        deep_merge_toml(&mut base, user);

        let config: Config = base.try_into()?;
        Ok(config)
    }

    /// Find and load configuration using the XDG lookup chain.
    ///
    /// If `explicit_path` is `Some`, that path is used directly and an error
    /// is returned if it doesn't exist or can't be parsed (no fallback).
    ///
    /// If `explicit_path` is `None`, searches in order:
    /// 1. `$XDG_CONFIG_HOME/vibeplayer/config.toml`
    /// 2. `~/.config/vibeplayer/config.toml`
    /// 3. `./config.toml` (current working directory)
    ///
    /// If no config file is found in the search chain, the embedded
    /// defaults are used.
    pub fn find_and_load(
        explicit_path: Option<&Path>,
    ) -> std::result::Result<ConfigLoadResult, Error> {
        // If an explicit path was provided, use it strictly (no fallback)
        if let Some(path) = explicit_path {
            let config = Self::load(path)?;
            return Ok(ConfigLoadResult {
                config,
                source: Some(path.to_path_buf()),
                used_defaults: false,
            });
        }

        // No explicit path - search the XDG chain
        // Rule: if a config file exists but fails to load, that's an error (no silent fallback).
        // Only use defaults when no config files exist at all.
        let search_paths = Self::config_search_paths();
        let mut first_error: Option<(PathBuf, Error)> = None;

        for path in &search_paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        return Ok(ConfigLoadResult {
                            config,
                            source: Some(path.clone()),
                            used_defaults: false,
                        });
                    }
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some((path.clone(), e));
                        }
                    }
                }
            }
        }

        if let Some((path, error)) = first_error {
            tracing::error!(
                "Config file {:?} exists but failed to load: {}",
                path,
                error
            );
            return Err(error);
        }

        // No config files exist anywhere - use embedded default TOML
        tracing::info!("No config file found, using built-in default config");
        tracing::debug!(
            "Searched: {}",
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;

        Ok(ConfigLoadResult {
            config,
            source: None,
            used_defaults: true,
        })
    }

    /// Get the list of paths to search for config files.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. $XDG_CONFIG_HOME/vibeplayer/config.toml
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("vibeplayer/config.toml"));
        }

        // 2. ~/.config/vibeplayer/config.toml
        if let Ok(home) = env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/vibeplayer/config.toml"));
        }

        // 3. ./config.toml (cwd)
        paths.push(PathBuf::from("config.toml"));

        paths
    }

    /// Validate the configuration, returning errors for invalid values.
    ///
    /// This performs strict validation - any invalid value causes an error.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        // Validate theme.mode
        if !VALID_THEME_MODES.contains(&self.theme.mode.as_str()) {
            errors.push(format!(
                "theme.mode: invalid value '{}', expected one of: {}",
                self.theme.mode,
                VALID_THEME_MODES.join(", ")
            ));
        }

        // Validate theme colors: each must parse as a hex color
        for (key, value) in [
            ("theme.accent", &self.theme.accent),
            ("theme.buffer_color", &self.theme.buffer_color),
            ("theme.surface_color", &self.theme.surface_color),
        ] {
            if crate::theme::parse_hex_color(value).is_none() {
                errors.push(format!(
                    "{}: invalid value '{}', expected a hex color like '#0caadc'",
                    key, value
                ));
            }
        }

        // Validate opacity range (0.0 to 1.0)
        if !(0.0..=1.0).contains(&self.theme.overlay_opacity) {
            errors.push(format!(
                "theme.overlay_opacity: invalid value '{}', must be between 0.0 and 1.0",
                self.theme.overlay_opacity
            ));
        }

        // Validate window geometry
        if self.window.width == 0 {
            errors.push("window.width: must be greater than 0".to_string());
        }

        if self.window.height == 0 {
            errors.push("window.height: must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation(errors))
        }
    }

    /// Check for potential configuration issues and return warnings.
    ///
    /// Unlike `validate()`, these are non-fatal issues that might indicate
    /// typos or a player that will start with nothing to show.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let source = self.video.source.trim();
        if source.is_empty() {
            warnings.push(
                "video.source: empty; the player starts with no media unless a source \
                 is given on the command line"
                    .to_string(),
            );
        } else if !source.contains("://") && !Path::new(source).exists() {
            warnings.push(format!(
                "video.source: '{}' does not exist (relative paths resolve against \
                 the working directory)",
                source
            ));
        }

        warnings
    }

    /// Print a human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Video:".to_string());
        lines.push(format!("  source: {}", self.video.source));
        lines.push(format!(
            "  autoplay: {}, muted: {}, loop: {}",
            self.video.autoplay, self.video.muted, self.video.loop_playback
        ));

        lines.push("\nWindow:".to_string());
        lines.push(format!(
            "  size: {}x{}px",
            self.window.width, self.window.height
        ));
        lines.push(format!("  title: {}", self.window.title));

        lines.push("\nTheme:".to_string());
        lines.push(format!("  mode: {}", self.theme.mode));
        lines.push(format!("  accent: {}", self.theme.accent));
        lines.push(format!("  buffer_color: {}", self.theme.buffer_color));
        lines.push(format!("  surface_color: {}", self.theme.surface_color));
        lines.push(format!(
            "  overlay_opacity: {}",
            self.theme.overlay_opacity
        ));
        lines.push(format!(
            "  font_family: {}",
            self.theme.typography.font_family
        ));

        lines.join("\n")
    }
}

/// Deep merge two TOML tables, with `overlay` values taking precedence.
///
/// For nested tables, recursively merges. For arrays and other values,
/// the overlay value completely replaces the base value.
fn deep_merge_toml(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            // Both are tables: recursively merge
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge_toml(base_table, overlay_table);
            }
            // Otherwise: overlay value wins (insert or replace)
            (_, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Media source and playback start behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// File path or URI played when none is given on the command line.
    pub source: String,

    /// Start playback as soon as the pipeline is ready.
    pub autoplay: bool,

    /// Start with the audio muted.
    pub muted: bool,

    /// Restart from the beginning when playback reaches the end.
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            autoplay: false,
            muted: false,
            loop_playback: false,
        }
    }
}

impl VideoConfig {
    /// The source to play, preferring a command-line override over the
    /// configured one. Empty strings count as absent.
    pub fn effective_source(&self, override_source: Option<&str>) -> Option<String> {
        let chosen = match override_source {
            Some(s) if !s.trim().is_empty() => s,
            _ => self.source.as_str(),
        };
        let chosen = chosen.trim();
        if chosen.is_empty() {
            None
        } else {
            Some(chosen.to_string())
        }
    }
}

/// Window geometry and title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Initial window width in pixels. Remembered geometry from a
    /// previous run wins over this.
    pub width: u32,

    /// Initial window height in pixels.
    pub height: u32,

    /// Title shown by the window manager.
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            title: "vibeplayer".to_string(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Theme mode: "auto", "dark", "light".
    /// - "auto": detects from the surface color's luminance
    /// - "dark": forces dark mode (light text on dark surfaces)
    /// - "light": forces light mode (dark text on light surfaces)
    pub mode: String,

    /// Accent color (hex like "#0caadc"): progress fill on the timeline,
    /// active entry in the rate menu.
    pub accent: String,

    /// Buffered-portion fill drawn behind the progress fill.
    pub buffer_color: String,

    /// Background of the control strip and the rate menu.
    pub surface_color: String,

    /// Opacity of the control strip over the video (0.0 to 1.0).
    pub overlay_opacity: f64,

    /// Typography settings.
    pub typography: ThemeTypography,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: "auto".to_string(),
            accent: "#0caadc".to_string(),
            buffer_color: "#fdfffc".to_string(),
            surface_color: "#1d253f".to_string(),
            overlay_opacity: 0.82,
            typography: ThemeTypography::default(),
        }
    }
}

/// Theme typography settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeTypography {
    /// Base font family.
    pub font_family: String,

    /// Point size for time labels and menu entries.
    pub font_size: u32,
}

impl Default for ThemeTypography {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 13,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.video.source, DEFAULT_SOURCE);
        assert!(!config.video.autoplay);
        assert!(!config.video.muted);
        assert!(!config.video.loop_playback);
        assert_eq!(config.window.width, 960);
        assert_eq!(config.window.height, 540);
        assert_eq!(config.theme.mode, "auto");
    }

    #[test]
    fn test_embedded_default_toml_parses() {
        let config = Config::from_default_toml().unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_embedded_default_toml_matches_struct_defaults() {
        // The shipped config.toml spells out every default so users can
        // edit it in place; it must not drift from the typed defaults.
        let from_toml = Config::from_default_toml().unwrap();
        let defaults = Config::default();

        assert_eq!(from_toml.video.source, defaults.video.source);
        assert_eq!(from_toml.video.autoplay, defaults.video.autoplay);
        assert_eq!(from_toml.video.muted, defaults.video.muted);
        assert_eq!(from_toml.video.loop_playback, defaults.video.loop_playback);
        assert_eq!(from_toml.window.width, defaults.window.width);
        assert_eq!(from_toml.window.height, defaults.window.height);
        assert_eq!(from_toml.window.title, defaults.window.title);
        assert_eq!(from_toml.theme.mode, defaults.theme.mode);
        assert_eq!(from_toml.theme.accent, defaults.theme.accent);
        assert_eq!(from_toml.theme.buffer_color, defaults.theme.buffer_color);
        assert_eq!(from_toml.theme.surface_color, defaults.theme.surface_color);
        assert_eq!(
            from_toml.theme.overlay_opacity,
            defaults.theme.overlay_opacity
        );
        assert_eq!(
            from_toml.theme.typography.font_family,
            defaults.theme.typography.font_family
        );
        assert_eq!(
            from_toml.theme.typography.font_size,
            defaults.theme.typography.font_size
        );
    }

    #[test]
    fn test_partial_config_merges_defaults() {
        let config = Config::load_with_defaults(
            r#"
            [video]
            autoplay = true
            "#,
        )
        .unwrap();

        assert!(config.video.autoplay);
        // Untouched fields keep the embedded defaults
        assert_eq!(config.video.source, DEFAULT_SOURCE);
        assert_eq!(config.theme.accent, "#0caadc");
    }

    #[test]
    fn test_loop_key_maps_to_loop_playback() {
        let config = Config::load_with_defaults(
            r#"
            [video]
            loop = true
            "#,
        )
        .unwrap();
        assert!(config.video.loop_playback);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = Config::load_with_defaults(
            r#"
            [video]
            autopley = true
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let result = Config::load_with_defaults(
            r#"
            [playback]
            rate = 2.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_deep_merge_nested_tables() {
        let mut base: Table = toml::from_str(
            r##"
            [theme]
            accent = "#111111"
            surface_color = "#222222"
            "##,
        )
        .unwrap();
        let overlay: Table = toml::from_str(
            r##"
            [theme]
            accent = "#333333"
            "##,
        )
        .unwrap();

        deep_merge_toml(&mut base, overlay);

        let theme = base["theme"].as_table().unwrap();
        assert_eq!(theme["accent"].as_str(), Some("#333333"));
        assert_eq!(theme["surface_color"].as_str(), Some("#222222"));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_theme_mode() {
        let mut config = Config::default();
        config.theme.mode = "darkest".to_string();

        let err = config.validate().unwrap_err();
        match err {
            Error::ConfigValidation(errors) => {
                assert!(errors.iter().any(|e| e.contains("theme.mode")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_colors() {
        let mut config = Config::default();
        config.theme.accent = "blue".to_string();
        config.theme.buffer_color = "#12345".to_string();

        let err = config.validate().unwrap_err();
        match err {
            Error::ConfigValidation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.contains("theme.accent")));
                assert!(errors.iter().any(|e| e.contains("theme.buffer_color")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_opacity() {
        let mut config = Config::default();
        config.theme.overlay_opacity = 1.5;
        assert!(config.validate().is_err());

        config.theme.overlay_opacity = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = Config::default();
        config.window.width = 0;

        let err = config.validate().unwrap_err();
        match err {
            Error::ConfigValidation(errors) => {
                assert!(errors.iter().any(|e| e.contains("window.width")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_warnings_on_empty_source() {
        let mut config = Config::default();
        config.video.source = String::new();

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("video.source"));
    }

    #[test]
    fn test_warnings_on_missing_local_file() {
        let mut config = Config::default();
        config.video.source = "/nonexistent/clip.mkv".to_string();

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("does not exist"));
    }

    #[test]
    fn test_no_warnings_for_uri_source() {
        let warnings = Config::default().warnings();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_effective_source_prefers_cli() {
        let config = VideoConfig::default();
        assert_eq!(
            config.effective_source(Some("/tmp/clip.mp4")),
            Some("/tmp/clip.mp4".to_string())
        );
    }

    #[test]
    fn test_effective_source_falls_back_to_config() {
        let config = VideoConfig::default();
        assert_eq!(config.effective_source(None), Some(DEFAULT_SOURCE.to_string()));
        assert_eq!(
            config.effective_source(Some("   ")),
            Some(DEFAULT_SOURCE.to_string())
        );
    }

    #[test]
    fn test_effective_source_empty_everywhere() {
        let mut config = VideoConfig::default();
        config.source = String::new();
        assert_eq!(config.effective_source(None), None);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Path::new("/nonexistent/vibeplayer.toml")).unwrap_err();
        match err {
            Error::ConfigNotFound(path) => {
                assert_eq!(path, PathBuf::from("/nonexistent/vibeplayer.toml"));
            }
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_mentions_key_values() {
        let summary = Config::default().summary();
        assert!(summary.contains("BigBuckBunny"));
        assert!(summary.contains("960x540px"));
        assert!(summary.contains("mode: auto"));
    }
}

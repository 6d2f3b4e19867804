//! Unified theming for vibeplayer.
//!
//! `ThemePalette` is the single source of truth for all theme-related
//! values. It parses config, computes derived values, and generates the
//! CSS variable block the widget styles consume.

use crate::Config;

// Fill opacities for the timeline. The track sits on video content, the
// buffer fill sits on the track, so each layer stays translucent.
const TRACK_OPACITY: f64 = 0.15;
const BUFFER_FILL_OPACITY: f64 = 0.40;

// Subtle accent wash for hover/active rows in the rate menu.
const ACCENT_SUBTLE_OPACITY: f64 = 0.15;

// Border opacities (subtle borders that don't compete with content)
const BORDER_OPACITY_DARK: f64 = 0.10;
const BORDER_OPACITY_LIGHT: f64 = 0.12;

// Shadow configuration (layered shadows for natural look)
const SHADOW_OPACITY_DARK: f64 = 0.40;
const SHADOW_OPACITY_LIGHT: f64 = 0.25;
const SHADOW_TIGHT_OFFSET_Y: u32 = 1;
const SHADOW_TIGHT_BLUR: u32 = 2;
const SHADOW_TIGHT_OPACITY_FACTOR: f64 = 0.5;
const SHADOW_DIFFUSE_OFFSET_Y: u32 = 1;
const SHADOW_DIFFUSE_BLUR: u32 = 3;
const SHADOW_DIFFUSE_OPACITY_FACTOR: f64 = 0.6;

// Foreground opacity for secondary text (the duration side of the
// time label, inactive menu rows).
const FOREGROUND_MUTED_OPACITY: f64 = 0.7;

// Error banner: the message color and its blend weight into the surface.
const DEFAULT_ERROR_COLOR: &str = "#ff6b6b";
const ERROR_BACKGROUND_WEIGHT: f64 = 0.35;

// Fallbacks when a configured color fails to parse. validate() rejects
// these up front, but the palette never panics on them either.
const FALLBACK_ACCENT: &str = "#0caadc";
const FALLBACK_BUFFER: &str = "#fdfffc";
const FALLBACK_SURFACE: &str = "#1d253f";

/// Parse a hex color string to RGB tuple. Returns None if invalid.
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim().trim_start_matches('#');

    // Expand shorthand (e.g., "fff" -> "ffffff")
    let color = if color.len() == 3 {
        color.chars().flat_map(|c| [c, c]).collect::<String>()
    } else {
        color.to_string()
    };

    if color.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&color[0..2], 16).ok()?;
    let g = u8::from_str_radix(&color[2..4], 16).ok()?;
    let b = u8::from_str_radix(&color[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Calculate relative luminance per WCAG formula (0.0 = black, 1.0 = white).
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c_srgb = c as f64 / 255.0;
        if c_srgb <= 0.03928 {
            c_srgb / 12.92
        } else {
            ((c_srgb + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Return true if the color is considered dark (low luminance).
pub fn is_dark_color(color: &str) -> bool {
    match parse_hex_color(color) {
        Some((r, g, b)) => relative_luminance(r, g, b) < 0.179,
        None => true, // Default to dark if parsing fails
    }
}

/// Blend two hex colors together.
///
/// `weight1` is the weight for color1 (0.0 to 1.0), color2 gets (1 - weight1).
pub fn blend_colors(color1: &str, color2: &str, weight1: f64) -> Option<(u8, u8, u8)> {
    let rgb1 = parse_hex_color(color1)?;
    let rgb2 = parse_hex_color(color2)?;

    let weight2 = 1.0 - weight1;
    let r = (rgb1.0 as f64 * weight1 + rgb2.0 as f64 * weight2) as u8;
    let g = (rgb1.1 as f64 * weight1 + rgb2.1 as f64 * weight2) as u8;
    let b = (rgb1.2 as f64 * weight1 + rgb2.2 as f64 * weight2) as u8;

    Some((r, g, b))
}

/// Convert RGB tuple to hex color string.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Format an RGBA color string.
pub fn rgba_str(r: u8, g: u8, b: u8, a: f64) -> String {
    format!("rgba({}, {}, {}, {:.2})", r, g, b, a)
}

/// A color in unit floats, ready for a cairo `set_source_rgba` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Build from a hex color and an alpha, falling back to `fallback`
    /// when the hex doesn't parse.
    pub fn from_hex(color: &str, alpha: f64, fallback: &str) -> Self {
        let (r, g, b) = parse_hex_color(color)
            .or_else(|| parse_hex_color(fallback))
            .unwrap_or((255, 255, 255));
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: alpha,
        }
    }
}

/// Colors the timeline paints with, resolved to drawable values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineColors {
    /// Full-width track behind everything.
    pub track: Rgba,
    /// Buffered portion, drawn over the track.
    pub buffer: Rgba,
    /// Played portion, drawn last.
    pub progress: Rgba,
}

/// Computed sizes for the player chrome.
#[derive(Debug, Clone)]
pub struct ThemeSizes {
    /// Height of the control strip overlaying the video.
    pub control_height: u32,
    /// Horizontal padding inside the control strip.
    pub control_padding: u32,
    /// Gap between controls.
    pub control_spacing: u32,
    /// Drawn height of the timeline track.
    pub timeline_height: u32,
    pub font_size: u32,
    pub icon_size: u32,
    /// Corner radius for the rate menu surface.
    pub menu_border_radius: u32,
}

impl Default for ThemeSizes {
    fn default() -> Self {
        Self {
            control_height: 48,
            control_padding: 12,
            control_spacing: 8,
            timeline_height: 6,
            font_size: 13,
            icon_size: 16,
            menu_border_radius: 10,
        }
    }
}

/// Styles for popover/menu surfaces.
#[derive(Debug, Clone)]
pub struct SurfaceStyles {
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub border_radius: u32,
    pub border_color: String,
    pub shadow: String,
    pub is_dark_mode: bool,
}

/// Single source of truth for all theme values.
///
/// Constructed via `ThemePalette::from_config(&config)`.
#[derive(Debug, Clone)]
pub struct ThemePalette {
    // Mode
    pub is_dark_mode: bool,

    // Raw configured colors (hex)
    pub accent_primary: String,
    pub buffer_color: String,
    pub surface_background: String,

    // Foreground colors
    pub foreground_primary: String,
    pub foreground_muted: String,

    // Accent wash for hover/active menu rows
    pub accent_subtle: String,

    // Control strip scrim (surface color with overlay opacity)
    pub control_scrim: String,

    // Error banner
    pub state_error: String,
    pub error_background: String,

    // Borders and shadows
    pub border_subtle: String,
    pub shadow_soft: String,

    // Typography
    pub font_family: String,

    // Opacity of the control scrim
    pub overlay_opacity: f64,

    // Sizes
    pub sizes: ThemeSizes,
}

impl Default for ThemePalette {
    fn default() -> Self {
        let mut palette = Self {
            is_dark_mode: true,
            accent_primary: FALLBACK_ACCENT.to_string(),
            buffer_color: FALLBACK_BUFFER.to_string(),
            surface_background: FALLBACK_SURFACE.to_string(),
            foreground_primary: String::new(),
            foreground_muted: String::new(),
            accent_subtle: String::new(),
            control_scrim: String::new(),
            state_error: DEFAULT_ERROR_COLOR.to_string(),
            error_background: String::new(),
            border_subtle: String::new(),
            shadow_soft: String::new(),
            font_family: "sans-serif".to_string(),
            overlay_opacity: 0.82,
            sizes: ThemeSizes::default(),
        };
        palette.compute_derived_values();
        palette
    }
}

impl ThemePalette {
    /// Create a ThemePalette from configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut palette = Self::default();
        palette.parse_config(config);
        palette.compute_derived_values();
        palette
    }

    fn parse_config(&mut self, config: &Config) {
        // Configured colors; parse failures fall back so a live-reloaded
        // broken color never unskins the player mid-session.
        self.accent_primary = checked_color(&config.theme.accent, "theme.accent", FALLBACK_ACCENT);
        self.buffer_color = checked_color(
            &config.theme.buffer_color,
            "theme.buffer_color",
            FALLBACK_BUFFER,
        );
        self.surface_background = checked_color(
            &config.theme.surface_color,
            "theme.surface_color",
            FALLBACK_SURFACE,
        );

        // Resolve is_dark_mode
        self.is_dark_mode = match config.theme.mode.as_str() {
            "dark" => true,
            "light" => false,
            _ => is_dark_color(&self.surface_background), // "auto"
        };

        self.overlay_opacity = config.theme.overlay_opacity.clamp(0.0, 1.0);

        // Typography - use "inherit" for empty font_family to use system font
        self.font_family = if config.theme.typography.font_family.is_empty() {
            "inherit".to_string()
        } else {
            config.theme.typography.font_family.clone()
        };
        self.sizes.font_size = config.theme.typography.font_size;
    }

    fn compute_derived_values(&mut self) {
        self.compute_foreground_colors();
        self.compute_accent_derived();
        self.compute_scrim();
        self.compute_error_colors();
        self.compute_borders_and_shadows();
    }

    fn compute_foreground_colors(&mut self) {
        if self.is_dark_mode {
            self.foreground_primary = "#ffffff".to_string();
            self.foreground_muted = format!("rgba(255, 255, 255, {:.2})", FOREGROUND_MUTED_OPACITY);
        } else {
            self.foreground_primary = "#1a1a1a".to_string();
            self.foreground_muted = format!("rgba(0, 0, 0, {:.2})", FOREGROUND_MUTED_OPACITY);
        }
    }

    fn compute_accent_derived(&mut self) {
        let (r, g, b) = parse_hex_color(&self.accent_primary).unwrap_or((255, 255, 255));
        self.accent_subtle = rgba_str(r, g, b, ACCENT_SUBTLE_OPACITY);
    }

    fn compute_scrim(&mut self) {
        let (r, g, b) = parse_hex_color(&self.surface_background).unwrap_or((0, 0, 0));
        self.control_scrim = rgba_str(r, g, b, self.overlay_opacity);
    }

    fn compute_error_colors(&mut self) {
        self.state_error = DEFAULT_ERROR_COLOR.to_string();
        self.error_background = match blend_colors(
            DEFAULT_ERROR_COLOR,
            &self.surface_background,
            ERROR_BACKGROUND_WEIGHT,
        ) {
            Some((r, g, b)) => rgb_to_hex(r, g, b),
            None => self.surface_background.clone(),
        };
    }

    fn compute_borders_and_shadows(&mut self) {
        let shadow_opacity = if self.is_dark_mode {
            self.border_subtle = format!("rgba(255, 255, 255, {:.2})", BORDER_OPACITY_DARK);
            SHADOW_OPACITY_DARK
        } else {
            self.border_subtle = format!("rgba(0, 0, 0, {:.2})", BORDER_OPACITY_LIGHT);
            SHADOW_OPACITY_LIGHT
        };

        self.shadow_soft = format!(
            "0 {}px {}px rgba(0, 0, 0, {:.2}), 0 {}px {}px rgba(0, 0, 0, {:.2})",
            SHADOW_TIGHT_OFFSET_Y,
            SHADOW_TIGHT_BLUR,
            shadow_opacity * SHADOW_TIGHT_OPACITY_FACTOR,
            SHADOW_DIFFUSE_OFFSET_Y,
            SHADOW_DIFFUSE_BLUR,
            shadow_opacity * SHADOW_DIFFUSE_OPACITY_FACTOR
        );
    }

    /// Colors the timeline widget paints with. The track uses the
    /// foreground color so it reads on both dark and light video.
    pub fn timeline_colors(&self) -> TimelineColors {
        let track_base = if self.is_dark_mode {
            "#ffffff"
        } else {
            "#000000"
        };
        TimelineColors {
            track: Rgba::from_hex(track_base, TRACK_OPACITY, "#ffffff"),
            buffer: Rgba::from_hex(&self.buffer_color, BUFFER_FILL_OPACITY, FALLBACK_BUFFER),
            progress: Rgba::from_hex(&self.accent_primary, 1.0, FALLBACK_ACCENT),
        }
    }

    /// Get surface styling for the rate menu popover.
    pub fn surface_styles(&self) -> SurfaceStyles {
        SurfaceStyles {
            background_color: self.surface_background.clone(),
            text_color: self.foreground_primary.clone(),
            font_family: self.font_family.clone(),
            font_size: self.sizes.font_size,
            border_radius: self.sizes.menu_border_radius,
            border_color: self.border_subtle.clone(),
            shadow: self.shadow_soft.clone(),
            is_dark_mode: self.is_dark_mode,
        }
    }

    /// Generate the :root CSS variable block.
    pub fn css_vars_block(&self) -> String {
        format!(
            r#"
:root {{
    /* ===== Colors ===== */
    --color-accent-primary: {accent_primary};
    --color-accent-subtle: {accent_subtle};
    --color-buffer-fill: {buffer_fill};
    --color-surface: {surface};
    --color-control-scrim: {control_scrim};
    --color-foreground-primary: {fg_primary};
    --color-foreground-muted: {fg_muted};
    --color-state-error: {state_error};
    --color-error-background: {error_background};

    /* ===== Borders & Shadows ===== */
    --color-border-subtle: {border_subtle};
    --shadow-soft: {shadow_soft};

    /* ===== Sizes & Spacing ===== */
    --control-height: {control_height}px;
    --control-padding: {control_padding}px;
    --control-spacing: {control_spacing}px;
    --timeline-height: {timeline_height}px;
    --radius-surface: {radius_surface}px;

    /* Spacing tokens - consistent spacing scale */
    --spacing-xs: 4px;
    --spacing-sm: 8px;
    --spacing-md: 12px;
    --spacing-lg: 16px;

    /* ===== Typography ===== */
    --font-family: {font_family};
    --font-size: {font_size}px;

    /* ===== Icon Sizes ===== */
    --icon-size: {icon_size}px;
}}
"#,
            accent_primary = self.accent_primary,
            accent_subtle = self.accent_subtle,
            buffer_fill = self.buffer_color,
            surface = self.surface_background,
            control_scrim = self.control_scrim,
            fg_primary = self.foreground_primary,
            fg_muted = self.foreground_muted,
            state_error = self.state_error,
            error_background = self.error_background,
            border_subtle = self.border_subtle,
            shadow_soft = self.shadow_soft,
            control_height = self.sizes.control_height,
            control_padding = self.sizes.control_padding,
            control_spacing = self.sizes.control_spacing,
            timeline_height = self.sizes.timeline_height,
            radius_surface = self.sizes.menu_border_radius,
            font_family = self.font_family,
            font_size = self.sizes.font_size,
            icon_size = self.sizes.icon_size,
        )
    }
}

/// Validate a configured color, warning and substituting on parse failure.
fn checked_color(color: &str, key: &str, fallback: &str) -> String {
    if parse_hex_color(color).is_some() {
        color.to_string()
    } else {
        tracing::warn!(
            "Invalid color '{}' for {} - expected hex color like '#0caadc', using {}",
            color,
            key,
            fallback
        );
        fallback.to_string()
    }
}

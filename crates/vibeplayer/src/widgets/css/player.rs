//! Player surface CSS.

/// Return player surface CSS.
pub fn css() -> &'static str {
    r#"
/* ===== PLAYER SURFACE ===== */

.player-window {
    background-color: var(--color-surface);
    font-family: var(--font-family);
    font-size: var(--font-size);
    color: var(--color-foreground-primary);
}

/* The video letterboxes against the surface color, not GTK's default */
.player-view {
    background-color: var(--color-surface);
}

.player-video {
    background-color: transparent;
}

.player-spinner {
    color: var(--color-accent-primary);
}

/* ===== ERROR BANNER ===== */

.error-banner {
    background-color: var(--color-error-background);
    border: 1px solid var(--color-border-subtle);
    border-radius: var(--radius-surface);
    box-shadow: var(--shadow-soft);
    padding: var(--spacing-sm) var(--spacing-md);
    margin-top: var(--spacing-md);
}

.error-banner-icon {
    -gtk-icon-size: var(--icon-size);
}

.error-banner-label {
    font-size: var(--font-size);
}
"#
}

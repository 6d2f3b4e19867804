//! Control bar and rate menu CSS.

/// Return control bar CSS.
pub fn css() -> &'static str {
    r#"
/* ===== CONTROL BAR ===== */

.controls-reveal {
    /* The revealer itself stays invisible; the bar paints the scrim */
    background: transparent;
}

.controls-bar {
    background-color: var(--color-control-scrim);
    min-height: var(--control-height);
    padding: 0 var(--control-padding);
}

.controls-btn {
    min-width: calc(var(--control-height) - var(--spacing-md));
    min-height: calc(var(--control-height) - var(--spacing-md));
    padding: var(--spacing-xs);
    border-radius: var(--radius-surface);
    color: var(--color-foreground-primary);
    -gtk-icon-size: var(--icon-size);
}

.controls-btn:hover {
    background: var(--color-accent-subtle);
}

.controls-btn:active {
    opacity: 0.7;
}

.controls-play-btn {
    color: var(--color-accent-primary);
}

/* Timecodes stay fixed-width so the bar does not jitter while playing */
.controls-position,
.controls-duration {
    font-size: var(--font-size);
    font-feature-settings: "tnum";
}

timeline {
    min-height: var(--timeline-height);
    margin: 0 var(--spacing-sm);
}

.controls-rate-label {
    font-size: var(--font-size);
}

/* ===== RATE MENU ===== */

.rate-menu-content {
    background-color: var(--color-surface);
    border-radius: var(--radius-surface);
    border: 1px solid var(--color-border-subtle);
    padding: var(--spacing-sm);
    min-width: 160px;
}

.rate-menu-title {
    font-size: var(--font-size);
    padding: var(--spacing-xs) var(--spacing-sm);
}

.rate-menu-item {
    background: transparent;
    border: none;
    box-shadow: none;
    border-radius: var(--radius-surface);
    padding: var(--spacing-xs) var(--spacing-sm);
}

.rate-menu-item:hover {
    background: var(--color-accent-subtle);
}

.rate-menu-check {
    -gtk-icon-size: var(--icon-size);
}

.rate-menu-label {
    font-size: var(--font-size);
}
"#
}

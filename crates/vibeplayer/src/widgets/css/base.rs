//! Shared utility CSS classes.
//!
//! These apply across surfaces (window, control bar, popovers) rather
//! than to any single widget.

/// Return shared utility CSS.
pub fn css() -> &'static str {
    r#"
/* ===== SHARED UTILITY CSS ===== */

/* Color utilities - applies to both text and icons */
.vp-primary { color: var(--color-foreground-primary); }
.vp-muted { color: var(--color-foreground-muted); }
.vp-accent { color: var(--color-accent-primary); }
.vp-error { color: var(--color-state-error); }

/* ===== BUTTONS ===== */

/* Reset button - strips GTK chrome (background, border, shadow) */
button.vp-btn-reset {
    background: transparent;
    border: none;
    box-shadow: none;
    outline: none;
}

button.vp-btn-reset:focus,
button.vp-btn-reset:focus-visible {
    outline: none;
    border: none;
    box-shadow: none;
}

/* ===== POPOVERS ===== */

/* Strip the stock popover chrome; content boxes paint the surface */
popover.rate-menu {
    background: transparent;
    border: none;
    box-shadow: none;
    border-radius: var(--radius-surface);
}

popover.rate-menu > contents,
popover.rate-menu.background > contents {
    background: transparent;
    border: none;
    box-shadow: var(--shadow-soft);
    border-radius: var(--radius-surface);
    padding: 0;
    margin: 0 6px 6px 6px;
}
"#
}

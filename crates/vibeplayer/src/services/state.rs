//! Persisted player state.
//!
//! Remembers the window geometry across runs in a small JSON file under
//! `$XDG_STATE_HOME/vibeplayer/state.json` (or `~/.local/state/...`).
//! Loading is infallible: a missing or unreadable file yields defaults.
//! Playback position is deliberately not persisted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub window: PersistedWindow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedWindow {
    /// Last seen window size. Zero means never saved; the configured
    /// size applies then.
    pub width: i32,
    pub height: i32,
    pub maximized: bool,
}

impl PersistedWindow {
    /// Whether a usable geometry was ever saved.
    pub fn has_geometry(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

fn state_file_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_STATE_HOME")
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir).join("vibeplayer/state.json"));
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local/state/vibeplayer/state.json"))
}

/// Load persisted state, falling back to defaults on any failure.
pub fn load() -> PersistedState {
    let Some(path) = state_file_path() else {
        return PersistedState::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(state) => {
                debug!("Loaded persisted state from {}", path.display());
                state
            }
            Err(e) => {
                warn!("Failed to parse state file {}: {}", path.display(), e);
                PersistedState::default()
            }
        },
        // Missing file is the common first-run case
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state, logging rather than failing on errors.
pub fn save(state: &PersistedState) {
    let Some(path) = state_file_path() else {
        warn!("No state directory available; not saving state");
        return;
    };

    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!("Failed to create state directory {}: {}", parent.display(), e);
        return;
    }

    match serde_json::to_string_pretty(state) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&path, json) {
                warn!("Failed to write state file {}: {}", path.display(), e);
            } else {
                debug!("Saved persisted state to {}", path.display());
            }
        }
        Err(e) => warn!("Failed to serialize state: {}", e),
    }
}

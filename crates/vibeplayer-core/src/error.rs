//! Error types shared across the vibeplayer crates.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A config file passed with `--config` does not exist. Files from
    /// the default search path are allowed to be missing; an explicit
    /// path is not.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// The config parsed but holds values that cannot be used.
    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    ConfigValidation(Vec<String>),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The media backend could not be brought up or fell over while
    /// playing (missing plugin, unreachable source, decode failure).
    #[error("media backend error: {0}")]
    Media(String),
}

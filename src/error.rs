//! Error types for streaming-stats

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The source directory holds no `.json` files at all.
    #[error("No JSON files found in {}", dir.display())]
    NoInputFiles { dir: PathBuf },

    /// Files were found, but none of them produced a single usable play.
    #[error("No valid data loaded from {} ({failed} file(s) failed)", dir.display())]
    NoValidData { dir: PathBuf, failed: usize },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an "other" error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this error means ingestion produced no corpus to analyse.
    #[must_use]
    pub const fn is_fatal_load(&self) -> bool {
        matches!(self, Self::NoInputFiles { .. } | Self::NoValidData { .. })
    }
}

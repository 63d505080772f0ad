//! Error type for the logging facility

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the logging facility
pub type LogResult<T> = Result<T, LogError>;

/// Failures surfaced by the logger and its sinks
#[derive(Debug, Error)]
pub enum LogError {
    /// Writing to, or rotating, the log file failed
    #[error("log file operation failed on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A color string was not `RRGGBB` or `RRGGBBAA` hex
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// An unknown theme preset name
    #[error("unknown theme preset: {0:?} (expected \"dark\" or \"light\")")]
    InvalidTheme(String),

    /// The process-wide logger was installed twice
    #[error("global logger is already initialized")]
    AlreadyInitialized,

    /// The OS file browser could not be launched
    #[error("failed to open {}: {reason}", .path.display())]
    Shell { path: PathBuf, reason: String },
}

impl LogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

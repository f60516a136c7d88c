//! Error types for backend registries and appenders.

use std::io;
use std::path::PathBuf;

/// Error type for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A color scheme colors both level labels and whole lines.
    #[error("color scheme {name} can't set line and level settings in the same scheme")]
    ConflictingColorScheme {
        /// Name the scheme was registered under.
        name: String,
    },

    /// A layout references a color scheme that was never registered.
    #[error("unknown color scheme: {name}")]
    UnknownColorScheme {
        /// The unresolved scheme name.
        name: String,
    },

    /// I/O error while opening or writing a file appender.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl BackendError {
    /// Creates an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

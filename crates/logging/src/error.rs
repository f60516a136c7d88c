//! crates/logging/src/error.rs
//! Errors raised while materializing outputs and color schemes.

use logging_backend::BackendError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the facade.
#[derive(Debug, Error)]
pub enum Error {
    /// A color definition set both per-level and per-line colors.
    #[error("color scheme `{scheme}`: can't set line and level settings in the same scheme")]
    ColorConflict {
        /// Name of the offending definition.
        scheme: String,
    },

    /// The output kind does not provide the requested operation.
    #[error("`{operation}` is not implemented for {kind} outputs")]
    NotImplemented {
        /// Kind of the output.
        kind: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// The builder left a field unset that the output kind requires.
    #[error("{kind} output is missing its `{field}`")]
    MissingField {
        /// Kind of the output.
        kind: &'static str,
        /// The unset field.
        field: &'static str,
    },

    /// The backend rejected a registration.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

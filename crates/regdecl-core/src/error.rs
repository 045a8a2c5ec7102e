//! Error types for regdecl core operations.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building registry descriptors.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration was rejected before any descriptor was emitted.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ValidationErrors),

    /// The engine did not report a required output value.
    #[error("Engine output '{name}' is missing or not a string")]
    MissingOutput {
        /// Name of the output.
        name: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

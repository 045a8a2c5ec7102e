//! Error types for rendering.

use thiserror::Error;

/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while checking or rendering a descriptor.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The resource label is not a valid engine identifier.
    #[error("Invalid resource label '{label}': must start with a letter or underscore and contain only letters, digits, '_' or '-'")]
    InvalidLabel {
        /// The rejected label.
        label: String,
    },

    /// Unknown output format name.
    #[error("Unknown output format '{value}' (expected: descriptor, terraform)")]
    UnknownFormat {
        /// The rejected value.
        value: String,
    },

    /// Unknown encoding name.
    #[error("Unknown encoding '{value}' (expected: json, yaml)")]
    UnknownEncoding {
        /// The rejected value.
        value: String,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Core library error.
    #[error(transparent)]
    Core(#[from] regdecl_core::Error),
}

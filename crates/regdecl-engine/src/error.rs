//! Error types for the engine crate.

use regdecl_render::{CheckReport, IssueSeverity, RenderError};
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors reported by a provisioning engine.
///
/// Diagnostics are carried exactly as the engine produced them.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine process could not be started.
    #[error("engine '{engine}' could not be started: {source}")]
    Spawn {
        /// Engine name.
        engine: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The engine ran and reported a failure.
    #[error("engine '{engine}' failed ({status}): {}", .diagnostic.trim_end())]
    Failed {
        /// Engine name.
        engine: String,
        /// How the engine exited.
        status: String,
        /// Diagnostic output of the engine.
        diagnostic: String,
    },

    /// The engine succeeded but its outputs could not be read.
    #[error("engine '{engine}' returned unusable outputs: {reason}")]
    InvalidOutputs {
        /// Engine name.
        engine: String,
        /// What was wrong with the outputs.
        reason: String,
    },

    /// I/O error while talking to the engine.
    #[error("I/O error talking to engine '{engine}': {source}")]
    Io {
        /// Engine name.
        engine: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Returns the engine's diagnostic output, if it produced one.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Failed { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}

/// Errors from the provisioning workflow.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The configuration was rejected; the engine was not contacted.
    #[error("Configuration error: {}", summarize(.0))]
    Configuration(CheckReport),

    /// The descriptor could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The engine failed to reconcile the document.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ProvisionError {
    /// Returns true if the engine was never contacted.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Render(_))
    }
}

fn summarize(report: &CheckReport) -> String {
    let rejected: Vec<String> = report
        .issues
        .iter()
        .filter(|issue| issue.severity >= IssueSeverity::Warning)
        .map(|issue| match &issue.field {
            Some(field) => format!("{field}: {}", issue.message),
            None => issue.message.clone(),
        })
        .collect();
    rejected.join("; ")
}

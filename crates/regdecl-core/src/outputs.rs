//! Registry outputs.
//!
//! After reconciliation the engine reports the registry's URL and ARN. This
//! module names those outputs and converts between engine output maps and
//! [`RegistryHandle`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Output name carrying the repository URL.
pub const OUTPUT_REPOSITORY_URL: &str = "repository_url";
/// Output name carrying the repository ARN.
pub const OUTPUT_REPOSITORY_ARN: &str = "repository_arn";

/// Declaration of an output the engine must expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputDeclaration {
    /// Stable output name.
    pub name: &'static str,
    /// Attribute of the registry resource the output reads.
    pub attribute: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Outputs declared for every registry.
pub const OUTPUTS: [OutputDeclaration; 2] = [
    OutputDeclaration {
        name: OUTPUT_REPOSITORY_URL,
        attribute: "repository_url",
        description: "URL of the container registry",
    },
    OutputDeclaration {
        name: OUTPUT_REPOSITORY_ARN,
        attribute: "arn",
        description: "ARN of the container registry",
    },
];

/// Handle to a reconciled registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryHandle {
    /// Registry URL used to push and pull images.
    pub url: String,
    /// Registry ARN.
    pub arn: String,
}

impl RegistryHandle {
    /// Creates a new handle.
    #[must_use]
    pub fn new(url: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            arn: arn.into(),
        }
    }

    /// Returns the handle keyed by the stable output names.
    #[must_use]
    pub fn outputs(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            (OUTPUT_REPOSITORY_URL, self.url.as_str()),
            (OUTPUT_REPOSITORY_ARN, self.arn.as_str()),
        ])
    }

    /// Reads a handle from an engine output map.
    ///
    /// Values may be plain strings or objects with a string `value` field.
    ///
    /// # Examples
    ///
    /// ```
    /// use regdecl_core::RegistryHandle;
    ///
    /// let outputs = serde_json::json!({
    ///     "repository_url": "111122223333.dkr.ecr.us-east-1.amazonaws.com/my-repo",
    ///     "repository_arn": {"value": "arn:aws:ecr:us-east-1:111122223333:repository/my-repo"},
    /// });
    /// let handle = RegistryHandle::from_outputs(outputs.as_object().unwrap()).unwrap();
    /// assert!(handle.arn.ends_with("repository/my-repo"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingOutput`] if either output is absent or not a
    /// string.
    pub fn from_outputs(outputs: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            url: read_output(outputs, OUTPUT_REPOSITORY_URL)?,
            arn: read_output(outputs, OUTPUT_REPOSITORY_ARN)?,
        })
    }
}

fn read_output(outputs: &Map<String, Value>, name: &str) -> Result<String> {
    let value = match outputs.get(name) {
        Some(Value::Object(wrapped)) => wrapped.get("value"),
        other => other,
    };
    value
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| Error::MissingOutput {
            name: name.to_string(),
        })
}

//! Descriptor rendering.
//!
//! This module turns a [`RegistryDescriptor`] into the document handed to
//! the provisioning engine, and computes a content fingerprint for it.

use std::fmt;
use std::str::FromStr;

use regdecl_core::RegistryDescriptor;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{RenderError, Result};
use crate::terraform::{self, DEFAULT_LABEL};

/// Document layout produced by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The descriptor itself.
    #[default]
    Descriptor,
    /// Terraform JSON configuration syntax.
    Terraform,
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "descriptor" => Ok(Self::Descriptor),
            "terraform" | "tf" => Ok(Self::Terraform),
            _ => Err(RenderError::UnknownFormat {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor => write!(f, "descriptor"),
            Self::Terraform => write!(f, "terraform"),
        }
    }
}

/// Text encoding of the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl FromStr for Encoding {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(RenderError::UnknownEncoding {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// A document ready to hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    /// Repository the document declares.
    pub repository: String,
    /// Layout of the document.
    pub format: OutputFormat,
    /// Text encoding of `content`.
    pub encoding: Encoding,
    /// Fingerprint of the desired state (see [`fingerprint`]).
    pub fingerprint: String,
    /// Encoded document.
    pub content: String,
}

/// Renders descriptors into engine documents.
///
/// # Examples
///
/// ```rust
/// use regdecl_core::{RegistryConfig, RegistryDescriptor};
/// use regdecl_render::{Encoding, OutputFormat, Renderer};
///
/// let descriptor = RegistryDescriptor::from_config(&RegistryConfig::new("my-repo")).unwrap();
/// let document = Renderer::new()
///     .with_format(OutputFormat::Terraform)
///     .with_encoding(Encoding::Json)
///     .render(&descriptor)
///     .unwrap();
///
/// assert!(document.content.contains("aws_ecr_repository"));
/// assert!(document.fingerprint.starts_with("sha256:"));
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    format: OutputFormat,
    encoding: Encoding,
    label: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Creates a renderer producing a JSON descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: OutputFormat::default(),
            encoding: Encoding::default(),
            label: DEFAULT_LABEL.to_string(),
        }
    }

    /// Sets the document layout.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the text encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the resource label used by engine formats.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the document as a JSON value, before encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor cannot be serialized or the label
    /// is invalid.
    pub fn to_value(&self, descriptor: &RegistryDescriptor) -> Result<Value> {
        match self.format {
            OutputFormat::Descriptor => Ok(serde_json::to_value(descriptor)?),
            OutputFormat::Terraform => terraform::to_terraform_json(descriptor, &self.label),
        }
    }

    /// Renders and encodes a descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the label is invalid.
    pub fn render(&self, descriptor: &RegistryDescriptor) -> Result<RenderedDocument> {
        let value = self.to_value(descriptor)?;
        let content = match self.encoding {
            Encoding::Json => {
                let mut text = serde_json::to_string_pretty(&value)?;
                text.push('\n');
                text
            }
            Encoding::Yaml => serde_yaml::to_string(&value)?,
        };
        let fingerprint = fingerprint(descriptor)?;

        info!(
            repository = %descriptor.name(),
            format = %self.format,
            encoding = %self.encoding,
            %fingerprint,
            "Rendered registry document"
        );
        debug!(bytes = content.len(), "Rendered document size");

        Ok(RenderedDocument {
            repository: descriptor.name().to_string(),
            format: self.format,
            encoding: self.encoding,
            fingerprint,
            content,
        })
    }
}

/// Computes the fingerprint of a descriptor's desired state.
///
/// The fingerprint is `sha256:<hex>` over the compact JSON encoding of the
/// descriptor. Findings are excluded, so two configurations declaring the
/// same state share a fingerprint.
///
/// # Errors
///
/// Returns an error if the descriptor cannot be serialized.
pub fn fingerprint(descriptor: &RegistryDescriptor) -> Result<String> {
    let bytes = serde_json::to_vec(descriptor)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("sha256:{}", hex::encode(digest)))
}

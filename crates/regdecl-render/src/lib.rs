//! # Regdecl Render
//!
//! Pre-flight checks and engine document rendering for registry descriptors.
//!
//! This crate provides functionality for:
//!
//! - Checking a configuration and reporting errors, warnings and hints
//! - Rendering a descriptor as JSON or YAML
//! - Rendering a descriptor in Terraform's JSON configuration syntax
//! - Fingerprinting the desired state
//!
//! ## Example
//!
//! ```rust
//! use regdecl_core::RegistryConfig;
//! use regdecl_render::{Checker, OutputFormat, Renderer};
//!
//! let report = Checker::new().check(&RegistryConfig::new("my-repo"));
//! let descriptor = report.descriptor.expect("valid configuration");
//!
//! let document = Renderer::new()
//!     .with_format(OutputFormat::Terraform)
//!     .render(&descriptor)
//!     .unwrap();
//! println!("{}", document.content);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checker;
pub mod error;
pub mod renderer;
pub mod terraform;

pub use checker::{CheckIssue, CheckReport, Checker, CheckerConfig, IssueSeverity};
pub use error::{RenderError, Result};
pub use renderer::{fingerprint, Encoding, OutputFormat, RenderedDocument, Renderer};

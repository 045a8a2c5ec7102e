//! # Regdecl Core
//!
//! Configuration model and desired-state descriptors for provisioning a
//! container image registry through an external provisioning engine.
//!
//! This crate provides:
//!
//! - [`RegistryConfig`] - the configuration surface
//! - [`EncryptionPolicy`] and [`resolve_encryption`] - encryption selection
//! - [`AccessPolicy`] - the push/pull statement attached to the registry
//! - [`TagSet`] - the fixed tag document
//! - [`RegistryDescriptor`] - the validated desired state
//! - [`RegistryHandle`] - the outputs reported back by the engine
//! - [`validation`] - the validation framework used before anything is emitted
//!
//! ## Example
//!
//! ```rust
//! use regdecl_core::{EncryptionPolicy, RegistryConfig, RegistryDescriptor};
//!
//! let config = RegistryConfig::new("my-repo").with_kms_encryption("arn:aws:kms:1");
//! let descriptor = RegistryDescriptor::from_config(&config).unwrap();
//!
//! assert_eq!(
//!     descriptor.repository.encryption,
//!     EncryptionPolicy::external("arn:aws:kms:1"),
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access_policy;
pub mod config;
pub mod descriptor;
pub mod encryption;
pub mod error;
pub mod outputs;
pub mod tags;
pub mod validation;


pub use access_policy::AccessPolicy;
pub use config::RegistryConfig;
pub use descriptor::{DescriptorBuilder, Finding, FindingKind, RegistryDescriptor, RepositoryDeclaration};
pub use encryption::{resolve_encryption, EncryptionPolicy};
pub use error::{Error, Result};
pub use outputs::RegistryHandle;
pub use tags::TagSet;
pub use validation::{Validate, ValidationError, ValidationErrors};

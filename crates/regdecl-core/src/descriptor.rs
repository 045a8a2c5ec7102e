//! Registry provisioning descriptor.
//!
//! A [`RegistryDescriptor`] is the complete desired state handed to the
//! provisioning engine: the registry declaration, its access policy, the
//! merged tags and the outputs the engine must expose. Descriptors are only
//! produced from configurations that pass validation.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::access_policy::AccessPolicy;
use crate::config::{RegistryConfig, FIELD_ENABLE_KMS_ENCRYPTION, FIELD_KMS_KEY};
use crate::encryption::{self, EncryptionPolicy};
use crate::error::Result;
use crate::outputs::{OutputDeclaration, OUTPUTS};
use crate::tags::TagSet;

/// Declaration of the registry resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDeclaration {
    /// Registry name.
    pub name: String,
    /// Scan images on push.
    pub scan_on_push: bool,
    /// Resolved encryption.
    pub encryption: EncryptionPolicy,
    /// Merged tags.
    pub tags: TagSet,
}

/// Something worth telling the operator about a descriptor that is still
/// valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// What was found.
    pub kind: FindingKind,
    /// Configuration field the finding relates to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    /// Human-readable message.
    pub message: String,
}

/// Kinds of descriptor findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// KMS encryption was requested without a key; the managed key is used.
    KmsFallback,
    /// The access policy grants push/pull to every principal.
    WildcardPrincipal,
}

impl FindingKind {
    /// Returns true if the finding should be treated as a warning.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::KmsFallback)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Complete desired state for one registry.
///
/// # Examples
///
/// ```
/// use regdecl_core::{EncryptionPolicy, RegistryConfig, RegistryDescriptor};
///
/// let descriptor = RegistryDescriptor::from_config(&RegistryConfig::new("my-repo")).unwrap();
/// assert!(descriptor.repository.scan_on_push);
/// assert_eq!(descriptor.repository.encryption, EncryptionPolicy::ManagedKey);
/// assert_eq!(descriptor.access_policy.repository, "my-repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryDescriptor {
    /// The registry resource.
    pub repository: RepositoryDeclaration,
    /// The access policy resource.
    pub access_policy: AccessPolicy,
    /// Outputs the engine must expose.
    pub outputs: Vec<OutputDeclaration>,
    /// Diagnostics gathered while building. Not part of the desired state.
    #[serde(skip)]
    pub findings: Vec<Finding>,
}

impl RegistryDescriptor {
    /// Creates a builder for the given configuration.
    #[must_use]
    pub const fn builder(config: &RegistryConfig) -> DescriptorBuilder<'_> {
        DescriptorBuilder::new(config)
    }

    /// Builds a descriptor with default options.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if the configuration is invalid.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Returns the merged tag document.
    #[must_use]
    pub const fn tags(&self) -> &TagSet {
        &self.repository.tags
    }

    /// Returns the registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.repository.name
    }

    /// Returns true if any finding is a warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| f.kind.is_warning())
    }
}

/// Validating builder for [`RegistryDescriptor`].
#[derive(Debug, Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    config: &'a RegistryConfig,
    strict_names: bool,
}

impl<'a> DescriptorBuilder<'a> {
    const fn new(config: &'a RegistryConfig) -> Self {
        Self {
            config,
            strict_names: true,
        }
    }

    /// Enforces the registry naming grammar locally (default `true`).
    ///
    /// When disabled only empty and whitespace-only names are rejected and
    /// the rest of the grammar is left to the engine.
    #[must_use]
    pub const fn strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }

    /// Validates the configuration and builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] naming every offending field.
    pub fn build(self) -> Result<RegistryDescriptor> {
        let config = self.config;
        config.validate_with(self.strict_names)?;

        let mut findings = Vec::new();

        let resolution = encryption::resolve(config);
        if resolution.fell_back {
            warn!(
                repository = %config.repository_name,
                "{FIELD_ENABLE_KMS_ENCRYPTION} is set but {FIELD_KMS_KEY} is empty; using the managed key"
            );
            findings.push(Finding {
                kind: FindingKind::KmsFallback,
                field: Some(FIELD_KMS_KEY),
                message: format!(
                    "{FIELD_ENABLE_KMS_ENCRYPTION} is true but {FIELD_KMS_KEY} is empty; falling back to AES256"
                ),
            });
        }

        let access_policy = AccessPolicy::for_repository(&config.repository_name);
        if access_policy.grants_wildcard() {
            debug!(repository = %config.repository_name, "Access policy grants the wildcard principal");
            findings.push(Finding {
                kind: FindingKind::WildcardPrincipal,
                field: None,
                message: "access policy grants push and pull to every principal ('*')".to_string(),
            });
        }

        let repository = RepositoryDeclaration {
            name: config.repository_name.clone(),
            scan_on_push: config.enable_image_scanning,
            encryption: resolution.policy,
            tags: TagSet::from_config(config),
        };

        info!(
            repository = %repository.name,
            scan_on_push = repository.scan_on_push,
            encryption = %repository.encryption,
            "Built registry descriptor"
        );

        Ok(RegistryDescriptor {
            repository,
            access_policy,
            outputs: OUTPUTS.to_vec(),
            findings,
        })
    }
}

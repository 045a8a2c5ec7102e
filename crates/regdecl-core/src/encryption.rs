//! Encryption resolution.
//!
//! The registry is encrypted either with the service-managed key or with an
//! external KMS key. Resolution is total: every configuration maps to
//! exactly one [`EncryptionPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;

/// Encryption type string for the service-managed key.
pub const MANAGED_KEY_TYPE: &str = "AES256";
/// Encryption type string for an external KMS key.
pub const EXTERNAL_KEY_TYPE: &str = "KMS";

/// Encryption applied to the registry.
///
/// Serializes as the engine's encryption block:
///
/// ```
/// use regdecl_core::EncryptionPolicy;
///
/// let json = serde_json::to_value(EncryptionPolicy::external("alias/reg")).unwrap();
/// assert_eq!(json, serde_json::json!({"encryption_type": "KMS", "kms_key": "alias/reg"}));
///
/// let json = serde_json::to_value(EncryptionPolicy::ManagedKey).unwrap();
/// assert_eq!(json, serde_json::json!({"encryption_type": "AES256"}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "encryption_type")]
pub enum EncryptionPolicy {
    /// Service-managed AES-256 key.
    #[default]
    #[serde(rename = "AES256")]
    ManagedKey,

    /// Customer key held in KMS.
    #[serde(rename = "KMS")]
    ExternalKey {
        /// Key ARN, key id or alias.
        #[serde(rename = "kms_key")]
        reference: String,
    },
}

impl EncryptionPolicy {
    /// Creates an external-key policy.
    #[must_use]
    pub fn external(reference: impl Into<String>) -> Self {
        Self::ExternalKey {
            reference: reference.into(),
        }
    }

    /// Returns the engine's encryption type string.
    #[must_use]
    pub const fn encryption_type(&self) -> &'static str {
        match self {
            Self::ManagedKey => MANAGED_KEY_TYPE,
            Self::ExternalKey { .. } => EXTERNAL_KEY_TYPE,
        }
    }

    /// Returns the key reference for external-key encryption.
    #[must_use]
    pub fn key_reference(&self) -> Option<&str> {
        match self {
            Self::ManagedKey => None,
            Self::ExternalKey { reference } => Some(reference),
        }
    }
}

impl fmt::Display for EncryptionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManagedKey => f.write_str(MANAGED_KEY_TYPE),
            Self::ExternalKey { reference } => write!(f, "{EXTERNAL_KEY_TYPE}({reference})"),
        }
    }
}

/// Outcome of encryption resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionResolution {
    /// The resolved policy.
    pub policy: EncryptionPolicy,
    /// External-key encryption was requested but no key was given, so the
    /// managed key was used instead.
    pub fell_back: bool,
}

/// Resolves the encryption policy for a configuration.
///
/// External-key encryption is selected only when the flag is set and the key
/// reference is non-empty.
///
/// # Examples
///
/// ```
/// use regdecl_core::{resolve_encryption, EncryptionPolicy, RegistryConfig};
///
/// let config = RegistryConfig::new("my-repo").with_kms_encryption("arn:aws:kms:1");
/// assert_eq!(resolve_encryption(&config), EncryptionPolicy::external("arn:aws:kms:1"));
///
/// let config = RegistryConfig::new("my-repo").with_kms_flag(true);
/// assert_eq!(resolve_encryption(&config), EncryptionPolicy::ManagedKey);
/// ```
#[must_use]
pub fn resolve_encryption(config: &RegistryConfig) -> EncryptionPolicy {
    resolve(config).policy
}

/// Resolves the encryption policy and reports whether a fallback happened.
#[must_use]
pub fn resolve(config: &RegistryConfig) -> EncryptionResolution {
    match (config.enable_kms_encryption, config.external_key_reference()) {
        (true, Some(reference)) => EncryptionResolution {
            policy: EncryptionPolicy::external(reference),
            fell_back: false,
        },
        (requested, _) => EncryptionResolution {
            policy: EncryptionPolicy::ManagedKey,
            fell_back: requested,
        },
    }
}

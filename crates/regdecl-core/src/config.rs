//! Registry configuration.
//!
//! [`RegistryConfig`] is the module's input surface. Field names match the
//! configuration keys accepted in YAML/JSON files.

use serde::{Deserialize, Serialize};

use crate::tags::TagKey;
use crate::validation::{check_repository_name, Validate, ValidationError, ValidationErrors};

/// Field name of the repository name.
pub const FIELD_REPOSITORY_NAME: &str = "repository_name";
/// Field name of the image scanning flag.
pub const FIELD_ENABLE_IMAGE_SCANNING: &str = "enable_image_scanning";
/// Field name of the KMS encryption flag.
pub const FIELD_ENABLE_KMS_ENCRYPTION: &str = "enable_kms_encryption";
/// Field name of the KMS key reference.
pub const FIELD_KMS_KEY: &str = "kms_key";

const fn default_true() -> bool {
    true
}

/// Configuration for a single container registry.
///
/// # Examples
///
/// ```
/// use regdecl_core::RegistryConfig;
///
/// let config: RegistryConfig = serde_json::from_str(r#"{"repository_name": "my-repo"}"#).unwrap();
/// assert!(config.enable_image_scanning);
/// assert!(!config.enable_kms_encryption);
/// assert_eq!(config.kms_key, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Registry name, unique within the account and region.
    #[serde(default)]
    pub repository_name: String,

    /// Scan images when they are pushed.
    #[serde(default = "default_true")]
    pub enable_image_scanning: bool,

    /// Request encryption with an external KMS key.
    #[serde(default)]
    pub enable_kms_encryption: bool,

    /// KMS key reference (ARN, key id or alias). Empty means unset.
    #[serde(default)]
    pub kms_key: String,

    /// `Company` tag value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// `App` tag value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    /// `Env` tag value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    /// `Owner` tag value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// `CostCenter` tag value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costcenter: Option<String>,
}

impl RegistryConfig {
    /// Creates a configuration with every optional field at its default.
    #[must_use]
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            enable_image_scanning: true,
            enable_kms_encryption: false,
            kms_key: String::new(),
            company: None,
            app: None,
            env: None,
            owner: None,
            costcenter: None,
        }
    }

    /// Enables or disables scan-on-push.
    #[must_use]
    pub const fn with_image_scanning(mut self, enabled: bool) -> Self {
        self.enable_image_scanning = enabled;
        self
    }

    /// Sets the KMS encryption flag without touching the key.
    #[must_use]
    pub const fn with_kms_flag(mut self, enabled: bool) -> Self {
        self.enable_kms_encryption = enabled;
        self
    }

    /// Sets the KMS key reference without touching the flag.
    #[must_use]
    pub fn with_kms_key(mut self, key: impl Into<String>) -> Self {
        self.kms_key = key.into();
        self
    }

    /// Enables KMS encryption with the given key.
    #[must_use]
    pub fn with_kms_encryption(self, key: impl Into<String>) -> Self {
        self.with_kms_flag(true).with_kms_key(key)
    }

    /// Sets a tag value.
    #[must_use]
    pub fn with_tag(mut self, key: TagKey, value: impl Into<String>) -> Self {
        *self.tag_slot(key) = Some(value.into());
        self
    }

    /// Returns the configured value for a tag, if any.
    #[must_use]
    pub fn tag(&self, key: TagKey) -> Option<&str> {
        match key {
            TagKey::Company => self.company.as_deref(),
            TagKey::App => self.app.as_deref(),
            TagKey::Env => self.env.as_deref(),
            TagKey::Owner => self.owner.as_deref(),
            TagKey::CostCenter => self.costcenter.as_deref(),
        }
    }

    fn tag_slot(&mut self, key: TagKey) -> &mut Option<String> {
        match key {
            TagKey::Company => &mut self.company,
            TagKey::App => &mut self.app,
            TagKey::Env => &mut self.env,
            TagKey::Owner => &mut self.owner,
            TagKey::CostCenter => &mut self.costcenter,
        }
    }

    /// Returns the KMS key reference, or `None` when it is empty.
    #[must_use]
    pub fn external_key_reference(&self) -> Option<&str> {
        Some(self.kms_key.as_str()).filter(|k| !k.is_empty())
    }

    /// Validates the configuration.
    ///
    /// `strict_names` enforces the registry naming grammar locally; without
    /// it only empty and whitespace-only names are rejected here.
    ///
    /// # Errors
    ///
    /// Returns every failure found, each naming the offending field.
    pub fn validate_with(&self, strict_names: bool) -> Result<(), ValidationErrors> {
        let mut errors =
            check_repository_name(FIELD_REPOSITORY_NAME, &self.repository_name, strict_names);

        if !self.kms_key.is_empty() {
            if self.kms_key.trim().is_empty() {
                errors.add(ValidationError::empty(FIELD_KMS_KEY));
            } else if self.kms_key.chars().any(char::is_whitespace) {
                errors.add(ValidationError::format(
                    FIELD_KMS_KEY,
                    "must be a key ARN, key id or alias without whitespace",
                ));
            }
        }

        errors.into_result()
    }
}

impl Validate for RegistryConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_with(true)
    }
}

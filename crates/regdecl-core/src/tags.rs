//! Fixed tag set applied to the registry.
//!
//! The registry always carries exactly five tags. Each value comes from the
//! configuration when set, otherwise from a placeholder default.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::RegistryConfig;

/// Placeholder for the `Company` tag.
pub const DEFAULT_COMPANY: &str = "YourCompany";
/// Placeholder for the `App` tag.
pub const DEFAULT_APP: &str = "YourApp";
/// Placeholder for the `Env` tag.
pub const DEFAULT_ENV: &str = "dev";
/// Placeholder for the `Owner` tag.
pub const DEFAULT_OWNER: &str = "owner@example.com";
/// Placeholder for the `CostCenter` tag.
pub const DEFAULT_COSTCENTER: &str = "CC-0000";

/// One of the required tag keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKey {
    /// Owning company.
    Company,
    /// Application name.
    App,
    /// Deployment environment.
    Env,
    /// Contact for the registry.
    Owner,
    /// Billing cost center.
    CostCenter,
}

/// Every required tag key, in declaration order.
pub const TAG_KEYS: [TagKey; 5] = [
    TagKey::Company,
    TagKey::App,
    TagKey::Env,
    TagKey::Owner,
    TagKey::CostCenter,
];

impl TagKey {
    /// Tag key as it appears on the cloud resource.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::App => "App",
            Self::Env => "Env",
            Self::Owner => "Owner",
            Self::CostCenter => "CostCenter",
        }
    }

    /// Name of the configuration field that supplies this tag.
    #[must_use]
    pub const fn config_field(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::App => "app",
            Self::Env => "env",
            Self::Owner => "owner",
            Self::CostCenter => "costcenter",
        }
    }

    /// Value used when the configuration leaves the tag unset.
    #[must_use]
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::Company => DEFAULT_COMPANY,
            Self::App => DEFAULT_APP,
            Self::Env => DEFAULT_ENV,
            Self::Owner => DEFAULT_OWNER,
            Self::CostCenter => DEFAULT_COSTCENTER,
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The merged tag document for a registry.
///
/// # Examples
///
/// ```
/// use regdecl_core::{RegistryConfig, TagSet};
/// use regdecl_core::tags::TagKey;
///
/// let config = RegistryConfig::new("my-repo").with_tag(TagKey::Env, "prod");
/// let tags = TagSet::from_config(&config);
///
/// assert_eq!(tags.get(TagKey::Env), "prod");
/// assert_eq!(tags.get(TagKey::Company), "YourCompany");
/// assert_eq!(tags.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: BTreeMap<&'static str, String>,
}

impl TagSet {
    /// Merges configured tag values over the placeholder defaults.
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        let tags = TAG_KEYS
            .iter()
            .map(|&key| {
                let value = config.tag(key).unwrap_or_else(|| key.default_value());
                (key.as_str(), value.to_string())
            })
            .collect();
        Self { tags }
    }

    /// Returns the value for a tag key.
    #[must_use]
    pub fn get(&self, key: TagKey) -> &str {
        self.tags
            .get(key.as_str())
            .map_or_else(|| key.default_value(), String::as_str)
    }

    /// Returns the number of tags (always five).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Always false; a tag set carries every required key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over `(key, value)` pairs ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.tags.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl Default for TagSet {
    fn default() -> Self {
        let tags = TAG_KEYS
            .iter()
            .map(|&key| (key.as_str(), key.default_value().to_string()))
            .collect();
        Self { tags }
    }
}

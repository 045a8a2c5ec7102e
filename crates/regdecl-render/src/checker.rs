//! Pre-flight checks for registry configurations.
//!
//! The checker builds the descriptor and turns validation failures and
//! descriptor findings into a single [`CheckReport`]. Nothing here talks to
//! the provisioning engine.
//!
//! # Example
//!
//! ```rust
//! use regdecl_core::RegistryConfig;
//! use regdecl_render::Checker;
//!
//! let report = Checker::new().check(&RegistryConfig::new("my-repo"));
//! assert!(report.is_valid());
//! assert!(report.descriptor.is_some());
//! ```

use regdecl_core::config::{FIELD_KMS_KEY, FIELD_REPOSITORY_NAME};
use regdecl_core::validation::ValidationErrorKind;
use regdecl_core::{Error, Finding, FindingKind, RegistryConfig, RegistryDescriptor, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for pre-flight checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Whether warnings fail the check.
    pub fail_on_warnings: bool,
    /// Whether the registry naming grammar is enforced locally.
    pub strict_names: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            fail_on_warnings: false,
            strict_names: true,
        }
    }
}

impl CheckerConfig {
    /// Creates a configuration that fails on warnings.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            fail_on_warnings: true,
            ..Default::default()
        }
    }

    /// Leaves the naming grammar to the engine.
    #[must_use]
    pub const fn with_strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }
}

/// Severity of a check issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Informational hint.
    Hint,
    /// Warning - the descriptor is valid but may not be what was intended.
    Warning,
    /// Error - no descriptor is produced.
    Error,
}

/// A problem or observation found by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIssue {
    /// Severity of the issue.
    pub severity: IssueSeverity,
    /// Configuration field the issue refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Suggestion for fixing the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl CheckIssue {
    fn from_validation(error: &ValidationError) -> Self {
        let suggestion = match (error.field.as_str(), error.kind) {
            (FIELD_REPOSITORY_NAME, ValidationErrorKind::Required | ValidationErrorKind::Empty) => {
                Some("set 'repository_name' to the registry to create".to_string())
            }
            (FIELD_REPOSITORY_NAME, _) => Some(
                "use lowercase letters and digits separated by '.', '_', '-' or '/', or disable strict names".to_string(),
            ),
            (FIELD_KMS_KEY, _) => {
                Some("set a key ARN, key id or alias, or remove 'kms_key'".to_string())
            }
            _ => None,
        };

        Self {
            severity: IssueSeverity::Error,
            field: Some(error.field.clone()),
            message: error.message.clone(),
            suggestion,
        }
    }

    fn from_finding(finding: &Finding) -> Self {
        let (severity, suggestion) = match finding.kind {
            FindingKind::KmsFallback => (
                IssueSeverity::Warning,
                "set 'kms_key' or set 'enable_kms_encryption' to false",
            ),
            FindingKind::WildcardPrincipal => (
                IssueSeverity::Hint,
                "attach a narrower repository policy for security-sensitive deployments",
            ),
        };

        Self {
            severity,
            field: finding.field.map(ToString::to_string),
            message: finding.message.clone(),
            suggestion: Some(suggestion.to_string()),
        }
    }
}

/// Result of checking a configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    /// Repository name as configured.
    pub repository: String,
    /// All issues found.
    pub issues: Vec<CheckIssue>,
    /// The descriptor, when the configuration is valid.
    #[serde(skip)]
    pub descriptor: Option<RegistryDescriptor>,
}

impl CheckReport {
    /// Adds an issue to the report.
    pub fn add_issue(&mut self, issue: CheckIssue) {
        self.issues.push(issue);
    }

    /// Returns whether the check passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == IssueSeverity::Error)
    }

    /// Returns whether the check passed strictly (no errors or warnings).
    #[must_use]
    pub fn is_valid_strict(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|i| i.severity >= IssueSeverity::Warning)
    }

    /// Returns whether the report passes under the given configuration.
    #[must_use]
    pub fn passed(&self, config: &CheckerConfig) -> bool {
        if config.fail_on_warnings {
            self.is_valid_strict()
        } else {
            self.is_valid()
        }
    }

    /// Returns only error-level issues.
    #[must_use]
    pub fn errors(&self) -> Vec<&CheckIssue> {
        self.with_severity(IssueSeverity::Error)
    }

    /// Returns only warning-level issues.
    #[must_use]
    pub fn warnings(&self) -> Vec<&CheckIssue> {
        self.with_severity(IssueSeverity::Warning)
    }

    /// Returns only hint-level issues.
    #[must_use]
    pub fn hints(&self) -> Vec<&CheckIssue> {
        self.with_severity(IssueSeverity::Hint)
    }

    /// Returns `(errors, warnings, hints)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.errors().len(),
            self.warnings().len(),
            self.hints().len(),
        )
    }

    fn with_severity(&self, severity: IssueSeverity) -> Vec<&CheckIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }
}

/// Checks registry configurations.
#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckerConfig,
}

impl Checker {
    /// Creates a checker with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checker with the given configuration.
    #[must_use]
    pub const fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// Creates a checker that fails on warnings.
    #[must_use]
    pub fn strict() -> Self {
        Self::with_config(CheckerConfig::strict())
    }

    /// Returns the checker configuration.
    #[must_use]
    pub const fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Checks a configuration and builds its descriptor if valid.
    #[must_use]
    pub fn check(&self, config: &RegistryConfig) -> CheckReport {
        info!(repository = %config.repository_name, "Checking registry configuration");

        let mut report = CheckReport {
            repository: config.repository_name.clone(),
            ..Default::default()
        };

        match RegistryDescriptor::builder(config)
            .strict_names(self.config.strict_names)
            .build()
        {
            Ok(descriptor) => {
                for finding in &descriptor.findings {
                    report.add_issue(CheckIssue::from_finding(finding));
                }
                report.descriptor = Some(descriptor);
            }
            Err(Error::Configuration(errors)) => {
                for error in errors.iter() {
                    report.add_issue(CheckIssue::from_validation(error));
                }
            }
            Err(other) => report.add_issue(CheckIssue {
                severity: IssueSeverity::Error,
                field: None,
                message: other.to_string(),
                suggestion: None,
            }),
        }

        let (errors, warnings, hints) = report.counts();
        debug!(errors, warnings, hints, "Check complete");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_with_hint() {
        let report = Checker::new().check(&RegistryConfig::new("my-repo"));
        assert!(report.is_valid());
        assert!(report.is_valid_strict());
        assert_eq!(report.counts(), (0, 0, 1));
        assert!(report.passed(&CheckerConfig::strict()));
    }

    #[test]
    fn test_empty_name_reports_error_without_descriptor() {
        let report = Checker::new().check(&RegistryConfig::new(""));
        assert!(!report.is_valid());
        assert!(report.descriptor.is_none());

        let errors = report.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field.as_deref(), Some("repository_name"));
        assert!(errors[0].suggestion.is_some());
    }

    #[test]
    fn test_fallback_fails_only_strict() {
        let config = RegistryConfig::new("my-repo").with_kms_flag(true);
        let report = Checker::new().check(&config);

        assert!(report.passed(&CheckerConfig::default()));
        assert!(!report.passed(&CheckerConfig::strict()));
        assert_eq!(report.warnings()[0].field.as_deref(), Some("kms_key"));
    }

    #[test]
    fn test_relaxed_names() {
        let config = RegistryConfig::new("Mixed/Case");
        assert!(!Checker::new().check(&config).is_valid());

        let relaxed = Checker::with_config(CheckerConfig::default().with_strict_names(false));
        assert!(relaxed.check(&config).is_valid());
    }

    #[test]
    fn test_report_serialization() {
        let report = Checker::new().check(&RegistryConfig::new(""));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["repository"], "");
        assert_eq!(json["issues"][0]["severity"], "error");
        assert!(json.get("descriptor").is_none());
    }
}

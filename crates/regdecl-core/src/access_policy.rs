//! Repository access policy.
//!
//! The policy is a constant statement granting push and pull actions to
//! every principal. Only the repository it is attached to varies.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Policy language version used by the statement document.
pub const POLICY_VERSION: &str = "2008-10-17";

/// Statement id of the push/pull grant.
pub const DEFAULT_STATEMENT_SID: &str = "AllowPushPull";

/// Principal matching any caller.
///
/// This is the default and it is permissive: anyone able to reach the
/// registry may push and pull. Deployments that need tighter access must
/// override the policy outside this module.
pub const WILDCARD_PRINCIPAL: &str = "*";

/// Effect of the push/pull grant.
pub const EFFECT_ALLOW: &str = "Allow";

/// Actions granted on the repository.
pub const REPOSITORY_ACTIONS: [&str; 6] = [
    "ecr:BatchCheckLayerAvailability",
    "ecr:CompleteLayerUpload",
    "ecr:GetDownloadUrlForLayer",
    "ecr:InitiateLayerUpload",
    "ecr:PutImage",
    "ecr:UploadLayerPart",
];

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement id.
    #[serde(rename = "Sid")]
    pub sid: String,
    /// `Allow` or `Deny`.
    #[serde(rename = "Effect")]
    pub effect: String,
    /// Principal the statement applies to.
    #[serde(rename = "Principal")]
    pub principal: String,
    /// Granted actions.
    #[serde(rename = "Action")]
    pub actions: Vec<String>,
}

/// Authorization document in the engine's fixed schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Policy language version.
    #[serde(rename = "Version")]
    pub version: String,
    /// Statements in the document.
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

/// Access policy bound to one repository.
///
/// # Examples
///
/// ```
/// use regdecl_core::AccessPolicy;
///
/// let policy = AccessPolicy::for_repository("my-repo");
/// assert_eq!(policy.repository, "my-repo");
/// assert!(policy.grants_wildcard());
/// assert_eq!(policy.actions().count(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Repository the policy is attached to.
    pub repository: String,
    /// The authorization document.
    pub document: PolicyDocument,
}

impl AccessPolicy {
    /// Builds the push/pull policy for a repository.
    #[must_use]
    pub fn for_repository(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statements: vec![Statement {
                    sid: DEFAULT_STATEMENT_SID.to_string(),
                    effect: EFFECT_ALLOW.to_string(),
                    principal: WILDCARD_PRINCIPAL.to_string(),
                    actions: REPOSITORY_ACTIONS.iter().map(ToString::to_string).collect(),
                }],
            },
        }
    }

    /// Iterates over every action granted by the document.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.document
            .statements
            .iter()
            .flat_map(|s| s.actions.iter().map(String::as_str))
    }

    /// Returns true if any statement applies to every principal.
    #[must_use]
    pub fn grants_wildcard(&self) -> bool {
        self.document
            .statements
            .iter()
            .any(|s| s.principal == WILDCARD_PRINCIPAL)
    }

    /// Serializes the document as the JSON string the engine expects.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let policy = AccessPolicy::for_repository("my-repo");
        let json: serde_json::Value = serde_json::from_str(&policy.to_json().unwrap()).unwrap();

        assert_eq!(json["Version"], POLICY_VERSION);
        let statement = &json["Statement"][0];
        assert_eq!(statement["Sid"], DEFAULT_STATEMENT_SID);
        assert_eq!(statement["Effect"], "Allow");
        assert_eq!(statement["Principal"], "*");
        assert_eq!(statement["Action"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_actions_are_fixed() {
        let a = AccessPolicy::for_repository("a1");
        let b = AccessPolicy::for_repository("team/b2");
        assert_eq!(a.document, b.document);

        let actions: Vec<_> = a.actions().collect();
        assert_eq!(actions, REPOSITORY_ACTIONS.to_vec());
    }

    #[test]
    fn test_wildcard_detection() {
        let mut policy = AccessPolicy::for_repository("my-repo");
        assert!(policy.grants_wildcard());

        policy.document.statements[0].principal = "arn:aws:iam::111122223333:root".into();
        assert!(!policy.grants_wildcard());
    }
}

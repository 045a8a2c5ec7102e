//! Terraform JSON configuration output.
//!
//! Produces a document in Terraform's JSON configuration syntax declaring the
//! registry, its repository policy and the two outputs. The policy resource
//! references the registry by name so the engine orders them correctly.

use regdecl_core::outputs::OUTPUTS;
use regdecl_core::{EncryptionPolicy, RegistryDescriptor};
use serde_json::{json, Map, Value};

use crate::error::{RenderError, Result};

/// Resource type of the registry.
pub const REPOSITORY_RESOURCE_TYPE: &str = "aws_ecr_repository";

/// Resource type of the repository policy.
pub const POLICY_RESOURCE_TYPE: &str = "aws_ecr_repository_policy";

/// Label used when none is given.
pub const DEFAULT_LABEL: &str = "this";

/// Returns true if `label` is a valid Terraform identifier.
#[must_use]
pub fn is_valid_label(label: &str) -> bool {
    let mut chars = label.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Renders a descriptor as a Terraform JSON document.
///
/// # Errors
///
/// Returns an error if the label is invalid or the policy document cannot
/// be serialized.
pub fn to_terraform_json(descriptor: &RegistryDescriptor, label: &str) -> Result<Value> {
    if !is_valid_label(label) {
        return Err(RenderError::InvalidLabel {
            label: label.to_string(),
        });
    }

    let repository = &descriptor.repository;
    let repository_ref = format!("{REPOSITORY_RESOURCE_TYPE}.{label}");

    let repository_block = json!({
        "name": repository.name,
        "image_scanning_configuration": {
            "scan_on_push": repository.scan_on_push,
        },
        "encryption_configuration": encryption_block(&repository.encryption),
        "tags": repository.tags,
    });

    let policy_block = json!({
        "repository": format!("${{{repository_ref}.name}}"),
        "policy": descriptor.access_policy.to_json()?,
    });

    let outputs: Map<String, Value> = OUTPUTS
        .iter()
        .map(|output| {
            (
                output.name.to_string(),
                json!({
                    "value": format!("${{{repository_ref}.{}}}", output.attribute),
                    "description": output.description,
                }),
            )
        })
        .collect();

    Ok(json!({
        "resource": {
            REPOSITORY_RESOURCE_TYPE: { label: repository_block },
            POLICY_RESOURCE_TYPE: { label: policy_block },
        },
        "output": outputs,
    }))
}

fn encryption_block(encryption: &EncryptionPolicy) -> Value {
    let mut block = Map::new();
    block.insert(
        "encryption_type".to_string(),
        Value::from(encryption.encryption_type()),
    );
    if let Some(key) = encryption.key_reference() {
        block.insert("kms_key".to_string(), Value::from(key));
    }
    Value::Object(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regdecl_core::RegistryConfig;

    fn render(config: &RegistryConfig) -> Value {
        let descriptor = RegistryDescriptor::from_config(config).unwrap();
        to_terraform_json(&descriptor, DEFAULT_LABEL).unwrap()
    }

    #[test]
    fn test_repository_block() {
        let doc = render(&RegistryConfig::new("my-repo"));
        let repo = &doc["resource"]["aws_ecr_repository"]["this"];

        assert_eq!(repo["name"], "my-repo");
        assert_eq!(repo["image_scanning_configuration"]["scan_on_push"], true);
        assert_eq!(
            repo["encryption_configuration"],
            json!({"encryption_type": "AES256"})
        );
        assert_eq!(repo["tags"]["Company"], "YourCompany");
    }

    #[test]
    fn test_kms_block() {
        let doc = render(&RegistryConfig::new("my-repo").with_kms_encryption("arn:aws:kms:1"));
        assert_eq!(
            doc["resource"]["aws_ecr_repository"]["this"]["encryption_configuration"],
            json!({"encryption_type": "KMS", "kms_key": "arn:aws:kms:1"})
        );
    }

    #[test]
    fn test_policy_references_repository() {
        let doc = render(&RegistryConfig::new("my-repo"));
        let policy = &doc["resource"]["aws_ecr_repository_policy"]["this"];

        assert_eq!(policy["repository"], "${aws_ecr_repository.this.name}");
        let statement: Value = serde_json::from_str(policy["policy"].as_str().unwrap()).unwrap();
        assert_eq!(statement["Statement"][0]["Principal"], "*");
    }

    #[test]
    fn test_outputs() {
        let doc = render(&RegistryConfig::new("my-repo"));
        assert_eq!(
            doc["output"]["repository_url"]["value"],
            "${aws_ecr_repository.this.repository_url}"
        );
        assert_eq!(
            doc["output"]["repository_arn"]["value"],
            "${aws_ecr_repository.this.arn}"
        );
    }

    #[test]
    fn test_custom_label() {
        let descriptor = RegistryDescriptor::from_config(&RegistryConfig::new("my-repo")).unwrap();
        let doc = to_terraform_json(&descriptor, "registry_main").unwrap();
        assert!(doc["resource"]["aws_ecr_repository"]["registry_main"].is_object());
        assert_eq!(
            doc["output"]["repository_arn"]["value"],
            "${aws_ecr_repository.registry_main.arn}"
        );
    }

    #[test]
    fn test_label_validation() {
        assert!(is_valid_label("this"));
        assert!(is_valid_label("_private-1"));
        assert!(!is_valid_label(""));
        assert!(!is_valid_label("1st"));
        assert!(!is_valid_label("has space"));

        let descriptor = RegistryDescriptor::from_config(&RegistryConfig::new("my-repo")).unwrap();
        assert!(matches!(
            to_terraform_json(&descriptor, "bad.label"),
            Err(RenderError::InvalidLabel { .. })
        ));
    }
}

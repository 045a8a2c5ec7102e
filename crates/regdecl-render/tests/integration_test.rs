//! End-to-end tests from configuration text to rendered engine documents.

use regdecl_core::{EncryptionPolicy, RegistryConfig};
use regdecl_render::{Checker, CheckerConfig, Encoding, IssueSeverity, OutputFormat, Renderer};
use serde_json::{json, Value};

fn config_from_yaml(yaml: &str) -> RegistryConfig {
    serde_yaml::from_str(yaml).expect("configuration should parse")
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_defaults_only() {
    let config = config_from_yaml("repository_name: my-repo\n");
    let report = Checker::new().check(&config);
    assert!(report.is_valid());

    let descriptor = report.descriptor.expect("descriptor for valid config");
    assert!(descriptor.repository.scan_on_push);
    assert_eq!(descriptor.repository.encryption, EncryptionPolicy::ManagedKey);

    let tags = serde_json::to_value(descriptor.tags()).unwrap();
    assert_eq!(
        tags,
        json!({
            "Company": "YourCompany",
            "App": "YourApp",
            "Env": "dev",
            "Owner": "owner@example.com",
            "CostCenter": "CC-0000",
        })
    );
}

#[test]
fn test_scenario_kms_key() {
    let config = config_from_yaml(
        "repository_name: my-repo\nenable_kms_encryption: true\nkms_key: arn:aws:kms:1\n",
    );
    let descriptor = Checker::new().check(&config).descriptor.unwrap();
    assert_eq!(
        descriptor.repository.encryption,
        EncryptionPolicy::external("arn:aws:kms:1")
    );
}

#[test]
fn test_scenario_empty_name() {
    let config = config_from_yaml("repository_name: \"\"\n");
    let report = Checker::new().check(&config);

    assert!(!report.is_valid());
    assert!(report.descriptor.is_none());
    assert_eq!(report.errors()[0].field.as_deref(), Some("repository_name"));
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_terraform_document_from_json_config() {
    let config: RegistryConfig = serde_json::from_str(
        r#"{
            "repository_name": "platform/api",
            "enable_image_scanning": false,
            "company": "Acme",
            "env": "prod"
        }"#,
    )
    .unwrap();
    let descriptor = Checker::new().check(&config).descriptor.unwrap();

    let document = Renderer::new()
        .with_format(OutputFormat::Terraform)
        .render(&descriptor)
        .unwrap();
    let doc: Value = serde_json::from_str(&document.content).unwrap();

    let repo = &doc["resource"]["aws_ecr_repository"]["this"];
    assert_eq!(repo["name"], "platform/api");
    assert_eq!(repo["image_scanning_configuration"]["scan_on_push"], false);
    assert_eq!(repo["tags"]["Company"], "Acme");
    assert_eq!(repo["tags"]["Env"], "prod");
    assert_eq!(repo["tags"]["App"], "YourApp");

    let outputs = doc["output"].as_object().unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(outputs.contains_key("repository_url"));
    assert!(outputs.contains_key("repository_arn"));
}

#[test]
fn test_policy_actions_identical_across_configs() {
    let configs = [
        RegistryConfig::new("a1"),
        RegistryConfig::new("team/b2").with_kms_encryption("alias/x"),
        RegistryConfig::new("c3").with_image_scanning(false).with_kms_flag(true),
    ];

    let policies: Vec<Value> = configs
        .iter()
        .map(|config| {
            let descriptor = Checker::new().check(config).descriptor.unwrap();
            let doc = Renderer::new()
                .with_format(OutputFormat::Terraform)
                .to_value(&descriptor)
                .unwrap();
            let policy = doc["resource"]["aws_ecr_repository_policy"]["this"]["policy"]
                .as_str()
                .unwrap()
                .to_string();
            serde_json::from_str(&policy).unwrap()
        })
        .collect();

    assert!(policies.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_yaml_and_json_encode_same_document() {
    let descriptor = Checker::new()
        .check(&RegistryConfig::new("my-repo"))
        .descriptor
        .unwrap();

    let json_doc = Renderer::new().render(&descriptor).unwrap();
    let yaml_doc = Renderer::new()
        .with_encoding(Encoding::Yaml)
        .render(&descriptor)
        .unwrap();

    let from_json: Value = serde_json::from_str(&json_doc.content).unwrap();
    let from_yaml: Value = serde_yaml::from_str(&yaml_doc.content).unwrap();
    assert_eq!(from_json, from_yaml);
    assert_eq!(json_doc.fingerprint, yaml_doc.fingerprint);
}

// =============================================================================
// Strictness
// =============================================================================

#[test]
fn test_kms_fallback_is_flagged() {
    let config = config_from_yaml("repository_name: my-repo\nenable_kms_encryption: true\n");
    let report = Checker::new().check(&config);

    let descriptor = report.descriptor.as_ref().unwrap();
    assert_eq!(descriptor.repository.encryption, EncryptionPolicy::ManagedKey);
    assert!(report
        .issues
        .iter()
        .any(|i| i.severity == IssueSeverity::Warning));
    assert!(report.passed(&CheckerConfig::default()));
    assert!(!report.passed(&CheckerConfig::strict()));
}

#[test]
fn test_wildcard_principal_is_a_hint() {
    let report = Checker::strict().check(&RegistryConfig::new("my-repo"));
    let hints = report.hints();
    assert_eq!(hints.len(), 1);
    assert!(hints[0].message.contains("every principal"));
    assert!(report.passed(Checker::strict().config()));
}

//! Defaults command implementation.

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};

use regdecl_core::access_policy::{REPOSITORY_ACTIONS, WILDCARD_PRINCIPAL};
use regdecl_core::encryption::MANAGED_KEY_TYPE;
use regdecl_core::tags::TAG_KEYS;

/// Arguments for the defaults command.
#[derive(Args)]
pub struct DefaultsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the defaults command.
pub fn run(args: &DefaultsArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&defaults_table())?);
        return Ok(());
    }

    println!("Configuration defaults");
    println!("======================");
    println!("  repository_name        (required)");
    println!("  enable_image_scanning  true");
    println!("  enable_kms_encryption  false");
    println!("  kms_key                \"\"  (encryption falls back to {MANAGED_KEY_TYPE})");
    for key in TAG_KEYS {
        println!("  {:<22} {}", key.config_field(), key.default_value());
    }
    println!();
    println!("Access policy (fixed)");
    println!("  principal  {WILDCARD_PRINCIPAL}");
    for action in REPOSITORY_ACTIONS {
        println!("  action     {action}");
    }
    Ok(())
}

fn defaults_table() -> Value {
    let tags: serde_json::Map<String, Value> = TAG_KEYS
        .iter()
        .map(|key| (key.config_field().to_string(), Value::from(key.default_value())))
        .collect();

    json!({
        "enable_image_scanning": true,
        "enable_kms_encryption": false,
        "kms_key": "",
        "encryption_fallback": MANAGED_KEY_TYPE,
        "tags": tags,
        "access_policy": {
            "principal": WILDCARD_PRINCIPAL,
            "actions": REPOSITORY_ACTIONS,
        },
    })
}

//! Render command implementation.
//!
//! Writes the document an engine would receive, without contacting one.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use regdecl_render::{Checker, Encoding, OutputFormat, Renderer};

use super::settings::ConfigArgs;
use super::validate::write_report;

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Document layout: descriptor, terraform
    #[arg(short, long, default_value = "descriptor")]
    pub format: OutputFormat,

    /// Document encoding: json, yaml
    #[arg(short, long, default_value = "json")]
    pub encoding: Encoding,

    /// Resource label used by the terraform layout
    #[arg(long, default_value = "this")]
    pub label: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Runs the render command.
pub fn run(args: &RenderArgs) -> Result<()> {
    let config = args.config.load()?;
    info!(repository = %config.repository_name, format = %args.format, "Rendering configuration");

    // Issues go to stderr; stdout carries only the document
    let report = Checker::with_config(args.config.checker_config(false)).check(&config);
    write_report(&mut io::stderr().lock(), &report, false)?;
    let Some(descriptor) = report.descriptor.as_ref() else {
        anyhow::bail!("{} validation errors", report.errors().len());
    };

    let document = Renderer::new()
        .with_format(args.format)
        .with_encoding(args.encoding)
        .with_label(&args.label)
        .render(descriptor)
        .context("Failed to render descriptor")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &document.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Wrote {} ({})", path.display(), document.fingerprint);
        }
        None => print!("{}", document.content),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn args(config: ConfigArgs, output: Option<PathBuf>) -> RenderArgs {
        RenderArgs {
            config,
            format: OutputFormat::Terraform,
            encoding: Encoding::Json,
            label: "this".to_string(),
            output,
        }
    }

    #[test]
    fn test_run_writes_terraform_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.tf.json");
        let config = ConfigArgs {
            repository_name: Some("my-repo".to_string()),
            ..Default::default()
        };

        run(&args(config, Some(path.clone()))).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("aws_ecr_repository"));
        let doc: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["resource"]["aws_ecr_repository"]["this"]["name"], "my-repo");
    }

    #[test]
    fn test_run_kms_fallback_still_renders() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.tf.json");
        let config = ConfigArgs {
            repository_name: Some("my-repo".to_string()),
            enable_kms_encryption: Some(true),
            ..Default::default()
        };

        run(&args(config, Some(path.clone()))).unwrap();
        let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            doc["resource"]["aws_ecr_repository"]["this"]["encryption_configuration"]["encryption_type"],
            "AES256"
        );
    }

    #[test]
    fn test_run_invalid_config_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.tf.json");

        let err = run(&args(ConfigArgs::default(), Some(path.clone()))).unwrap_err();
        assert!(err.to_string().contains("validation errors"));
        assert!(!path.exists());
    }
}

//! Apply command implementation.
//!
//! Checks and renders the configuration, then hands the document to an
//! external engine program and prints the registry outputs.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use regdecl_engine::{Applied, CommandEngine, ProvisionError, Provisioner};
use regdecl_render::{Encoding, OutputFormat, Renderer};

use super::settings::ConfigArgs;
use super::validate::write_report;

/// Arguments for the apply command.
#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Engine program that reconciles the document
    #[arg(long, env = "REGDECL_ENGINE_COMMAND")]
    pub engine_command: String,

    /// Argument passed to the engine program (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Working directory of the engine program
    #[arg(long, env = "REGDECL_ENGINE_DIR")]
    pub engine_dir: Option<PathBuf>,

    /// Document layout handed to the engine: descriptor, terraform
    #[arg(long, default_value = "terraform")]
    pub format: OutputFormat,

    /// Document encoding: json, yaml
    #[arg(long, default_value = "json")]
    pub encoding: Encoding,

    /// Treat warnings (such as a KMS fallback) as errors
    #[arg(long)]
    pub strict: bool,

    /// Check and render only; do not run the engine
    #[arg(long)]
    pub dry_run: bool,

    /// Output format: text, json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub output: String,
}

/// Executes the apply command.
pub async fn execute(args: ApplyArgs) -> Result<()> {
    let config = args.config.load()?;

    let mut engine = CommandEngine::new(&args.engine_command).args(args.engine_args.iter().cloned());
    if let Some(dir) = &args.engine_dir {
        engine = engine.current_dir(dir);
    }

    let provisioner = Provisioner::new(engine)
        .with_checker(args.config.checker_config(args.strict))
        .with_renderer(
            Renderer::new()
                .with_format(args.format)
                .with_encoding(args.encoding),
        );

    if args.dry_run {
        let plan = provisioner.plan(&config).map_err(|e| report_error(e, &args))?;
        write_report(&mut io::stdout().lock(), &plan.report, false)?;
        println!("Dry run - engine not started");
        println!("  Repository:  {}", plan.document.repository);
        println!("  Fingerprint: {}", plan.document.fingerprint);
        return Ok(());
    }

    info!(repository = %config.repository_name, engine = %args.engine_command, "Applying registry");
    let applied = provisioner
        .apply(&config)
        .await
        .map_err(|e| report_error(e, &args))?;

    if args.output == "json" {
        print_json_output(&applied)?;
    } else {
        print_text_output(&applied)?;
    }
    Ok(())
}

fn report_error(err: ProvisionError, args: &ApplyArgs) -> anyhow::Error {
    if let ProvisionError::Configuration(report) = &err {
        if args.output == "json" {
            if let Ok(json) = serde_json::to_string_pretty(report) {
                println!("{json}");
            }
        } else {
            let _ = write_report(&mut io::stderr().lock(), report, false);
        }
    }
    err.into()
}

fn print_text_output(applied: &Applied) -> Result<()> {
    write_report(&mut io::stdout().lock(), &applied.plan.report, false)?;
    println!("✓ Registry {} reconciled", applied.plan.document.repository);
    for (name, value) in applied.handle.outputs() {
        println!("  {name} = {value}");
    }
    Ok(())
}

fn print_json_output(applied: &Applied) -> Result<()> {
    let json = serde_json::json!({
        "repository": applied.plan.document.repository,
        "fingerprint": applied.plan.document.fingerprint,
        "outputs": applied.handle.outputs(),
        "issues": applied.plan.report.issues,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(config: ConfigArgs, strict: bool, dry_run: bool) -> ApplyArgs {
        ApplyArgs {
            config,
            engine_command: "/nonexistent/regdecl-engine".to_string(),
            engine_args: Vec::new(),
            engine_dir: None,
            format: OutputFormat::Terraform,
            encoding: Encoding::Json,
            strict,
            dry_run,
            output: "text".to_string(),
        }
    }

    fn named(name: &str) -> ConfigArgs {
        ConfigArgs {
            repository_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dry_run_does_not_start_engine() {
        assert!(execute(args(named("my-repo"), false, true)).await.is_ok());
    }

    #[tokio::test]
    async fn test_configuration_error_fails_before_engine() {
        let err = execute(args(named(""), false, false)).await.unwrap_err();
        let err = err.downcast::<ProvisionError>().unwrap();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_strict_rejects_kms_fallback() {
        let mut config = named("my-repo");
        config.enable_kms_encryption = Some(true);

        let err = execute(args(config, true, true)).await.unwrap_err();
        assert!(matches!(
            err.downcast::<ProvisionError>().unwrap(),
            ProvisionError::Configuration(_)
        ));
    }

    #[tokio::test]
    async fn test_engine_error_is_reported() {
        let err = execute(args(named("my-repo"), false, false)).await.unwrap_err();
        let err = err.downcast::<ProvisionError>().unwrap();
        assert!(!err.is_configuration());
    }
}

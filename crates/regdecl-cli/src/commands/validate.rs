//! Validate command implementation.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use tracing::info;

use regdecl_render::{fingerprint, CheckReport, Checker, IssueSeverity};

use super::settings::ConfigArgs;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Treat warnings (such as a KMS fallback) as errors
    #[arg(long)]
    pub strict: bool,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the validate command.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let config = args.config.load()?;
    info!(repository = %config.repository_name, strict = args.strict, "Validating configuration");

    let checker = Checker::with_config(args.config.checker_config(args.strict));
    let report = checker.check(&config);

    println!("Regdecl Configuration Validator");
    println!("===============================");
    println!("Repository: {}", report.repository);
    println!();

    write_report(&mut io::stdout().lock(), &report, args.verbose)?;

    if args.verbose {
        if let Some(descriptor) = &report.descriptor {
            println!();
            println!("Descriptor:");
            println!("  Scan on push: {}", descriptor.repository.scan_on_push);
            println!("  Encryption:   {}", descriptor.repository.encryption);
            for (key, value) in descriptor.tags().iter() {
                println!("  Tag {key}: {value}");
            }
            println!("  Fingerprint:  {}", fingerprint(descriptor)?);
        }
    }

    if !report.passed(checker.config()) {
        let (errors, warnings, _) = report.counts();
        if errors > 0 {
            anyhow::bail!("{errors} validation errors");
        }
        anyhow::bail!("{warnings} warnings (strict mode)");
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Writes the issues of a report. Hints are shown only when verbose.
pub fn write_report(out: &mut impl Write, report: &CheckReport, verbose: bool) -> io::Result<()> {
    for issue in &report.issues {
        let marker = match issue.severity {
            IssueSeverity::Error => "✗ Error",
            IssueSeverity::Warning => "⚠ Warning",
            IssueSeverity::Hint if verbose => "ℹ Hint",
            IssueSeverity::Hint => continue,
        };
        match &issue.field {
            Some(field) => writeln!(out, "{marker} [{field}]: {}", issue.message)?,
            None => writeln!(out, "{marker}: {}", issue.message)?,
        }
        if let Some(suggestion) = &issue.suggestion {
            writeln!(out, "    → {suggestion}")?;
        }
    }
    Ok(())
}

//! CLI commands and argument parsing.

pub mod apply;
pub mod defaults;
pub mod render;
pub mod settings;
pub mod validate;

use clap::{Parser, Subcommand};

/// Regdecl - declarative container registry provisioning
#[derive(Parser)]
#[command(name = "regdecl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Render the engine document for a configuration
    Render(render::RenderArgs),

    /// Validate a configuration
    Validate(validate::ValidateArgs),

    /// Provision the registry through an engine program
    Apply(apply::ApplyArgs),

    /// Show configuration defaults
    Defaults(defaults::DefaultsArgs),

    /// Print version information
    Version,
}

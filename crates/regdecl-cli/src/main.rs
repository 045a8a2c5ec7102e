//! Regdecl CLI - declarative container registry provisioning.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered documents can be piped from stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regdecl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(&args),
        Commands::Validate(args) => commands::validate::run(&args),
        Commands::Apply(args) => commands::apply::execute(args).await,
        Commands::Defaults(args) => commands::defaults::run(&args),
        Commands::Version => {
            println!("regdecl {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

//! newsletter-deploy CLI entry point.

use anyhow::Result;
use clap::Parser;
use newsletter_deploy::cli::Cli;
use newsletter_deploy::commands;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so synthesized output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsletter_deploy=info,newsletter_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    commands::run(cli)?;
    Ok(())
}

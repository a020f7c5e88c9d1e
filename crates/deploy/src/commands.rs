//! Command execution (Imperative Shell).

use std::path::Path;

use newsletter_core::stack::newsletter_stack;
use newsletter_core::topology::{audit, format_topology, to_json_string, Topology};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::DeployConfig;
use crate::error::Result;
use crate::output::{format_json, pretty};
use crate::prelude::*;

/// Main entry point for every command.
pub fn run(cli: Cli) -> Result<()> {
    let config = DeployConfig::from_cli(&cli);

    tracing::info!(
        stack = %config.props.stack_name,
        variant = ?config.variant,
        region = config.props.environment.region.as_deref().unwrap_or("agnostic"),
        "Building topology"
    );
    let topology = newsletter_stack(config.variant, &config.props)?;

    if !Path::new(&config.props.artifact).exists() {
        tracing::warn!(
            artifact = %config.props.artifact,
            "Artifact not found; package the function before deploying the template"
        );
    }

    match cli.command {
        Commands::Synth { out } => synth(&topology, out.as_deref(), cli.quiet),
        Commands::Plan => plan(&topology, cli.format),
        Commands::Permissions => permissions(&topology, cli.format),
    }
}

fn synth(topology: &Topology, out: Option<&Path>, quiet: bool) -> Result<()> {
    let rendered = to_json_string(topology)?;
    match out {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::debug!(path = %path.display(), "Template written");
            if !quiet {
                aprintln!("{} {}", p_g("Template written to"), path.display());
            }
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn plan(topology: &Topology, format: OutputFormat) -> Result<()> {
    let lines = format_topology(topology);
    match format {
        OutputFormat::Json => println!("{}", format_json(&lines)?),
        OutputFormat::Pretty => {
            aprintln!("{}", p_b("Topology Plan:"));
            for line in &lines {
                aprintln!("  {}", pretty::colorize_plan_line(line));
            }
        }
    }
    Ok(())
}

fn permissions(topology: &Topology, format: OutputFormat) -> Result<()> {
    let report = audit(topology);
    match format {
        OutputFormat::Json => println!("{}", format_json(&report)?),
        OutputFormat::Pretty => println!("{}", pretty::format_permissions(&report)),
    }
    Ok(())
}

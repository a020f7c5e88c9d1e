//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use newsletter_core::stack::{
    StackVariant, DEFAULT_ARTIFACT, DEFAULT_FUNCTION_NAME, DEFAULT_REGION, DEFAULT_STACK_NAME,
    DEFAULT_TABLE_NAME,
};

/// Synthesize the newsletter deployment topology.
#[derive(Debug, Parser)]
#[command(name = "newsletter-deploy")]
#[command(version, about = "Synthesize the newsletter deployment topology", long_about = None)]
pub struct Cli {
    /// Stack name.
    #[arg(long, env = "NEWSLETTER_STACK_NAME", default_value = DEFAULT_STACK_NAME)]
    pub stack_name: String,

    /// Which topology to assemble.
    #[arg(long, value_enum, default_value_t = Variant::Subscribers)]
    pub variant: Variant,

    /// Path to the packaged function artifact.
    #[arg(long, env = "NEWSLETTER_ARTIFACT", default_value = DEFAULT_ARTIFACT)]
    pub artifact: String,

    /// Physical function name.
    #[arg(long, default_value = DEFAULT_FUNCTION_NAME)]
    pub function_name: String,

    /// Physical table name (subscribers variant only).
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    pub table_name: String,

    /// Target region.
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Target account.
    #[arg(long, env = "AWS_ACCOUNT_ID")]
    pub account: Option<String>,

    /// Ignore region and account and produce an environment-agnostic topology.
    #[arg(long)]
    pub agnostic: bool,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output with colors.
    #[default]
    Pretty,
}

/// Topology variants selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Subscriber table plus table-scoped and email grants.
    Subscribers,
    /// Function only, with an account-level table listing grant.
    FunctionOnly,
}

impl From<Variant> for StackVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Subscribers => StackVariant::Subscribers,
            Variant::FunctionOnly => StackVariant::FunctionOnly,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the deployment template as JSON.
    Synth {
        /// Write the template to this file instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Show the resources the topology declares.
    Plan,
    /// List every (action, resource) pair granted to each function.
    Permissions,
}

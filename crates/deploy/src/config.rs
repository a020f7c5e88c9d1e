//! Deployment inputs resolved from the command line and environment.

use newsletter_core::stack::{StackProps, StackVariant};
use newsletter_core::topology::Environment;

use crate::cli::Cli;

/// Everything the stack needs, after flags and environment variables are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub variant: StackVariant,
    pub props: StackProps,
}

impl DeployConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            variant: cli.variant.into(),
            props: StackProps {
                stack_name: cli.stack_name.clone(),
                environment: resolve_environment(&cli.region, cli.account.as_deref(), cli.agnostic),
                artifact: cli.artifact.clone(),
                function_name: cli.function_name.clone(),
                table_name: cli.table_name.clone(),
            },
        }
    }
}

/// Builds the target environment. Blank values count as absent.
pub fn resolve_environment(region: &str, account: Option<&str>, agnostic: bool) -> Environment {
    if agnostic {
        return Environment::agnostic();
    }
    Environment {
        account: account
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string),
        region: Some(region.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_resolve_environment_with_region_and_account() {
        let env = resolve_environment("eu-west-2", Some("123456789012"), false);

        assert_eq!(env.region.as_deref(), Some("eu-west-2"));
        assert_eq!(env.account.as_deref(), Some("123456789012"));
    }

    #[test]
    fn test_resolve_environment_agnostic_wins() {
        let env = resolve_environment("eu-west-2", Some("123456789012"), true);
        assert!(env.is_agnostic());
    }

    #[test]
    fn test_resolve_environment_blank_values_are_absent() {
        let env = resolve_environment("  ", Some(""), false);
        assert!(env.is_agnostic());
    }

    #[test]
    fn test_from_cli() {
        let cli = Cli::try_parse_from([
            "newsletter-deploy",
            "--stack-name",
            "NewsletterStack",
            "--region",
            "us-east-1",
            "--artifact",
            "dist/app",
            "--variant",
            "function-only",
            "plan",
        ])
        .unwrap();

        let config = DeployConfig::from_cli(&cli);

        assert_eq!(config.variant, StackVariant::FunctionOnly);
        assert_eq!(config.props.stack_name, "NewsletterStack");
        assert_eq!(config.props.artifact, "dist/app");
        assert_eq!(config.props.environment.region.as_deref(), Some("us-east-1"));
    }
}

//! The newsletter deployment stack (Functional Core - no I/O).
//!
//! Two shapes of the same stack exist. Callers pick one explicitly through
//! [`StackVariant`]; neither is implied.

use crate::topology::{
    AuthMode, Environment, FunctionProps, KeyAttribute, RemovalPolicy, ResourceScope, Result,
    Runtime, TableProps, Topology, TopologyBuilder,
};

pub const DEFAULT_STACK_NAME: &str = "DeployStack";
pub const DEFAULT_REGION: &str = "eu-west-2";
pub const DEFAULT_ARTIFACT: &str = "target/lambda/rust-lambda-testing";
pub const DEFAULT_FUNCTION_NAME: &str = "rust-lambda-testing";
pub const DEFAULT_TABLE_NAME: &str = "Emails";

/// Name of the output carrying the public endpoint address.
pub const URL_OUTPUT: &str = "TheUrl";

const TABLE_ID: &str = "EmailsTable";
const FUNCTION_ID: &str = "MyFunction";

/// Which topology to assemble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackVariant {
    /// Subscriber table, table-scoped data access and email sending.
    #[default]
    Subscribers,
    /// The function alone, allowed to list tables.
    FunctionOnly,
}

/// Inputs that vary between deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackProps {
    pub stack_name: String,
    pub environment: Environment,
    pub artifact: String,
    pub function_name: String,
    pub table_name: String,
}

impl Default for StackProps {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            environment: Environment::region(DEFAULT_REGION),
            artifact: DEFAULT_ARTIFACT.to_string(),
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

/// Assembles the newsletter topology in dependency order.
pub fn newsletter_stack(variant: StackVariant, props: &StackProps) -> Result<Topology> {
    let mut builder = TopologyBuilder::new(&props.stack_name, props.environment.clone());

    let table = match variant {
        StackVariant::Subscribers => Some(builder.declare_table(
            TABLE_ID,
            TableProps::new(KeyAttribute::string("id"))
                .with_table_name(&props.table_name)
                .with_removal_policy(RemovalPolicy::Destroy),
        )?),
        StackVariant::FunctionOnly => None,
    };

    let function = builder.declare_function(
        FUNCTION_ID,
        FunctionProps::new(&props.artifact, Runtime::ProvidedAl2023)
            .with_handler("does_not_matter")
            .with_function_name(&props.function_name),
    )?;

    match table {
        Some(table) => {
            builder.grant(function, ["dynamodb:Scan", "dynamodb:PutItem"], [table])?;
            builder.grant(function, ["ses:SendEmail"], [ResourceScope::Wildcard])?;
        }
        None => {
            builder.grant(function, ["dynamodb:ListTables"], [ResourceScope::Wildcard])?;
        }
    }

    let url = builder.expose_public_endpoint(function, AuthMode::None)?;
    builder.capture_output(URL_OUTPUT, url)?;

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{effective_permissions, Permission, TopologyError};
    use std::collections::BTreeSet;

    #[test]
    fn test_subscribers_stack_shape() {
        let topology = newsletter_stack(StackVariant::Subscribers, &StackProps::default()).unwrap();

        assert_eq!(topology.tables().len(), 1);
        assert_eq!(topology.functions().len(), 1);
        assert_eq!(topology.endpoints().len(), 1);
        assert_eq!(topology.outputs().len(), 1);
        assert_eq!(topology.outputs()[0].name, "TheUrl");

        let table = &topology.tables()[0];
        assert_eq!(table.table_name.as_deref(), Some("Emails"));
        assert_eq!(table.partition_key, KeyAttribute::string("id"));
        assert_eq!(table.removal_policy, RemovalPolicy::Destroy);

        let function = &topology.functions()[0];
        assert_eq!(function.grants.len(), 2);
        assert!(matches!(
            function.grants[0].resources.as_slice(),
            [ResourceScope::Table(_)]
        ));
        assert_eq!(function.grants[1].resources, vec![ResourceScope::Wildcard]);
    }

    #[test]
    fn test_function_only_stack_shape() {
        let topology =
            newsletter_stack(StackVariant::FunctionOnly, &StackProps::default()).unwrap();

        assert!(topology.tables().is_empty());
        assert_eq!(topology.functions().len(), 1);
        assert_eq!(topology.endpoints().len(), 1);
        assert_eq!(topology.outputs().len(), 1);

        let function = topology.function_refs().next().unwrap();
        assert_eq!(
            effective_permissions(&topology, function),
            BTreeSet::from([Permission::new("dynamodb:ListTables", "*")])
        );
    }

    #[test]
    fn test_subscribers_permissions_are_auditable() {
        let props = StackProps {
            environment: Environment::region("eu-west-2").with_account("123456789012"),
            ..StackProps::default()
        };
        let topology = newsletter_stack(StackVariant::Subscribers, &props).unwrap();
        let function = topology.function_refs().next().unwrap();

        let table_arn = "arn:aws:dynamodb:eu-west-2:123456789012:table/Emails";
        assert_eq!(
            effective_permissions(&topology, function),
            BTreeSet::from([
                Permission::new("dynamodb:PutItem", table_arn),
                Permission::new("dynamodb:Scan", table_arn),
                Permission::new("ses:SendEmail", "*"),
            ])
        );
    }

    #[test]
    fn test_output_tracks_the_function_endpoint() {
        let topology = newsletter_stack(StackVariant::Subscribers, &StackProps::default()).unwrap();
        let function = topology.function_refs().next().unwrap();
        let endpoint = topology.endpoint_for(function).unwrap();

        assert_eq!(endpoint.auth_mode, AuthMode::None);
        assert!(topology.output(URL_OUTPUT).is_some());
    }

    #[test]
    fn test_agnostic_environment_is_preserved() {
        let props = StackProps {
            environment: Environment::agnostic(),
            ..StackProps::default()
        };
        let topology = newsletter_stack(StackVariant::FunctionOnly, &props).unwrap();

        assert!(topology.environment().is_agnostic());
    }

    #[test]
    fn test_invalid_artifact_aborts_the_stack() {
        let props = StackProps {
            artifact: String::new(),
            ..StackProps::default()
        };

        assert!(matches!(
            newsletter_stack(StackVariant::Subscribers, &props),
            Err(TopologyError::InvalidArtifactLocation(_))
        ));
    }

    #[test]
    fn test_empty_table_name_aborts_the_stack() {
        let props = StackProps {
            table_name: String::new(),
            ..StackProps::default()
        };

        assert_eq!(
            newsletter_stack(StackVariant::Subscribers, &props).unwrap_err(),
            TopologyError::EmptyName {
                kind: "Physical table"
            }
        );
    }
}

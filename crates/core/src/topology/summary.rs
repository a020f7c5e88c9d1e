//! Pure functions for describing a topology as plan lines.

use super::graph::Topology;
use super::types::{BillingMode, OutputValue};

/// Formats a topology for display, one resource per `+` line.
pub fn format_topology(topology: &Topology) -> Vec<String> {
    let mut lines = vec![format!("= Stack: {}", topology.stack_name())];
    let env = topology.environment();
    if env.is_agnostic() {
        lines.push("  Environment: agnostic".to_string());
    } else {
        lines.push(format!(
            "  Environment: {} / {}",
            env.account.as_deref().unwrap_or("(any account)"),
            env.region.as_deref().unwrap_or("(any region)")
        ));
    }

    for table in topology.tables() {
        match &table.table_name {
            Some(name) => lines.push(format!("+ Table: {} ({})", table.logical_id, name)),
            None => lines.push(format!("+ Table: {}", table.logical_id)),
        }
        lines.push(format!(
            "  Partition key: {} ({})",
            table.partition_key.name,
            table.partition_key.attribute_type.code()
        ));
        if let Some(sk) = &table.sort_key {
            lines.push(format!("  Sort key: {} ({})", sk.name, sk.attribute_type.code()));
        }
        match table.billing_mode {
            BillingMode::PayPerRequest => lines.push("  Billing: PAY_PER_REQUEST".to_string()),
            BillingMode::Provisioned { read, write } => {
                lines.push(format!("  Billing: PROVISIONED ({}r/{}w)", read, write))
            }
        }
        lines.push(format!("  Removal: {}", table.removal_policy.label()));
    }

    for function in topology.functions() {
        lines.push(format!("+ Function: {}", function.logical_id));
        if let Some(name) = &function.function_name {
            lines.push(format!("  Name: {}", name));
        }
        lines.push(format!(
            "  Runtime: {} ({})",
            function.runtime.identifier(),
            function.architecture.identifier()
        ));
        lines.push(format!("  Artifact: {}", function.artifact));
        for grant in &function.grants {
            let scopes: Vec<String> = grant
                .resources
                .iter()
                .map(|scope| topology.describe_scope(scope))
                .collect();
            lines.push(format!(
                "  + Grant: {} -> {}",
                grant.actions.join(", "),
                scopes.join(", ")
            ));
        }
    }

    for endpoint in topology.endpoints() {
        let function = topology
            .function(endpoint.function)
            .map(|f| f.logical_id.as_str())
            .unwrap_or("?");
        lines.push(format!(
            "+ Public URL: {} on {} (auth: {})",
            endpoint.logical_id,
            function,
            endpoint.auth_mode.identifier()
        ));
    }

    for output in topology.outputs() {
        let OutputValue::EndpointUrl(endpoint) = &output.value;
        let source = topology
            .endpoint(*endpoint)
            .map(|e| e.logical_id.as_str())
            .unwrap_or("?");
        lines.push(format!("+ Output: {} <- {}.FunctionUrl", output.name, source));
        if let Some(description) = &output.description {
            lines.push(format!("  Description: {}", description));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{
        AuthMode, Environment, FunctionProps, KeyAttribute, RemovalPolicy, ResourceScope,
        Runtime, TableProps, TopologyBuilder,
    };

    #[test]
    fn test_format_full_topology() {
        let mut b = TopologyBuilder::new("DeployStack", Environment::region("eu-west-2"));
        let table = b
            .declare_table(
                "EmailsTable",
                TableProps::new(KeyAttribute::string("id"))
                    .with_table_name("Emails")
                    .with_removal_policy(RemovalPolicy::Destroy),
            )
            .unwrap();
        let function = b
            .declare_function(
                "MyFunction",
                FunctionProps::new("target/lambda/app", Runtime::ProvidedAl2023),
            )
            .unwrap();
        b.grant(function, ["dynamodb:Scan", "dynamodb:PutItem"], [table])
            .unwrap();
        b.grant(function, ["ses:SendEmail"], [ResourceScope::Wildcard])
            .unwrap();
        let endpoint = b.expose_public_endpoint(function, AuthMode::None).unwrap();
        b.capture_output("TheUrl", endpoint).unwrap();
        let topology = b.build().unwrap();

        let lines = format_topology(&topology);

        assert_eq!(
            lines,
            vec![
                "= Stack: DeployStack",
                "  Environment: (any account) / eu-west-2",
                "+ Table: EmailsTable (Emails)",
                "  Partition key: id (S)",
                "  Billing: PROVISIONED (5r/5w)",
                "  Removal: DESTROY",
                "+ Function: MyFunction",
                "  Runtime: provided.al2023 (x86_64)",
                "  Artifact: target/lambda/app",
                "  + Grant: dynamodb:Scan, dynamodb:PutItem -> arn:aws:dynamodb:eu-west-2:${AWS::AccountId}:table/Emails",
                "  + Grant: ses:SendEmail -> *",
                "+ Public URL: MyFunctionUrl on MyFunction (auth: NONE)",
                "+ Output: TheUrl <- MyFunctionUrl.FunctionUrl",
            ]
        );
    }

    #[test]
    fn test_format_output_description() {
        let mut b = TopologyBuilder::new("Stack", Environment::agnostic());
        let function = b
            .declare_function("Handler", FunctionProps::new("dist", Runtime::ProvidedAl2023))
            .unwrap();
        let endpoint = b.expose_public_endpoint(function, AuthMode::AwsIam).unwrap();
        b.capture_output_with_description("TheUrl", endpoint, "Signed requests only")
            .unwrap();

        let lines = format_topology(&b.build().unwrap());

        assert_eq!(
            &lines[lines.len() - 2..],
            &[
                "+ Output: TheUrl <- HandlerUrl.FunctionUrl".to_string(),
                "  Description: Signed requests only".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_agnostic_empty_topology() {
        let topology = TopologyBuilder::new("Empty", Environment::agnostic())
            .build()
            .unwrap();

        assert_eq!(
            format_topology(&topology),
            vec!["= Stack: Empty", "  Environment: agnostic"]
        );
    }
}

//! Renders a topology as a CloudFormation template.
//!
//! The template is the hand-off point to the external deployment engine. The
//! function code is not uploaded here: each function gets a pair of
//! `<Fn>AssetBucket` / `<Fn>AssetKey` parameters, and the local artifact path is
//! recorded in the resource metadata for the engine that publishes it.

use serde_json::{json, Map, Value};

use super::error::{Result, TopologyError};
use super::graph::Topology;
use super::types::{
    asset_bucket_parameter_id, asset_key_parameter_id, invoke_permission_logical_id, AuthMode,
    BillingMode, ComputeFunction, DataTable, KeyAttribute, OutputValue, PermissionGrant,
    PublicEndpoint, ResourceScope,
};

const TEMPLATE_VERSION: &str = "2010-09-09";
const POLICY_VERSION: &str = "2012-10-17";
const BASIC_EXECUTION_POLICY: &str = "service-role/AWSLambdaBasicExecutionRole";

/// Builds the template document.
pub fn synthesize(topology: &Topology) -> Value {
    let mut parameters = Map::new();
    let mut resources = Map::new();
    let mut outputs = Map::new();

    for table in topology.tables() {
        resources.insert(table.logical_id.clone(), table_resource(table));
    }

    for function in topology.functions() {
        for (parameter, what) in [
            (asset_bucket_parameter_id(&function.logical_id), "Bucket"),
            (asset_key_parameter_id(&function.logical_id), "Object key"),
        ] {
            parameters.insert(
                parameter,
                json!({
                    "Type": "String",
                    "Description": format!("{} holding the code of {}", what, function.logical_id),
                }),
            );
        }
        resources.insert(function.role_logical_id(), role_resource());
        if !function.grants.is_empty() {
            resources.insert(
                function.policy_logical_id(),
                policy_resource(topology, function),
            );
        }
        resources.insert(function.logical_id.clone(), function_resource(function));
    }

    for endpoint in topology.endpoints() {
        let Some(function) = topology.function(endpoint.function) else {
            continue;
        };
        resources.insert(
            endpoint.logical_id.clone(),
            endpoint_resource(endpoint, function),
        );
        if endpoint.auth_mode == AuthMode::None {
            resources.insert(
                invoke_permission_logical_id(&function.logical_id),
                json!({
                    "Type": "AWS::Lambda::Permission",
                    "Properties": {
                        "Action": "lambda:InvokeFunctionUrl",
                        "FunctionName": { "Fn::GetAtt": [function.logical_id, "Arn"] },
                        "Principal": "*",
                        "FunctionUrlAuthType": "NONE",
                    },
                }),
            );
        }
    }

    for output in topology.outputs() {
        let OutputValue::EndpointUrl(endpoint) = &output.value;
        if let Some(endpoint) = topology.endpoint(*endpoint) {
            let mut entry = Map::new();
            if let Some(description) = &output.description {
                entry.insert("Description".into(), json!(description));
            }
            entry.insert(
                "Value".into(),
                json!({ "Fn::GetAtt": [endpoint.logical_id, "FunctionUrl"] }),
            );
            outputs.insert(output.name.clone(), Value::Object(entry));
        }
    }

    let mut template = Map::new();
    template.insert("AWSTemplateFormatVersion".into(), json!(TEMPLATE_VERSION));
    template.insert(
        "Description".into(),
        json!(format!("Stack {}", topology.stack_name())),
    );
    if !topology.environment().is_agnostic() {
        template.insert(
            "Metadata".into(),
            json!({ "Environment": topology.environment() }),
        );
    }
    if !parameters.is_empty() {
        template.insert("Parameters".into(), Value::Object(parameters));
    }
    template.insert("Resources".into(), Value::Object(resources));
    if !outputs.is_empty() {
        template.insert("Outputs".into(), Value::Object(outputs));
    }
    Value::Object(template)
}

/// Renders the template as pretty-printed JSON.
pub fn to_json_string(topology: &Topology) -> Result<String> {
    serde_json::to_string_pretty(&synthesize(topology))
        .map_err(|e| TopologyError::Serialization(e.to_string()))
}

fn table_resource(table: &DataTable) -> Value {
    let mut key_schema = vec![key_schema_element(&table.partition_key, "HASH")];
    let mut attribute_definitions = vec![attribute_definition(&table.partition_key)];
    if let Some(sk) = &table.sort_key {
        key_schema.push(key_schema_element(sk, "RANGE"));
        attribute_definitions.push(attribute_definition(sk));
    }

    let mut properties = Map::new();
    properties.insert("KeySchema".into(), Value::Array(key_schema));
    properties.insert(
        "AttributeDefinitions".into(),
        Value::Array(attribute_definitions),
    );
    match table.billing_mode {
        BillingMode::PayPerRequest => {
            properties.insert("BillingMode".into(), json!("PAY_PER_REQUEST"));
        }
        BillingMode::Provisioned { read, write } => {
            properties.insert(
                "ProvisionedThroughput".into(),
                json!({ "ReadCapacityUnits": read, "WriteCapacityUnits": write }),
            );
        }
    }
    if let Some(name) = &table.table_name {
        properties.insert("TableName".into(), json!(name));
    }

    let policy = table.removal_policy.deletion_policy();
    json!({
        "Type": "AWS::DynamoDB::Table",
        "Properties": properties,
        "UpdateReplacePolicy": policy,
        "DeletionPolicy": policy,
    })
}

fn key_schema_element(key: &KeyAttribute, key_type: &str) -> Value {
    json!({ "AttributeName": key.name, "KeyType": key_type })
}

fn attribute_definition(key: &KeyAttribute) -> Value {
    json!({ "AttributeName": key.name, "AttributeType": key.attribute_type.code() })
}

fn role_resource() -> Value {
    json!({
        "Type": "AWS::IAM::Role",
        "Properties": {
            "AssumeRolePolicyDocument": {
                "Statement": [{
                    "Action": "sts:AssumeRole",
                    "Effect": "Allow",
                    "Principal": { "Service": "lambda.amazonaws.com" },
                }],
                "Version": POLICY_VERSION,
            },
            "ManagedPolicyArns": [{
                "Fn::Join": ["", [
                    "arn:",
                    { "Ref": "AWS::Partition" },
                    format!(":iam::aws:policy/{}", BASIC_EXECUTION_POLICY),
                ]],
            }],
        },
    })
}

fn policy_resource(topology: &Topology, function: &ComputeFunction) -> Value {
    let statements: Vec<Value> = function
        .grants
        .iter()
        .map(|grant| policy_statement(topology, grant))
        .collect();

    json!({
        "Type": "AWS::IAM::Policy",
        "Properties": {
            "PolicyDocument": {
                "Statement": statements,
                "Version": POLICY_VERSION,
            },
            "PolicyName": function.policy_logical_id(),
            "Roles": [{ "Ref": function.role_logical_id() }],
        },
    })
}

fn policy_statement(topology: &Topology, grant: &PermissionGrant) -> Value {
    let resources: Vec<Value> = grant
        .resources
        .iter()
        .map(|scope| scope_value(topology, scope))
        .collect();

    json!({
        "Action": single_or_list(grant.actions.iter().map(|a| json!(a)).collect()),
        "Effect": "Allow",
        "Resource": single_or_list(resources),
    })
}

fn scope_value(topology: &Topology, scope: &ResourceScope) -> Value {
    match scope {
        ResourceScope::Table(table) => match topology.table(*table) {
            Some(table) => json!({ "Fn::GetAtt": [table.logical_id, "Arn"] }),
            None => json!(topology.describe_scope(scope)),
        },
        ResourceScope::Wildcard => json!("*"),
        ResourceScope::Arn(arn) => json!(arn),
    }
}

/// Policy documents use a bare value for single-element lists.
fn single_or_list(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

fn function_resource(function: &ComputeFunction) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "Code".into(),
        json!({
            "S3Bucket": { "Ref": asset_bucket_parameter_id(&function.logical_id) },
            "S3Key": { "Ref": asset_key_parameter_id(&function.logical_id) },
        }),
    );
    properties.insert(
        "Role".into(),
        json!({ "Fn::GetAtt": [function.role_logical_id(), "Arn"] }),
    );
    properties.insert("Runtime".into(), json!(function.runtime.identifier()));
    properties.insert("Handler".into(), json!(function.handler));
    properties.insert(
        "Architectures".into(),
        json!([function.architecture.identifier()]),
    );
    properties.insert("MemorySize".into(), json!(function.memory_size_mb));
    properties.insert("Timeout".into(), json!(function.timeout_seconds));
    if let Some(name) = &function.function_name {
        properties.insert("FunctionName".into(), json!(name));
    }
    if !function.environment.is_empty() {
        properties.insert(
            "Environment".into(),
            json!({ "Variables": function.environment }),
        );
    }

    let mut depends_on = vec![json!(function.role_logical_id())];
    if !function.grants.is_empty() {
        depends_on.insert(0, json!(function.policy_logical_id()));
    }

    json!({
        "Type": "AWS::Lambda::Function",
        "Properties": properties,
        "DependsOn": depends_on,
        "Metadata": {
            "aws:asset:path": function.artifact.to_string(),
            "aws:asset:property": "Code",
        },
    })
}

fn endpoint_resource(endpoint: &PublicEndpoint, function: &ComputeFunction) -> Value {
    json!({
        "Type": "AWS::Lambda::Url",
        "Properties": {
            "AuthType": endpoint.auth_mode.identifier(),
            "TargetFunctionArn": { "Fn::GetAtt": [function.logical_id, "Arn"] },
        },
    })
}

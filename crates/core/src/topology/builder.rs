//! Resource graph builder.
//!
//! Declarations run strictly in the order the caller issues them. Each one
//! validates its inputs against what has already been declared and returns an
//! opaque handle that later declarations may reference. The builder never
//! reorders or infers dependencies.
//!
//! The first rejected declaration poisons the builder: every later call,
//! `build` included, fails with [`TopologyError::BuildAborted`], so no
//! partially wired topology is ever handed to synthesis.

use std::collections::BTreeSet;

use super::error::{Result, TopologyError};
use super::graph::Topology;
use super::handles::{EndpointRef, FunctionRef, TableRef};
use super::types::{
    endpoint_logical_id, endpoint_logical_ids, function_logical_ids, ArtifactLocation,
    AuthMode, ComputeFunction, DataTable, Environment, FunctionProps, Output, OutputValue,
    PermissionGrant, PublicEndpoint, ResourceScope, TableProps,
};

/// DynamoDB actions that act on the account rather than on a single table.
const ACCOUNT_LEVEL_DYNAMODB_ACTIONS: &[&str] = &[
    "ListTables",
    "DescribeLimits",
    "DescribeEndpoints",
    "ListBackups",
    "ListGlobalTables",
    "ListExports",
    "ListImports",
    "ListContributorInsights",
    "DescribeReservedCapacity",
    "DescribeReservedCapacityOfferings",
    "PurchaseReservedCapacityOfferings",
];

/// Assembles a [`Topology`] one declaration at a time.
#[derive(Debug)]
pub struct TopologyBuilder {
    topology: Topology,
    logical_ids: BTreeSet<String>,
    aborted: bool,
}

impl TopologyBuilder {
    pub fn new(stack_name: impl Into<String>, environment: Environment) -> Self {
        Self {
            topology: Topology::empty(stack_name.into(), environment),
            logical_ids: BTreeSet::new(),
            aborted: false,
        }
    }

    /// Registers a data table.
    pub fn declare_table(&mut self, name: &str, props: impl Into<TableProps>) -> Result<TableRef> {
        self.ensure_open()?;
        let result = self.try_declare_table(name, props.into());
        self.settle(result)
    }

    /// Registers a compute function. Grants and the public endpoint attach to it.
    pub fn declare_function(&mut self, name: &str, props: FunctionProps) -> Result<FunctionRef> {
        self.ensure_open()?;
        let result = self.try_declare_function(name, props);
        self.settle(result)
    }

    /// Appends a permission grant to the function's execution identity.
    ///
    /// Grants accumulate; a later grant never replaces an earlier one.
    pub fn grant<A, S>(
        &mut self,
        function: FunctionRef,
        actions: impl IntoIterator<Item = A>,
        resources: impl IntoIterator<Item = S>,
    ) -> Result<()>
    where
        A: Into<String>,
        S: Into<ResourceScope>,
    {
        self.ensure_open()?;
        let actions: Vec<String> = actions.into_iter().map(Into::into).collect();
        let resources: Vec<ResourceScope> = resources.into_iter().map(Into::into).collect();
        let result = self.try_grant(function, actions, resources);
        self.settle(result)
    }

    /// Attaches the single public endpoint a function may have.
    pub fn expose_public_endpoint(
        &mut self,
        function: FunctionRef,
        auth_mode: AuthMode,
    ) -> Result<EndpointRef> {
        self.ensure_open()?;
        let result = self.try_expose_public_endpoint(function, auth_mode);
        self.settle(result)
    }

    /// Records the endpoint's resolved address under a named output.
    pub fn capture_output(&mut self, name: &str, endpoint: EndpointRef) -> Result<()> {
        self.ensure_open()?;
        let result = self.try_capture_output(name, endpoint, None);
        self.settle(result)
    }

    /// Like [`capture_output`](Self::capture_output), with a human-readable description.
    pub fn capture_output_with_description(
        &mut self,
        name: &str,
        endpoint: EndpointRef,
        description: impl Into<String>,
    ) -> Result<()> {
        self.ensure_open()?;
        let result = self.try_capture_output(name, endpoint, Some(description.into()));
        self.settle(result)
    }

    /// Finalizes the graph.
    pub fn build(self) -> Result<Topology> {
        self.ensure_open()?;
        tracing::info!(
            stack = %self.topology.stack_name,
            tables = self.topology.tables.len(),
            functions = self.topology.functions.len(),
            endpoints = self.topology.endpoints.len(),
            outputs = self.topology.outputs.len(),
            "Topology built"
        );
        Ok(self.topology)
    }

    fn try_declare_table(&mut self, name: &str, props: TableProps) -> Result<TableRef> {
        validate_logical_name(name, "Table")?;
        if props.partition_key.name.trim().is_empty() {
            return Err(TopologyError::MissingPartitionKey {
                table: name.to_string(),
            });
        }
        if props.table_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(TopologyError::EmptyName {
                kind: "Physical table",
            });
        }
        self.reserve(&[name.to_string()])?;

        self.topology.tables.push(DataTable {
            logical_id: name.to_string(),
            table_name: props.table_name,
            partition_key: props.partition_key,
            sort_key: props.sort_key,
            billing_mode: props.billing_mode,
            removal_policy: props.removal_policy,
        });
        tracing::debug!(logical_id = name, "Declared table");

        Ok(TableRef::new(
            self.topology.graph,
            self.topology.tables.len() - 1,
        ))
    }

    fn try_declare_function(&mut self, name: &str, props: FunctionProps) -> Result<FunctionRef> {
        validate_logical_name(name, "Function")?;
        let artifact = ArtifactLocation::parse(&props.artifact)?;
        if props.handler.trim().is_empty() {
            return Err(TopologyError::EmptyName { kind: "Handler" });
        }
        if props.runtime.identifier().trim().is_empty() {
            return Err(TopologyError::EmptyName { kind: "Runtime" });
        }
        for (setting, value) in [
            ("memory size", props.memory_size_mb),
            ("timeout", props.timeout_seconds),
        ] {
            if value == 0 {
                return Err(TopologyError::ZeroFunctionSetting {
                    function: name.to_string(),
                    setting,
                });
            }
        }
        self.reserve(&function_logical_ids(name))?;

        self.topology.functions.push(ComputeFunction {
            logical_id: name.to_string(),
            artifact,
            runtime: props.runtime,
            handler: props.handler,
            function_name: props.function_name,
            architecture: props.architecture,
            memory_size_mb: props.memory_size_mb,
            timeout_seconds: props.timeout_seconds,
            environment: props.environment,
            grants: Vec::new(),
        });
        tracing::debug!(logical_id = name, "Declared function");

        Ok(FunctionRef::new(
            self.topology.graph,
            self.topology.functions.len() - 1,
        ))
    }

    fn try_grant(
        &mut self,
        function: FunctionRef,
        actions: Vec<String>,
        resources: Vec<ResourceScope>,
    ) -> Result<()> {
        let index = self.function_index(function)?;
        let function_id = self.topology.functions[index].logical_id.clone();

        if actions.is_empty() {
            return Err(TopologyError::EmptyActions {
                function: function_id,
            });
        }
        for action in &actions {
            validate_action(action)?;
        }

        if resources.is_empty() {
            return Err(TopologyError::EmptyResources {
                function: function_id,
            });
        }
        for scope in &resources {
            match scope {
                ResourceScope::Table(table) => {
                    if self.topology.table(*table).is_none() {
                        return Err(TopologyError::UnknownTable);
                    }
                }
                ResourceScope::Arn(arn) if arn.trim().is_empty() => {
                    return Err(TopologyError::EmptyResources {
                        function: function_id,
                    });
                }
                _ => {}
            }
        }

        if resources.iter().any(ResourceScope::is_wildcard) {
            if let Some(action) = actions.iter().find(|a| requires_table_scope(a)) {
                return Err(TopologyError::TableActionOnWildcard {
                    action: action.clone(),
                });
            }
        }

        tracing::debug!(
            function = %function_id,
            actions = ?actions,
            scopes = resources.len(),
            "Granted permissions"
        );
        self.topology.functions[index]
            .grants
            .push(PermissionGrant { actions, resources });
        Ok(())
    }

    fn try_expose_public_endpoint(
        &mut self,
        function: FunctionRef,
        auth_mode: AuthMode,
    ) -> Result<EndpointRef> {
        let index = self.function_index(function)?;
        let function_id = self.topology.functions[index].logical_id.clone();

        if self.topology.endpoint_for(function).is_some() {
            return Err(TopologyError::DuplicateEndpoint {
                function: function_id,
            });
        }
        self.reserve(&endpoint_logical_ids(&function_id))?;

        self.topology.endpoints.push(PublicEndpoint {
            logical_id: endpoint_logical_id(&function_id),
            function,
            auth_mode,
        });
        tracing::debug!(
            function = %function_id,
            auth = auth_mode.identifier(),
            "Exposed public endpoint"
        );

        Ok(EndpointRef::new(
            self.topology.graph,
            self.topology.endpoints.len() - 1,
        ))
    }

    fn try_capture_output(
        &mut self,
        name: &str,
        endpoint: EndpointRef,
        description: Option<String>,
    ) -> Result<()> {
        validate_logical_name(name, "Output")?;
        if description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(TopologyError::EmptyName {
                kind: "Output description",
            });
        }
        if self.topology.endpoint(endpoint).is_none() {
            return Err(TopologyError::UnknownEndpoint);
        }
        if self.topology.output(name).is_some() {
            return Err(TopologyError::DuplicateOutput(name.to_string()));
        }

        self.topology.outputs.push(Output {
            name: name.to_string(),
            value: OutputValue::EndpointUrl(endpoint),
            description,
        });
        tracing::debug!(output = name, "Captured output");
        Ok(())
    }

    fn function_index(&self, function: FunctionRef) -> Result<usize> {
        function
            .resolve(self.topology.graph)
            .filter(|&i| i < self.topology.functions.len())
            .ok_or(TopologyError::UnknownFunction)
    }

    /// Claims logical ids, all or none.
    fn reserve(&mut self, ids: &[String]) -> Result<()> {
        if let Some(taken) = ids.iter().find(|id| self.logical_ids.contains(*id)) {
            return Err(TopologyError::DuplicateLogicalId(taken.clone()));
        }
        self.logical_ids.extend(ids.iter().cloned());
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.aborted {
            return Err(TopologyError::BuildAborted);
        }
        Ok(())
    }

    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.aborted = true;
            tracing::warn!(
                stack = %self.topology.stack_name,
                error = %err,
                "Declaration rejected, aborting topology"
            );
        }
        result
    }
}

impl From<TableRef> for ResourceScope {
    fn from(table: TableRef) -> Self {
        ResourceScope::Table(table)
    }
}

fn validate_logical_name(name: &str, kind: &'static str) -> Result<()> {
    if name.is_empty() {
        return Err(TopologyError::EmptyName { kind });
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TopologyError::InvalidLogicalName(name.to_string()));
    }
    Ok(())
}

fn validate_action(action: &str) -> Result<()> {
    let valid = action.split_once(':').is_some_and(|(service, operation)| {
        !service.is_empty()
            && !operation.is_empty()
            && !action.chars().any(char::is_whitespace)
    });
    if valid {
        Ok(())
    } else {
        Err(TopologyError::InvalidAction(action.to_string()))
    }
}

/// True when the action needs a table ARN rather than `*`.
fn requires_table_scope(action: &str) -> bool {
    match action.split_once(':') {
        Some((service, operation)) if service.eq_ignore_ascii_case("dynamodb") => {
            !ACCOUNT_LEVEL_DYNAMODB_ACTIONS
                .iter()
                .any(|a| a.eq_ignore_ascii_case(operation))
        }
        _ => false,
    }
}

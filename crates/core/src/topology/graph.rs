//! The finished, write-once resource graph.

use super::handles::{EndpointRef, FunctionRef, GraphId, TableRef};
use super::types::{ComputeFunction, DataTable, Environment, Output, PublicEndpoint, ResourceScope};

/// A complete, internally consistent topology description.
///
/// Only [`TopologyBuilder::build`](super::TopologyBuilder::build) produces one,
/// and nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) graph: GraphId,
    pub(crate) stack_name: String,
    pub(crate) environment: Environment,
    pub(crate) tables: Vec<DataTable>,
    pub(crate) functions: Vec<ComputeFunction>,
    pub(crate) endpoints: Vec<PublicEndpoint>,
    pub(crate) outputs: Vec<Output>,
}

impl Topology {
    pub(crate) fn empty(stack_name: String, environment: Environment) -> Self {
        Self {
            graph: GraphId::next(),
            stack_name,
            environment,
            tables: Vec::new(),
            functions: Vec::new(),
            endpoints: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn tables(&self) -> &[DataTable] {
        &self.tables
    }

    pub fn functions(&self) -> &[ComputeFunction] {
        &self.functions
    }

    pub fn endpoints(&self) -> &[PublicEndpoint] {
        &self.endpoints
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn table(&self, table: TableRef) -> Option<&DataTable> {
        table.resolve(self.graph).and_then(|i| self.tables.get(i))
    }

    pub fn function(&self, function: FunctionRef) -> Option<&ComputeFunction> {
        function.resolve(self.graph).and_then(|i| self.functions.get(i))
    }

    pub fn endpoint(&self, endpoint: EndpointRef) -> Option<&PublicEndpoint> {
        endpoint.resolve(self.graph).and_then(|i| self.endpoints.get(i))
    }

    /// Returns the public endpoint attached to `function`, if any.
    pub fn endpoint_for(&self, function: FunctionRef) -> Option<&PublicEndpoint> {
        self.endpoints.iter().find(|e| e.function == function)
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }

    /// Handles for every declared function, in declaration order.
    pub fn function_refs(&self) -> impl Iterator<Item = FunctionRef> + '_ {
        (0..self.functions.len()).map(|i| FunctionRef::new(self.graph, i))
    }

    /// Renders a resource scope the way an auditor reads it.
    ///
    /// Table scopes become a concrete ARN when both the physical table name
    /// and the region are known, and `<LogicalId>.Arn` otherwise.
    pub fn describe_scope(&self, scope: &ResourceScope) -> String {
        match scope {
            ResourceScope::Wildcard => "*".to_string(),
            ResourceScope::Arn(arn) => arn.clone(),
            ResourceScope::Table(table) => match self.table(*table) {
                Some(table) => match (&table.table_name, &self.environment.region) {
                    (Some(name), Some(region)) => format!(
                        "arn:aws:dynamodb:{}:{}:table/{}",
                        region,
                        self.environment
                            .account
                            .as_deref()
                            .unwrap_or("${AWS::AccountId}"),
                        name
                    ),
                    _ => format!("{}.Arn", table.logical_id),
                },
                None => "<undeclared table>".to_string(),
            },
        }
    }
}

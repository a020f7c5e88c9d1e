//! Resource graph construction and the read-only views over a finished graph.

mod builder;
mod error;
mod graph;
mod handles;
mod permissions;
mod summary;
mod template;
mod types;

pub use builder::TopologyBuilder;
pub use error::{Result, TopologyError};
pub use graph::Topology;
pub use handles::{EndpointRef, FunctionRef, TableRef};
pub use permissions::{audit, effective_permissions, FunctionPermissions, Permission};
pub use summary::format_topology;
pub use template::{synthesize, to_json_string};
pub use types::{
    Architecture, ArtifactLocation, AttributeType, AuthMode, BillingMode, ComputeFunction,
    DataTable, Environment, FunctionProps, KeyAttribute, Output, OutputValue, PermissionGrant,
    PublicEndpoint, RemovalPolicy, ResourceScope, Runtime, TableProps,
};

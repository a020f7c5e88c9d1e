//! Permission audit over a finished topology.

use std::collections::BTreeSet;

use serde::Serialize;

use super::graph::Topology;
use super::handles::FunctionRef;

/// One allowed `(action, resource)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Permission {
    pub action: String,
    pub resource: String,
}

impl Permission {
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
        }
    }
}

/// Everything one function's execution identity may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionPermissions {
    pub function: String,
    pub permissions: Vec<Permission>,
}

/// Union of every grant attached to `function`.
///
/// Returns an empty set for a handle the topology does not know.
pub fn effective_permissions(topology: &Topology, function: FunctionRef) -> BTreeSet<Permission> {
    let Some(function) = topology.function(function) else {
        return BTreeSet::new();
    };

    function
        .grants
        .iter()
        .flat_map(|grant| {
            grant.actions.iter().flat_map(move |action| {
                grant
                    .resources
                    .iter()
                    .map(move |scope| Permission::new(action, topology.describe_scope(scope)))
            })
        })
        .collect()
}

/// Audits every function in declaration order.
pub fn audit(topology: &Topology) -> Vec<FunctionPermissions> {
    topology
        .function_refs()
        .filter_map(|function| {
            let logical_id = topology.function(function)?.logical_id.clone();
            Some(FunctionPermissions {
                function: logical_id,
                permissions: effective_permissions(topology, function)
                    .into_iter()
                    .collect(),
            })
        })
        .collect()
}

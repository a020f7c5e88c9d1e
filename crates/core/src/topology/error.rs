use thiserror::Error;

/// Errors raised while declaring or rendering a topology.
///
/// Every variant is fatal to the build that produced it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },
    #[error("Invalid logical name '{0}': only ASCII letters and digits are allowed")]
    InvalidLogicalName(String),
    #[error("Logical id '{0}' is already declared")]
    DuplicateLogicalId(String),
    #[error("Table '{table}' must name a partition key field")]
    MissingPartitionKey { table: String },
    #[error("Invalid artifact location: {0}")]
    InvalidArtifactLocation(String),
    #[error("Function '{function}' must have a non-zero {setting}")]
    ZeroFunctionSetting {
        function: String,
        setting: &'static str,
    },
    #[error("Grant on '{function}' has no actions")]
    EmptyActions { function: String },
    #[error("Grant on '{function}' has no resource scopes")]
    EmptyResources { function: String },
    #[error("Invalid action '{0}': expected service:Action")]
    InvalidAction(String),
    #[error("Action '{action}' operates on a table and cannot be scoped to '*'")]
    TableActionOnWildcard { action: String },
    #[error("Function '{function}' already exposes a public endpoint")]
    DuplicateEndpoint { function: String },
    #[error("Output '{0}' is already captured")]
    DuplicateOutput(String),
    #[error("Table reference was not declared by this builder")]
    UnknownTable,
    #[error("Function reference was not declared by this builder")]
    UnknownFunction,
    #[error("Endpoint reference was not declared by this builder")]
    UnknownEndpoint,
    #[error("Topology construction aborted by an earlier declaration error")]
    BuildAborted,
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

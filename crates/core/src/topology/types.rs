//! Declarative resource descriptions (Functional Core - pure data).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::{Result, TopologyError};
use super::handles::{EndpointRef, FunctionRef, TableRef};

/// Key attribute types supported by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
    Binary,
}

impl AttributeType {
    /// Returns the short type code used in attribute definitions.
    pub fn code(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
            AttributeType::Binary => "B",
        }
    }
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }

    /// Shorthand for a string-typed key.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String)
    }
}

/// What happens to the table when the stack is torn down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    Destroy,
    #[default]
    Retain,
    Snapshot,
}

impl RemovalPolicy {
    /// Returns the template `DeletionPolicy` value.
    pub fn deletion_policy(&self) -> &'static str {
        match self {
            RemovalPolicy::Destroy => "Delete",
            RemovalPolicy::Retain => "Retain",
            RemovalPolicy::Snapshot => "Snapshot",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RemovalPolicy::Destroy => "DESTROY",
            RemovalPolicy::Retain => "RETAIN",
            RemovalPolicy::Snapshot => "SNAPSHOT",
        }
    }
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
    Provisioned { read: u32, write: u32 },
}

impl Default for BillingMode {
    fn default() -> Self {
        BillingMode::Provisioned { read: 5, write: 5 }
    }
}

/// Table declaration properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProps {
    /// Physical table name. Generated by the deployment engine when absent.
    pub table_name: Option<String>,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub billing_mode: BillingMode,
    pub removal_policy: RemovalPolicy,
}

impl TableProps {
    pub fn new(partition_key: KeyAttribute) -> Self {
        Self {
            table_name: None,
            partition_key,
            sort_key: None,
            billing_mode: BillingMode::default(),
            removal_policy: RemovalPolicy::default(),
        }
    }

    /// Sets the physical table name.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn with_sort_key(mut self, sort_key: KeyAttribute) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    pub fn with_billing_mode(mut self, billing_mode: BillingMode) -> Self {
        self.billing_mode = billing_mode;
        self
    }

    pub fn with_removal_policy(mut self, removal_policy: RemovalPolicy) -> Self {
        self.removal_policy = removal_policy;
        self
    }
}

impl From<KeyAttribute> for TableProps {
    fn from(partition_key: KeyAttribute) -> Self {
        Self::new(partition_key)
    }
}

/// A declared key-value table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub logical_id: String,
    pub table_name: Option<String>,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub billing_mode: BillingMode,
    pub removal_policy: RemovalPolicy,
}

/// Location of the pre-packaged deployable artifact.
///
/// Only the shape of the path is checked here. Whether the payload exists is
/// decided by the engine that consumes the synthesized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation(PathBuf);

impl ArtifactLocation {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(TopologyError::InvalidArtifactLocation(
                "path is empty".to_string(),
            ));
        }
        if raw.contains('\0') {
            return Err(TopologyError::InvalidArtifactLocation(format!(
                "path contains a NUL byte: {:?}",
                raw
            )));
        }
        Ok(Self(PathBuf::from(raw)))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Execution runtime of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runtime {
    ProvidedAl2023,
    ProvidedAl2,
    Custom(String),
}

impl Runtime {
    pub fn identifier(&self) -> &str {
        match self {
            Runtime::ProvidedAl2023 => "provided.al2023",
            Runtime::ProvidedAl2 => "provided.al2",
            Runtime::Custom(id) => id.as_str(),
        }
    }
}

/// Instruction set the artifact was compiled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Architecture {
    #[default]
    X86_64,
    Arm64,
}

impl Architecture {
    pub fn identifier(&self) -> &'static str {
        match self {
            Architecture::X86_64 => "x86_64",
            Architecture::Arm64 => "arm64",
        }
    }
}

/// Function declaration properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionProps {
    pub artifact: String,
    pub runtime: Runtime,
    /// Entry-point marker. Custom runtimes ignore it but it must be present.
    pub handler: String,
    pub function_name: Option<String>,
    pub architecture: Architecture,
    pub memory_size_mb: u32,
    pub timeout_seconds: u32,
    pub environment: BTreeMap<String, String>,
}

impl FunctionProps {
    pub fn new(artifact: impl Into<String>, runtime: Runtime) -> Self {
        Self {
            artifact: artifact.into(),
            runtime,
            handler: "bootstrap".to_string(),
            function_name: None,
            architecture: Architecture::default(),
            memory_size_mb: 128,
            timeout_seconds: 3,
            environment: BTreeMap::new(),
        }
    }

    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = handler.into();
        self
    }

    /// Sets the physical function name.
    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_memory_size(mut self, memory_size_mb: u32) -> Self {
        self.memory_size_mb = memory_size_mb;
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u32) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}

/// Resource scope of a permission grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceScope {
    /// The ARN of a table declared in the same topology.
    Table(TableRef),
    /// Every resource (`*`).
    Wildcard,
    /// A literal ARN.
    Arn(String),
}

impl ResourceScope {
    /// True for `*`, whether spelled as [`ResourceScope::Wildcard`] or as a literal.
    pub fn is_wildcard(&self) -> bool {
        match self {
            ResourceScope::Wildcard => true,
            ResourceScope::Arn(arn) => arn.trim() == "*",
            ResourceScope::Table(_) => false,
        }
    }
}

/// One Allow statement attached to a function's execution identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    pub actions: Vec<String>,
    pub resources: Vec<ResourceScope>,
}

/// A declared compute function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeFunction {
    pub logical_id: String,
    pub artifact: ArtifactLocation,
    pub runtime: Runtime,
    pub handler: String,
    pub function_name: Option<String>,
    pub architecture: Architecture,
    pub memory_size_mb: u32,
    pub timeout_seconds: u32,
    pub environment: BTreeMap<String, String>,
    /// Append-only; grants accumulate in declaration order.
    pub grants: Vec<PermissionGrant>,
}

impl ComputeFunction {
    pub fn role_logical_id(&self) -> String {
        role_logical_id(&self.logical_id)
    }

    pub fn policy_logical_id(&self) -> String {
        policy_logical_id(&self.logical_id)
    }
}

pub(crate) fn role_logical_id(function: &str) -> String {
    format!("{}ServiceRole", function)
}

pub(crate) fn policy_logical_id(function: &str) -> String {
    format!("{}ServiceRoleDefaultPolicy", function)
}

pub(crate) fn endpoint_logical_id(function: &str) -> String {
    format!("{}Url", function)
}

pub(crate) fn invoke_permission_logical_id(function: &str) -> String {
    format!("{}invokefunctionurl", function)
}

pub(crate) fn asset_bucket_parameter_id(function: &str) -> String {
    format!("{}AssetBucket", function)
}

pub(crate) fn asset_key_parameter_id(function: &str) -> String {
    format!("{}AssetKey", function)
}

/// Every template id a function declaration occupies, its own included.
pub(crate) fn function_logical_ids(function: &str) -> Vec<String> {
    vec![
        function.to_string(),
        role_logical_id(function),
        policy_logical_id(function),
        asset_bucket_parameter_id(function),
        asset_key_parameter_id(function),
    ]
}

/// Template ids occupied by a function's public endpoint.
pub(crate) fn endpoint_logical_ids(function: &str) -> Vec<String> {
    vec![
        endpoint_logical_id(function),
        invoke_permission_logical_id(function),
    ]
}

/// Authentication required to call a public endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    None,
    AwsIam,
}

impl AuthMode {
    pub fn identifier(&self) -> &'static str {
        match self {
            AuthMode::None => "NONE",
            AuthMode::AwsIam => "AWS_IAM",
        }
    }
}

/// A public invocation endpoint attached to one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEndpoint {
    pub logical_id: String,
    pub function: FunctionRef,
    pub auth_mode: AuthMode,
}

/// Value captured by an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    /// The resolved address of a public endpoint.
    EndpointUrl(EndpointRef),
}

/// A named value surfaced to whoever runs the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub name: String,
    pub value: OutputValue,
    pub description: Option<String>,
}

/// Target environment coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl Environment {
    /// An environment-agnostic description, deployable anywhere.
    pub fn agnostic() -> Self {
        Self::default()
    }

    pub fn region(region: impl Into<String>) -> Self {
        Self {
            account: None,
            region: Some(region.into()),
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn is_agnostic(&self) -> bool {
        self.account.is_none() && self.region.is_none()
    }
}

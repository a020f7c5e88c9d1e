//! Entry point error types.

use newsletter_core::topology::TopologyError;
use thiserror::Error;

/// Result type alias for the deploy crate.
pub type Result<T> = std::result::Result<T, DeployError>;

/// Errors that can occur while synthesizing or writing a topology.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_error_display() {
        let error = DeployError::from(TopologyError::UnknownFunction);
        assert_eq!(
            error.to_string(),
            "Topology error: Function reference was not declared by this builder"
        );
    }
}

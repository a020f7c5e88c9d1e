//! Machine-readable output.

use crate::error::Result;

/// Serializes a command result as compact JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

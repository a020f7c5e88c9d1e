//! Rendering of command results.

pub mod json;
pub mod pretty;

pub use json::format_json;

//! newsletter_deploy - entry point that synthesizes the newsletter topology.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod prelude;

pub use error::{DeployError, Result};

//! newsletter_core - declarative deployment topology for the newsletter service.

pub mod stack;
pub mod topology;

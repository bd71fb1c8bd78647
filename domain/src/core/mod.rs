//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`] / [`model::ModelCatalog`] - opaque gateway model ids and their metadata
//! - [`prompt::Prompt`] - a validated prompt to fan out to every model
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod prompt;

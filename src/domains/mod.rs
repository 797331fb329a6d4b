//! Triage domains: metadata, activation and audit-event explanations.
//!
//! Only the medical domain carries assessment rules. SRE and crypto are
//! registered so they can be listed and explained, but turns for them are
//! refused at the pipeline boundary.

pub mod explain;
pub mod registry;

use thiserror::Error;

use crate::models::Domain;

pub use explain::explain_event;
pub use registry::{parse_active_domains, DomainRegistry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Domain '{0}' not found in registry")]
    NotFound(String),

    #[error("Domain '{0}' is not active")]
    Inactive(Domain),
}

pub mod audit;
pub mod orchestrator;
pub mod types;

pub use audit::{AuditSink, MemoryAuditLog};
pub use orchestrator::{TriagePipeline, FALLBACK_MODEL};
pub use types::{AuditEvent, Incident, TurnResult};

use thiserror::Error;
use uuid::Uuid;

use crate::domains::DomainError;
use crate::models::Domain;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Domain '{0}' has no triage rules")]
    UnsupportedDomain(Domain),

    #[error("Incident {0} is closed")]
    IncidentClosed(Uuid),

    #[error("Input text is empty")]
    EmptyInput,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock acquisition failed")]
    LockFailed,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extraction::TokenUsage;
use crate::models::{Assessment, AuditStep, Domain, Extraction, IncidentStatus, SeverityLabel};
use crate::reply::Reply;

/// The slice of an incident a triage turn needs. Persistence is the caller's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub domain: Domain,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
}

impl Incident {
    pub fn new(domain: Domain) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain,
            status: IncidentStatus::Open,
            created_at: Utc::now(),
        }
    }
}

/// One step of one turn, as written to the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub incident_id: Uuid,
    pub trace_id: Uuid,
    pub step: AuditStep,
    /// Redacted before it gets here.
    pub payload: serde_json::Value,
    pub latency_ms: u64,
    pub model_used: Option<String>,
    pub token_usage: Option<TokenUsage>,
    pub recorded_at: DateTime<Utc>,
}

/// Everything a caller needs to persist and answer one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub trace_id: Uuid,
    pub extraction: Extraction,
    pub assessment: Assessment,
    pub severity: SeverityLabel,
    pub reply: Reply,
    /// Status the incident should move to; equal to the input status when
    /// nothing changed.
    pub next_status: IncidentStatus,
}

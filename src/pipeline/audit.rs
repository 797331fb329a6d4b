use std::sync::RwLock;

use uuid::Uuid;

use super::types::AuditEvent;
use super::PipelineError;

/// Append-only destination for audit events.
pub trait AuditSink {
    fn append(&self, event: AuditEvent) -> Result<(), PipelineError>;
}

/// In-memory audit log backed by RwLock.
#[derive(Default)]
pub struct MemoryAuditLog {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of one turn, in recording order.
    pub fn events_for(&self, trace_id: Uuid) -> Result<Vec<AuditEvent>, PipelineError> {
        let events = self.events.read().map_err(|_| PipelineError::LockFailed)?;
        Ok(events
            .iter()
            .filter(|e| e.trace_id == trace_id)
            .cloned()
            .collect())
    }

    /// Events of one incident across all turns.
    pub fn events_for_incident(&self, incident_id: Uuid) -> Result<Vec<AuditEvent>, PipelineError> {
        let events = self.events.read().map_err(|_| PipelineError::LockFailed)?;
        Ok(events
            .iter()
            .filter(|e| e.incident_id == incident_id)
            .cloned()
            .collect())
    }

    pub fn len(&self) -> Result<usize, PipelineError> {
        let events = self.events.read().map_err(|_| PipelineError::LockFailed)?;
        Ok(events.len())
    }

    pub fn is_empty(&self) -> Result<bool, PipelineError> {
        Ok(self.len()? == 0)
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, event: AuditEvent) -> Result<(), PipelineError> {
        let mut events = self.events.write().map_err(|_| PipelineError::LockFailed)?;
        tracing::debug!(
            trace_id = %event.trace_id,
            step = event.step.as_str(),
            latency_ms = event.latency_ms,
            "Audit event recorded"
        );
        events.push(event);
        Ok(())
    }
}

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use super::audit::AuditSink;
use super::types::{AuditEvent, Incident, TurnResult};
use super::PipelineError;
use crate::domains::DomainRegistry;
use crate::extraction::{
    extract_from_text, ExtractionError, ExtractionModel, KeywordExtractor, TokenUsage,
};
use crate::models::{AuditStep, Domain, Extraction, IncidentStatus};
use crate::redaction::redact_json;
use crate::reply::{compose_reply, overrides_generation, DeterministicFollowup, FollowupGenerator};
use crate::triage::assess;

/// Model name recorded when the configured extractor failed and the keyword
/// extractor stood in.
pub const FALLBACK_MODEL: &str = "deterministic-fallback";

/// Runs one user turn: extract → assess → reply, one audit event per step.
pub struct TriagePipeline {
    registry: DomainRegistry,
    extractor: Box<dyn ExtractionModel + Send + Sync>,
    followup: Box<dyn FollowupGenerator + Send + Sync>,
    audit: Arc<dyn AuditSink + Send + Sync>,
}

impl TriagePipeline {
    pub fn new(
        registry: DomainRegistry,
        extractor: Box<dyn ExtractionModel + Send + Sync>,
        followup: Box<dyn FollowupGenerator + Send + Sync>,
        audit: Arc<dyn AuditSink + Send + Sync>,
    ) -> Self {
        Self {
            registry,
            extractor,
            followup,
            audit,
        }
    }

    /// Keyword extraction and fixed follow-up questions. No LLM involved.
    pub fn deterministic(registry: DomainRegistry, audit: Arc<dyn AuditSink + Send + Sync>) -> Self {
        Self::new(
            registry,
            Box::new(KeywordExtractor),
            Box::new(DeterministicFollowup),
            audit,
        )
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn run_turn(&self, incident: &Incident, text: &str) -> Result<TurnResult, PipelineError> {
        let domain = self.registry.get(incident.domain.as_str(), false)?;
        if domain != Domain::Medical {
            return Err(PipelineError::UnsupportedDomain(domain));
        }
        if incident.status == IncidentStatus::Closed {
            return Err(PipelineError::IncidentClosed(incident.id));
        }
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let trace_id = Uuid::new_v4();
        let turn_start = Instant::now();

        // ── Extract ──────────────────────────────────────────
        let t0 = Instant::now();
        let (mut extraction, extract_model) = self.extract(trace_id, text);
        extraction.extracted_at = Some(Utc::now());
        let mut payload = redact_json(&serde_json::to_value(&extraction)?);
        if let Value::Object(map) = &mut payload {
            map.insert("model".into(), Value::String(extract_model.clone()));
        }
        self.record(
            incident,
            trace_id,
            AuditStep::Extract,
            payload,
            t0,
            Some(extract_model),
            None,
        )?;

        // ── Triage ───────────────────────────────────────────
        let t0 = Instant::now();
        let assessment = assess(&extraction);
        let payload = json!({
            "acuity": assessment.acuity,
            "escalate": assessment.escalate,
            "red_flags": serde_json::to_value(&assessment.red_flags)?,
            "disposition": assessment.disposition.as_str(),
        });
        self.record(incident, trace_id, AuditStep::Triage, payload, t0, None, None)?;

        // ── Generate ─────────────────────────────────────────
        let generated = if overrides_generation(&assessment) {
            None
        } else {
            let t0 = Instant::now();
            let (text, model, usage) = match self.followup.generate(&extraction) {
                Ok(completion) => (
                    Some(completion.text),
                    self.followup.model_name().to_string(),
                    completion.usage,
                ),
                Err(e) => {
                    tracing::warn!(
                        trace_id = %trace_id,
                        error = %e,
                        "Follow-up generation failed, using deterministic question"
                    );
                    (None, FALLBACK_MODEL.to_string(), None)
                }
            };
            let source = compose_reply(&assessment, &extraction, text.as_deref()).source;
            let payload = json!({
                "disposition": assessment.disposition.as_str(),
                "source": source.as_str(),
                "model": &model,
            });
            self.record(
                incident,
                trace_id,
                AuditStep::Generate,
                payload,
                t0,
                Some(model),
                usage,
            )?;
            text
        };

        let reply = compose_reply(&assessment, &extraction, generated.as_deref());
        let next_status = incident.status.after_assessment(assessment.escalate);
        if next_status != incident.status {
            tracing::warn!(
                incident_id = %incident.id,
                trace_id = %trace_id,
                acuity = assessment.acuity,
                "Incident escalated"
            );
        }

        tracing::info!(
            incident_id = %incident.id,
            trace_id = %trace_id,
            acuity = assessment.acuity,
            escalate = assessment.escalate,
            reply_source = reply.source.as_str(),
            total_ms = elapsed_ms(turn_start),
            "Triage turn complete"
        );

        Ok(TurnResult {
            trace_id,
            severity: assessment.severity_label(),
            extraction,
            assessment,
            reply,
            next_status,
        })
    }

    /// Configured extractor, or the keyword extractor when it fails.
    fn extract(&self, trace_id: Uuid, text: &str) -> (Extraction, String) {
        let attempt = self.extractor.extract(text).and_then(|extraction| {
            extraction.validate()?;
            Ok::<_, ExtractionError>(extraction)
        });
        match attempt {
            Ok(extraction) => (extraction, self.extractor.model_name().to_string()),
            Err(e) => {
                tracing::warn!(
                    trace_id = %trace_id,
                    model = self.extractor.model_name(),
                    error = %e,
                    "Extraction failed, using keyword fallback"
                );
                (extract_from_text(text), FALLBACK_MODEL.to_string())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &self,
        incident: &Incident,
        trace_id: Uuid,
        step: AuditStep,
        payload: Value,
        started: Instant,
        model_used: Option<String>,
        token_usage: Option<TokenUsage>,
    ) -> Result<(), PipelineError> {
        self.audit.append(AuditEvent {
            incident_id: incident.id,
            trace_id,
            step,
            payload,
            latency_ms: elapsed_ms(started),
            model_used,
            token_usage,
            recorded_at: Utc::now(),
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

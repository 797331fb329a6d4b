pub mod config;
pub mod domains;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod redaction;
pub mod reply;
pub mod triage;

#[cfg(test)]
mod phi_audit;

use tracing_subscriber::EnvFilter;

pub use config::Settings;
pub use pipeline::{Incident, TriagePipeline, TurnResult};
pub use triage::assess;

/// Install the global fmt subscriber. RUST_LOG wins over the crate default.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(version = config::APP_VERSION, "{} starting", config::APP_NAME);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Domain, IncidentStatus};
    use crate::pipeline::MemoryAuditLog;

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn settings_drive_a_working_pipeline() {
        let settings = Settings::default();
        let log = Arc::new(MemoryAuditLog::new());
        let pipeline = TriagePipeline::deterministic(settings.registry(), log.clone());

        let incident = Incident::new(Domain::Medical);
        let result = pipeline
            .run_turn(&incident, "I have crushing chest pain and can't breathe")
            .unwrap();
        assert!(result.assessment.escalate);
        assert_eq!(result.next_status, IncidentStatus::Escalated);
        assert!(!log.is_empty().unwrap());
    }
}

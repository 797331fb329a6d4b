//! Deterministic triage engine.
//!
//! Extraction → [red-flag detector ∥ risk-signal evaluator] → acuity scorer →
//! assessment composer. Every stage is a pure function over static tables.

pub mod acuity;
pub mod keywords;
pub mod orchestrator;
pub mod signals;

pub use acuity::compute_acuity;
pub use keywords::detect_red_flags;
pub use orchestrator::assess;
pub use signals::evaluate_risk_signals;

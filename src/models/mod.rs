pub mod assessment;
pub mod enums;
pub mod extraction;

use thiserror::Error;

pub use assessment::{Assessment, RedFlag, TriggeredRiskFlag};
pub use enums::{
    AuditStep, Disposition, Domain, IncidentStatus, MentalStatus, RiskFlagType, Severity,
    SeverityLabel, SignalState,
};
pub use extraction::{Extraction, RiskSignals, VitalSigns};

/// Errors raised while building or validating model values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
}

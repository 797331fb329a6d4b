use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{MentalStatus, RiskFlagType, SignalState};
use super::ModelError;

/// Patient vital signs. Every field is independently optional:
/// `None` means "not reported", never "normal".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalSigns {
    /// Beats per minute.
    pub heart_rate: Option<u32>,
    #[serde(alias = "bp_systolic")]
    pub blood_pressure_systolic: Option<u32>,
    #[serde(alias = "bp_diastolic")]
    pub blood_pressure_diastolic: Option<u32>,
    pub respiratory_rate: Option<u32>,
    pub temperature_f: Option<f64>,
    /// Percent.
    pub oxygen_saturation: Option<u32>,
}

/// Critical risk signals extracted from the conversation.
///
/// Each signal carries a danger indicator and a conviction score in [0, 1].
/// Psychiatric signals are booleans; physical signals are tri-state so a
/// missing observation stays `Unknown` instead of collapsing to "no".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSignals {
    pub suicidal_ideation: bool,
    pub suicidal_ideation_conviction: f64,

    pub self_harm_intent: bool,
    pub self_harm_intent_conviction: f64,

    pub homicidal_ideation: bool,
    pub homicidal_ideation_conviction: f64,

    /// Danger when `No`.
    pub can_breathe: SignalState,
    pub can_breathe_conviction: f64,

    pub chest_pain: SignalState,
    pub chest_pain_conviction: f64,

    pub neuro_deficit: SignalState,
    pub neuro_deficit_conviction: f64,

    pub bleeding_uncontrolled: SignalState,
    pub bleeding_uncontrolled_conviction: f64,

    /// Flags the extractor itself believed were present.
    pub red_flags_detected: Vec<RiskFlagType>,
    /// Fields that would help complete triage.
    pub missing_fields: Vec<String>,
}

/// Structured facts extracted from one user turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extraction {
    /// Original user input text.
    pub raw_input: String,
    /// Extractor confidence.
    pub confidence: f64,
    pub extracted_at: Option<DateTime<Utc>>,

    pub chief_complaint: String,
    pub symptoms: Vec<String>,
    pub pain_scale: Option<u8>,
    pub vitals: VitalSigns,
    pub medical_history: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    /// When symptoms started, as reported.
    pub onset: String,
    pub mental_status: MentalStatus,
    pub risk_signals: RiskSignals,
}

impl RiskSignals {
    /// (field name, conviction) pairs for range validation.
    fn convictions(&self) -> [(&'static str, f64); 7] {
        [
            ("suicidal_ideation_conviction", self.suicidal_ideation_conviction),
            ("self_harm_intent_conviction", self.self_harm_intent_conviction),
            ("homicidal_ideation_conviction", self.homicidal_ideation_conviction),
            ("can_breathe_conviction", self.can_breathe_conviction),
            ("chest_pain_conviction", self.chest_pain_conviction),
            ("neuro_deficit_conviction", self.neuro_deficit_conviction),
            ("bleeding_uncontrolled_conviction", self.bleeding_uncontrolled_conviction),
        ]
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (field, value) in self.convictions() {
            check_unit_interval(field, value)?;
        }
        Ok(())
    }
}

impl VitalSigns {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_int("heart_rate", self.heart_rate, 300)?;
        check_int("blood_pressure_systolic", self.blood_pressure_systolic, 300)?;
        check_int("blood_pressure_diastolic", self.blood_pressure_diastolic, 200)?;
        check_int("respiratory_rate", self.respiratory_rate, 60)?;
        check_int("oxygen_saturation", self.oxygen_saturation, 100)?;
        if let Some(temp) = self.temperature_f {
            if !(80.0..=115.0).contains(&temp) {
                return Err(out_of_range("temperature_f", temp, 80.0, 115.0));
            }
        }
        Ok(())
    }
}

impl Extraction {
    /// Check every bounded field. The triage engine assumes this has passed
    /// and does not re-check ranges itself.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(pain) = self.pain_scale {
            if pain > 10 {
                return Err(out_of_range("pain_scale", pain, 0, 10));
            }
        }
        check_unit_interval("confidence", self.confidence)?;
        self.vitals.validate()?;
        self.risk_signals.validate()
    }
}

fn check_int(field: &'static str, value: Option<u32>, max: u32) -> Result<(), ModelError> {
    match value {
        Some(v) if v > max => Err(out_of_range(field, v, 0, max)),
        _ => Ok(()),
    }
}

fn check_unit_interval(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, value, 0.0, 1.0))
    }
}

fn out_of_range<T: std::fmt::Display>(field: &'static str, value: T, min: T, max: T) -> ModelError {
    ModelError::OutOfRange {
        field,
        value: value.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    }
}

//! ESI-like acuity scoring: 1 (immediate life threat) to 5 (minor).
//!
//! Tiers are checked top-down and the first match wins. Tier 3 vital limits
//! are looser than the detector's limits: moderate abnormality lands here,
//! severe abnormality has already become a red flag.

use crate::models::{Extraction, MentalStatus, RedFlag};

/// Flag names that alone make a case ESI-1.
pub static LIFE_THREAT_FLAGS: &[&str] = &[
    "chest_pain_with_sob",
    "severe bleeding",
    "anaphylaxis",
    "heart attack",
    "cardiac arrest",
    "dying",
    "going to die",
    "overdose",
];

pub const ESI_IMMEDIATE: u8 = 1;
pub const ESI_EMERGENT: u8 = 2;
pub const ESI_URGENT: u8 = 3;
pub const ESI_LESS_URGENT: u8 = 4;
pub const ESI_NON_URGENT: u8 = 5;

const SEVERE_PAIN_AT: u8 = 8;
const MODERATE_PAIN_AT: u8 = 5;
const ABNORMAL_HR_ABOVE: u32 = 100;
const ABNORMAL_HR_BELOW: u32 = 50;
const FEVER_AT_F: f64 = 101.0;
const LOW_SPO2_BELOW: u32 = 95;

/// Compute acuity from the extraction and the combined red-flag list
/// (keyword/vital flags plus triggered risk signals). Never fails.
pub fn compute_acuity(extraction: &Extraction, red_flags: &[RedFlag]) -> u8 {
    let pain = extraction.pain_scale;

    // ESI-1: unresponsive or life-threatening flag
    if extraction.mental_status == MentalStatus::Unresponsive
        || red_flags
            .iter()
            .any(|f| LIFE_THREAT_FLAGS.contains(&f.name.as_str()))
    {
        return ESI_IMMEDIATE;
    }

    // ESI-2: confused, multiple red flags, or severe pain
    if extraction.mental_status == MentalStatus::Confused
        || red_flags.len() >= 2
        || pain.is_some_and(|p| p >= SEVERE_PAIN_AT)
    {
        return ESI_EMERGENT;
    }

    // ESI-3: any red flag, moderate pain, abnormal vitals
    if !red_flags.is_empty()
        || pain.is_some_and(|p| p >= MODERATE_PAIN_AT)
        || has_abnormal_vitals(extraction)
    {
        return ESI_URGENT;
    }

    // ESI-4: some symptoms or a pain report, nothing alarming
    if extraction.symptoms.len() >= 2 || pain.is_some() {
        return ESI_LESS_URGENT;
    }

    ESI_NON_URGENT
}

fn has_abnormal_vitals(extraction: &Extraction) -> bool {
    let vitals = &extraction.vitals;
    vitals
        .heart_rate
        .is_some_and(|hr| hr > ABNORMAL_HR_ABOVE || hr < ABNORMAL_HR_BELOW)
        || vitals.temperature_f.is_some_and(|t| t >= FEVER_AT_F)
        || vitals.oxygen_saturation.is_some_and(|s| s < LOW_SPO2_BELOW)
}

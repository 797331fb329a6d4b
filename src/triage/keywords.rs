//! Red-flag detection over complaint text, mental status and vital signs.
//!
//! Matching is plain lowercase substring search with no tokenization, so
//! "I'm not suicidal" still matches "suicidal". Over-flagging is accepted;
//! under-flagging is not.

use crate::models::{Extraction, MentalStatus, RedFlag};

// ── Keyword table ───────────────────────────────────────────

/// Keyword → reason. Order is emission order.
pub static RED_FLAG_KEYWORDS: &[(&str, &str)] = &[
    // Cardiac
    ("chest pain", "Possible cardiac event"),
    ("heart attack", "Possible cardiac event"),
    ("cardiac arrest", "Possible cardiac event"),
    // Respiratory
    ("difficulty breathing", "Respiratory distress"),
    ("shortness of breath", "Respiratory distress"),
    ("can't breathe", "Respiratory distress"),
    ("cannot breathe", "Respiratory distress"),
    ("choking", "Respiratory distress"),
    // Bleeding
    ("severe bleeding", "Hemorrhage risk"),
    ("uncontrolled bleeding", "Hemorrhage risk"),
    ("bleeding heavily", "Hemorrhage risk"),
    // Neurological
    ("seizure", "Neurological emergency"),
    ("convulsion", "Neurological emergency"),
    ("stroke", "Possible CVA"),
    ("slurred speech", "Possible CVA"),
    ("facial drooping", "Possible CVA"),
    // Consciousness
    ("loss of consciousness", "Altered consciousness"),
    ("passed out", "Altered consciousness"),
    ("fainted", "Altered consciousness"),
    // Imminent danger
    ("dying", "Patient reports imminent death"),
    ("going to die", "Patient reports imminent death"),
    // Psychiatric
    ("suicidal", "Psychiatric emergency"),
    ("self-harm", "Psychiatric emergency"),
    ("kill myself", "Psychiatric emergency"),
    // Allergic / toxic
    ("anaphylaxis", "Severe allergic reaction"),
    ("severe allergic reaction", "Severe allergic reaction"),
    ("overdose", "Possible overdose"),
];

static CHEST_PAIN_KEYWORDS: &[&str] = &["chest pain"];

static BREATHING_DISTRESS_KEYWORDS: &[&str] = &["shortness of breath", "difficulty breathing"];

pub const CHEST_PAIN_WITH_SOB: &str = "chest_pain_with_sob";
pub const ALTERED_MENTAL_STATUS: &str = "altered_mental_status";

// ── Vital-sign limits (severe abnormality) ──────────────────

pub const TACHYCARDIA_ABOVE_BPM: u32 = 150;
pub const BRADYCARDIA_BELOW_BPM: u32 = 40;
pub const HYPOXIA_BELOW_PCT: u32 = 90;
pub const HIGH_FEVER_AT_F: f64 = 104.0;
pub const HYPOTENSION_BELOW_SBP: u32 = 80;

// ── Detection ───────────────────────────────────────────────

/// Lowercased complaint followed by every symptom, space-joined.
pub fn searchable_text(extraction: &Extraction) -> String {
    std::iter::once(extraction.chief_complaint.as_str())
        .chain(extraction.symptoms.iter().map(String::as_str))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scan an extraction for red-flag conditions. Never fails.
pub fn detect_red_flags(extraction: &Extraction) -> Vec<RedFlag> {
    let searchable = searchable_text(extraction);
    let mut flags: Vec<RedFlag> = RED_FLAG_KEYWORDS
        .iter()
        .filter(|(keyword, _)| searchable.contains(keyword))
        .map(|(keyword, reason)| RedFlag::new(*keyword, *reason))
        .collect();

    if contains_any(&searchable, CHEST_PAIN_KEYWORDS)
        && contains_any(&searchable, BREATHING_DISTRESS_KEYWORDS)
    {
        flags.push(RedFlag::new(
            CHEST_PAIN_WITH_SOB,
            "Chest pain combined with respiratory distress: high-risk cardiac",
        ));
    }

    if matches!(
        extraction.mental_status,
        MentalStatus::Confused | MentalStatus::Unresponsive
    ) {
        flags.push(RedFlag::new(
            ALTERED_MENTAL_STATUS,
            format!("Mental status: {}", extraction.mental_status),
        ));
    }

    flags.extend(vital_sign_flags(extraction));
    flags
}

/// Range checks on reported vitals. Absent vitals are skipped, not flagged.
fn vital_sign_flags(extraction: &Extraction) -> Vec<RedFlag> {
    let vitals = &extraction.vitals;
    let mut flags = Vec::new();

    if let Some(hr) = vitals.heart_rate {
        if hr > TACHYCARDIA_ABOVE_BPM {
            flags.push(RedFlag::new(
                "tachycardia",
                format!("HR {hr} > {TACHYCARDIA_ABOVE_BPM}"),
            ));
        }
        if hr < BRADYCARDIA_BELOW_BPM {
            flags.push(RedFlag::new(
                "bradycardia",
                format!("HR {hr} < {BRADYCARDIA_BELOW_BPM}"),
            ));
        }
    }
    if let Some(spo2) = vitals.oxygen_saturation {
        if spo2 < HYPOXIA_BELOW_PCT {
            flags.push(RedFlag::new(
                "hypoxia",
                format!("SpO2 {spo2}% < {HYPOXIA_BELOW_PCT}%"),
            ));
        }
    }
    if let Some(temp) = vitals.temperature_f {
        if temp >= HIGH_FEVER_AT_F {
            flags.push(RedFlag::new(
                "high_fever",
                format!("Temp {temp:?}\u{00b0}F >= {HIGH_FEVER_AT_F:.0}\u{00b0}F"),
            ));
        }
    }
    if let Some(sbp) = vitals.blood_pressure_systolic {
        if sbp < HYPOTENSION_BELOW_SBP {
            flags.push(RedFlag::new(
                "hypotension",
                format!("SBP {sbp} < {HYPOTENSION_BELOW_SBP}"),
            ));
        }
    }

    flags
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

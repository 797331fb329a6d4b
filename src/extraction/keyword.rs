//! Deterministic keyword extraction. Used when no LLM is configured and as the
//! fallback whenever the LLM path fails.

use std::sync::LazyLock;

use regex::Regex;

use super::types::ExtractionModel;
use super::ExtractionError;
use crate::models::{Extraction, MentalStatus, RiskFlagType, RiskSignals, SignalState};

pub const KEYWORD_MODEL_NAME: &str = "deterministic";

const CHIEF_COMPLAINT_MAX_CHARS: usize = 200;
const KEYWORD_CONVICTION: f64 = 0.9;

static SYMPTOM_KEYWORDS: &[&str] = &[
    "chest pain",
    "shortness of breath",
    "difficulty breathing",
    "headache",
    "nausea",
    "vomiting",
    "dizziness",
    "fever",
    "cough",
    "sore throat",
    "abdominal pain",
    "back pain",
    "seizure",
    "bleeding",
    "rash",
    "fatigue",
];

static SUICIDAL_KEYWORDS: &[&str] = &[
    "suicidal",
    "kill myself",
    "end my life",
    "want to die",
    "finish with myself",
    "end it all",
    "take my life",
];

static SELF_HARM_KEYWORDS: &[&str] = &[
    "self-harm",
    "self harm",
    "hurt myself",
    "cut myself",
    "harm myself",
    "injure myself",
];

static HOMICIDAL_KEYWORDS: &[&str] = &["kill someone", "hurt someone", "harm others", "homicidal"];

static CANNOT_BREATHE_KEYWORDS: &[&str] = &[
    "can't breathe",
    "cannot breathe",
    "cant breathe",
    "struggling to breathe",
    "hard to breathe",
    "difficulty breathing",
];

static CHEST_PAIN_KEYWORDS: &[&str] = &["chest pain", "pain in my chest", "chest hurts", "heart pain"];

static NEURO_KEYWORDS: &[&str] = &[
    "stroke",
    "seizure",
    "slurred speech",
    "facial drooping",
    "can't move",
    "numbness",
    "paralysis",
    "weakness on one side",
];

static BLEEDING_KEYWORDS: &[&str] = &[
    "uncontrolled bleeding",
    "severe bleeding",
    "bleeding heavily",
    "won't stop bleeding",
    "blood everywhere",
];

static AGE_PHRASES: &[&str] = &["age", "years old", "year old"];

/// "pain 7", "pain is 7", "pain level 7"
static PAIN_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pain (?:is |level )?(\d{1,2})\b").unwrap()
});

/// "7/10", "7 out of 10"
static PAIN_RATIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?:/| out of )10\b").unwrap()
});

/// Extract medical facts from free text by keyword matching. Never fails.
pub fn extract_from_text(text: &str) -> Extraction {
    let lower = text.to_lowercase();

    let symptoms = SYMPTOM_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();

    Extraction {
        raw_input: text.to_string(),
        chief_complaint: text.chars().take(CHIEF_COMPLAINT_MAX_CHARS).collect(),
        symptoms,
        pain_scale: detect_pain_scale(&lower),
        mental_status: detect_mental_status(&lower),
        risk_signals: extract_risk_signals(&lower),
        ..Default::default()
    }
}

/// Lowest reported pain score in 0..=10. A number is only read as a score
/// when it stands alone, so "10/10" is ten and not zero.
fn detect_pain_scale(lower: &str) -> Option<u8> {
    PAIN_PHRASE
        .captures_iter(lower)
        .chain(PAIN_RATIO.captures_iter(lower))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u8>().ok())
        .filter(|score| *score <= 10)
        .min()
}

fn detect_mental_status(lower: &str) -> MentalStatus {
    if lower.contains("confused") || lower.contains("confusion") {
        MentalStatus::Confused
    } else if lower.contains("unresponsive") {
        MentalStatus::Unresponsive
    } else {
        MentalStatus::Alert
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Keyword hits set the danger indicator with high conviction; misses stay
/// unknown with zero conviction, never "no".
fn extract_risk_signals(lower: &str) -> RiskSignals {
    let mut detected = Vec::new();
    let mut hit = |keywords: &[&str], flag: RiskFlagType| -> (bool, f64) {
        if contains_any(lower, keywords) {
            detected.push(flag);
            (true, KEYWORD_CONVICTION)
        } else {
            (false, 0.0)
        }
    };

    let (suicidal, suicidal_c) = hit(SUICIDAL_KEYWORDS, RiskFlagType::SuicidalIdeation);
    let (self_harm, self_harm_c) = hit(SELF_HARM_KEYWORDS, RiskFlagType::SelfHarm);
    let (homicidal, homicidal_c) = hit(HOMICIDAL_KEYWORDS, RiskFlagType::HomicidalIdeation);
    let (cannot_breathe, breathe_c) = hit(CANNOT_BREATHE_KEYWORDS, RiskFlagType::CannotBreathe);
    let (chest_pain, chest_c) = hit(CHEST_PAIN_KEYWORDS, RiskFlagType::ChestPain);
    let (neuro, neuro_c) = hit(NEURO_KEYWORDS, RiskFlagType::NeuroDeficit);
    let (bleeding, bleeding_c) = hit(BLEEDING_KEYWORDS, RiskFlagType::BleedingUncontrolled);

    let state = |present: bool, danger: SignalState| {
        if present {
            danger
        } else {
            SignalState::Unknown
        }
    };

    let mut missing_fields = Vec::new();
    if !contains_any(lower, AGE_PHRASES) {
        missing_fields.push("age".to_string());
    }

    RiskSignals {
        suicidal_ideation: suicidal,
        suicidal_ideation_conviction: suicidal_c,
        self_harm_intent: self_harm,
        self_harm_intent_conviction: self_harm_c,
        homicidal_ideation: homicidal,
        homicidal_ideation_conviction: homicidal_c,
        can_breathe: state(cannot_breathe, SignalState::No),
        can_breathe_conviction: breathe_c,
        chest_pain: state(chest_pain, SignalState::Yes),
        chest_pain_conviction: chest_c,
        neuro_deficit: state(neuro, SignalState::Yes),
        neuro_deficit_conviction: neuro_c,
        bleeding_uncontrolled: state(bleeding, SignalState::Yes),
        bleeding_uncontrolled_conviction: bleeding_c,
        red_flags_detected: detected,
        missing_fields,
    }
}

/// `ExtractionModel` over `extract_from_text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl ExtractionModel for KeywordExtractor {
    fn extract(&self, text: &str) -> Result<Extraction, ExtractionError> {
        Ok(extract_from_text(text))
    }

    fn model_name(&self) -> &str {
        KEYWORD_MODEL_NAME
    }
}

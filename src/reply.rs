//! User-facing reply for one triage turn.
//!
//! Escalation and red flags always produce fixed text; generated text is only
//! used when the assessment has nothing alarming to say.

use serde::{Deserialize, Serialize};

use crate::extraction::prompts::{build_followup_prompt, FOLLOWUP_SYSTEM_PROMPT};
use crate::extraction::{Completion, ExtractionError, LlmClient};
use crate::models::{Assessment, Extraction, VitalSigns};

pub const DETERMINISTIC_FOLLOWUP_MODEL: &str = "deterministic";

pub const CLOSING_MESSAGE: &str =
    "Thank you. I have enough information to complete your triage assessment.";

const ESCALATION_OPENING: &str = "Based on what you've described, your situation needs \
     immediate attention from a medical professional. I'm connecting you with a human now.";

const EMERGENCY_LINE: &str =
    "If you are in immediate danger, call your local emergency number right away.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// Fixed text chosen by the composer.
    Deterministic,
    /// Text produced by the configured follow-up generator.
    Generated,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deterministic => "deterministic",
            Self::Generated => "generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn deterministic(text: String) -> Self {
        Self {
            text,
            source: ReplySource::Deterministic,
        }
    }
}

/// Whether fixed text will be used regardless of any generated reply.
pub fn overrides_generation(assessment: &Assessment) -> bool {
    assessment.escalate || !assessment.red_flags.is_empty()
}

/// Pick the reply text. Precedence: escalation, then red flags, then the
/// generated text if non-blank, then the next deterministic question.
pub fn compose_reply(
    assessment: &Assessment,
    extraction: &Extraction,
    generated: Option<&str>,
) -> Reply {
    if assessment.escalate {
        return Reply::deterministic(escalation_message(assessment));
    }
    if !assessment.red_flags.is_empty() {
        return Reply::deterministic(red_flag_message(assessment));
    }
    match generated.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => Reply {
            text: text.to_string(),
            source: ReplySource::Generated,
        },
        None => Reply::deterministic(next_followup_question(extraction).to_string()),
    }
}

fn escalation_message(assessment: &Assessment) -> String {
    let mut parts = vec![ESCALATION_OPENING];
    if !assessment.escalation_reason.is_empty() {
        parts.push(assessment.escalation_reason.as_str());
    }
    parts.push(EMERGENCY_LINE);
    parts.join(" ")
}

fn red_flag_message(assessment: &Assessment) -> String {
    format!(
        "Some of what you've described can be serious ({}). Please arrange to be seen \
         in person promptly. {EMERGENCY_LINE}",
        assessment.red_flag_names().join(", ")
    )
}

/// The single most important missing item, in intake priority order.
pub fn next_followup_question(extraction: &Extraction) -> &'static str {
    if extraction.chief_complaint.trim().is_empty() {
        "What is the main reason you're reaching out today?"
    } else if extraction.pain_scale.is_none() {
        "On a scale of 0 to 10, how bad is your pain or discomfort right now?"
    } else if vitals_unreported(&extraction.vitals) {
        "Do you know any of your vital signs, such as your temperature or heart rate?"
    } else if extraction.medical_history.is_empty() {
        "Do you have any ongoing medical conditions or past medical history I should know about?"
    } else if extraction.allergies.is_empty() {
        "Do you have any allergies to medications or anything else?"
    } else if extraction.medications.is_empty() {
        "Are you currently taking any medications?"
    } else {
        CLOSING_MESSAGE
    }
}

fn vitals_unreported(vitals: &VitalSigns) -> bool {
    *vitals == VitalSigns::default()
}

/// Produces the follow-up text for non-alarming turns.
pub trait FollowupGenerator {
    fn generate(&self, extraction: &Extraction) -> Result<Completion, ExtractionError>;

    /// Name recorded in audit events.
    fn model_name(&self) -> &str;
}

/// Fixed priority-order questions. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicFollowup;

impl FollowupGenerator for DeterministicFollowup {
    fn generate(&self, extraction: &Extraction) -> Result<Completion, ExtractionError> {
        Ok(Completion::text(next_followup_question(extraction)))
    }

    fn model_name(&self) -> &str {
        DETERMINISTIC_FOLLOWUP_MODEL
    }
}

/// Follow-up questions from an LLM, given the extraction so far.
pub struct LlmFollowup {
    llm: Box<dyn LlmClient + Send + Sync>,
    model_name: String,
}

impl LlmFollowup {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, model_name: &str) -> Self {
        Self {
            llm,
            model_name: model_name.to_string(),
        }
    }
}

impl FollowupGenerator for LlmFollowup {
    fn generate(&self, extraction: &Extraction) -> Result<Completion, ExtractionError> {
        let extraction_json = serde_json::to_string_pretty(extraction)
            .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;
        let completion = self.llm.generate(
            &self.model_name,
            &build_followup_prompt(&extraction_json),
            FOLLOWUP_SYSTEM_PROMPT,
        )?;
        if completion.text.trim().is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }
        Ok(completion)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::Extraction;

/// Token accounting reported by a completion, when the backend gives it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One LLM completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// LLM client abstraction (allows mocking). The crate ships no network client.
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str, system: &str)
        -> Result<Completion, ExtractionError>;
}

/// Anything that can turn one user turn into a structured extraction.
pub trait ExtractionModel {
    fn extract(&self, text: &str) -> Result<Extraction, ExtractionError>;

    /// Name recorded in audit events.
    fn model_name(&self) -> &str;
}

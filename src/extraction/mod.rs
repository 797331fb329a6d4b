//! Turning free text into an `Extraction`.
//!
//! Two paths: an LLM behind the `LlmClient` seam, and a deterministic keyword
//! extractor that is always available and is the fallback when the LLM path
//! fails.

pub mod keyword;
pub mod llm;
pub mod parser;
pub mod prompts;
pub mod types;

pub use keyword::{extract_from_text, KeywordExtractor};
pub use llm::{LlmExtractor, MockLlmClient};
pub use parser::parse_extraction_response;
pub use prompts::{EXTRACTION_SYSTEM_PROMPT, FOLLOWUP_SYSTEM_PROMPT};
pub use types::{Completion, ExtractionModel, LlmClient, TokenUsage};

use thiserror::Error;

use crate::models::ModelError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("LLM client error: {0}")]
    Client(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Extraction failed validation: {0}")]
    Invalid(#[from] ModelError),
}

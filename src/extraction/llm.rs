use std::sync::atomic::{AtomicUsize, Ordering};

use super::parser::parse_extraction_response;
use super::prompts::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::types::{Completion, ExtractionModel, LlmClient, TokenUsage};
use super::ExtractionError;
use crate::models::Extraction;

/// Maximum re-asks when the reply cannot be parsed.
const MAX_LLM_RETRIES: usize = 2;

/// LLM-backed extraction: extraction prompt → LLM → lenient parse → validate.
pub struct LlmExtractor {
    llm: Box<dyn LlmClient + Send + Sync>,
    model_name: String,
}

impl LlmExtractor {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, model_name: &str) -> Self {
        Self {
            llm,
            model_name: model_name.to_string(),
        }
    }
}

fn is_parse_error(e: &ExtractionError) -> bool {
    matches!(
        e,
        ExtractionError::EmptyResponse
            | ExtractionError::MalformedResponse(_)
            | ExtractionError::JsonParsing(_)
    )
}

impl ExtractionModel for LlmExtractor {
    /// Client errors propagate at once; unparseable replies are retried.
    fn extract(&self, text: &str) -> Result<Extraction, ExtractionError> {
        let prompt = build_extraction_prompt(text);
        let mut attempt = 0;
        loop {
            let completion = self
                .llm
                .generate(&self.model_name, &prompt, EXTRACTION_SYSTEM_PROMPT)?;

            match parse_extraction_response(&completion.text) {
                Ok(mut extraction) => {
                    extraction.raw_input = text.to_string();
                    return Ok(extraction);
                }
                Err(e) if is_parse_error(&e) && attempt < MAX_LLM_RETRIES => {
                    attempt += 1;
                    tracing::warn!(
                        model = %self.model_name,
                        attempt,
                        error = %e,
                        "LLM extraction reply unparseable, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Mock LLM client for testing: replays scripted replies in order and
/// repeats the last one once the script runs out.
pub struct MockLlmClient {
    replies: Vec<Result<String, ExtractionError>>,
    usage: Option<TokenUsage>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self::scripted(vec![Ok(response.to_string())])
    }

    pub fn failing(message: &str) -> Self {
        Self::scripted(vec![Err(ExtractionError::Client(message.to_string()))])
    }

    pub fn scripted(replies: Vec<Result<String, ExtractionError>>) -> Self {
        Self {
            replies,
            usage: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<Completion, ExtractionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .get(call)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(Err(ExtractionError::EmptyResponse))?;
        Ok(Completion {
            text: reply,
            usage: self.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalState;
    use std::sync::Arc;

    /// Lets a test keep a handle on the mock after boxing it.
    struct Shared(Arc<MockLlmClient>);

    impl LlmClient for Shared {
        fn generate(
            &self,
            model: &str,
            prompt: &str,
            system: &str,
        ) -> Result<Completion, ExtractionError> {
            self.0.generate(model, prompt, system)
        }
    }

    fn extractor(mock: &Arc<MockLlmClient>) -> LlmExtractor {
        LlmExtractor::new(Box::new(Shared(Arc::clone(mock))), "gpt-4o-mini")
    }

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("hello");
        let reply = client.generate("m", "p", "s").unwrap();
        assert_eq!(reply.text, "hello");
        assert_eq!(reply.usage, None);
    }

    #[test]
    fn extracts_and_keeps_raw_input() {
        let mock = Arc::new(MockLlmClient::new(
            r#"{"chief_complaint": "bleeding", "risk_signals": {"bleeding_uncontrolled": "yes"}}"#,
        ));
        let e = extractor(&mock).extract("blood everywhere").unwrap();
        assert_eq!(e.raw_input, "blood everywhere");
        assert_eq!(e.risk_signals.bleeding_uncontrolled, SignalState::Yes);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn retries_unparseable_reply_then_succeeds() {
        let mock = Arc::new(MockLlmClient::scripted(vec![
            Ok("not json at all".into()),
            Ok(r#"{"chief_complaint": "cough"}"#.into()),
        ]));
        let e = extractor(&mock).extract("cough").unwrap();
        assert_eq!(e.chief_complaint, "cough");
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn gives_up_after_max_retries() {
        let mock = Arc::new(MockLlmClient::new("still not json"));
        let err = extractor(&mock).extract("cough").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
        assert_eq!(mock.call_count(), 1 + MAX_LLM_RETRIES);
    }

    #[test]
    fn client_error_is_not_retried() {
        let mock = Arc::new(MockLlmClient::failing("connection refused"));
        let err = extractor(&mock).extract("cough").unwrap_err();
        assert_eq!(err, ExtractionError::Client("connection refused".into()));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn invalid_extraction_is_not_retried() {
        let mock = Arc::new(MockLlmClient::new(r#"{"pain_scale": 42}"#));
        let err = extractor(&mock).extract("pain").unwrap_err();
        assert!(matches!(err, ExtractionError::Invalid(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn reports_model_name() {
        let mock = Arc::new(MockLlmClient::new("{}"));
        assert_eq!(extractor(&mock).model_name(), "gpt-4o-mini");
    }
}

use serde_json::Value;

use super::ExtractionError;
use crate::models::Extraction;

/// Parse an LLM extraction reply into a validated `Extraction`.
///
/// Accepts a JSON object inside a ```` ```json ```` fence or bare, with prose
/// before or after it. Missing or `null` fields take their defaults, so an
/// under-filled reply degrades to unknown signals rather than failing.
pub fn parse_extraction_response(response: &str) -> Result<Extraction, ExtractionError> {
    if response.trim().is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    let json_str = extract_json_object(response)?;
    let mut value = first_json_value(json_str)?;
    if !value.is_object() {
        return Err(ExtractionError::MalformedResponse(
            "Top-level JSON value is not an object".into(),
        ));
    }
    strip_nulls(&mut value);

    let extraction: Extraction = serde_json::from_value(value)
        .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;
    extraction.validate()?;
    Ok(extraction)
}

/// Locate the JSON object in the reply.
fn extract_json_object(response: &str) -> Result<&str, ExtractionError> {
    if let Some(fence) = response.find("```json") {
        let start = fence + "```json".len();
        let len = response[start..]
            .find("```")
            .ok_or_else(|| ExtractionError::MalformedResponse("Unclosed JSON block".into()))?;
        return Ok(response[start..start + len].trim());
    }

    // Unfenced: the object starts at the first brace; anything after it ends
    // is left to `first_json_value`.
    response
        .find('{')
        .map(|open| &response[open..])
        .ok_or_else(|| ExtractionError::MalformedResponse("No JSON object found".into()))
}

/// Read the first JSON value and ignore whatever prose follows it.
fn first_json_value(json_str: &str) -> Result<Value, ExtractionError> {
    serde_json::Deserializer::from_str(json_str)
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| ExtractionError::MalformedResponse("Empty JSON block".into()))?
        .map_err(|e| ExtractionError::JsonParsing(e.to_string()))
}

/// Drop `null` members from objects, recursively, so serde defaults apply.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MentalStatus, ModelError, SignalState};

    const FULL_REPLY: &str = r#"{
        "chief_complaint": "crushing chest pain",
        "symptoms": ["chest pain", "sweating"],
        "pain_scale": 9,
        "mental_status": "alert",
        "vitals": {"heart_rate": 118, "bp_systolic": 95},
        "risk_signals": {
            "chest_pain": "yes",
            "chest_pain_conviction": 0.95,
            "can_breathe": "yes",
            "can_breathe_conviction": 0.8
        }
    }"#;

    #[test]
    fn parses_bare_object() {
        let e = parse_extraction_response(FULL_REPLY).unwrap();
        assert_eq!(e.chief_complaint, "crushing chest pain");
        assert_eq!(e.pain_scale, Some(9));
        assert_eq!(e.vitals.heart_rate, Some(118));
        assert_eq!(e.vitals.blood_pressure_systolic, Some(95));
        assert_eq!(e.risk_signals.chest_pain, SignalState::Yes);
        assert_eq!(e.risk_signals.neuro_deficit, SignalState::Unknown);
    }

    #[test]
    fn parses_fenced_block_with_prose() {
        let reply = format!("Here is the extraction:\n```json\n{FULL_REPLY}\n```\nLet me know.");
        let e = parse_extraction_response(&reply).unwrap();
        assert_eq!(e.symptoms, vec!["chest pain", "sweating"]);
    }

    #[test]
    fn parses_unfenced_object_inside_prose() {
        let reply = r#"Sure! {"chief_complaint": "rash", "symptoms": ["rash"]} Hope that helps."#;
        let e = parse_extraction_response(reply).unwrap();
        assert_eq!(e.chief_complaint, "rash");
    }

    #[test]
    fn parses_leading_object_with_trailing_prose() {
        let reply = "{\"chief_complaint\": \"rash\"}\nLet me know if you need more.";
        let e = parse_extraction_response(reply).unwrap();
        assert_eq!(e.chief_complaint, "rash");
    }

    #[test]
    fn trailing_prose_with_braces_is_ignored() {
        let reply = r#"{"symptoms": ["cough"]} (format: {"key": value})"#;
        let e = parse_extraction_response(reply).unwrap();
        assert_eq!(e.symptoms, vec!["cough"]);
    }

    #[test]
    fn empty_fence_is_malformed() {
        let err = parse_extraction_response("```json\n\n```").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
    }

    #[test]
    fn nulls_take_defaults() {
        let reply = r#"{"chief_complaint": null, "pain_scale": null, "mental_status": null,
                        "vitals": {"heart_rate": null}, "risk_signals": null}"#;
        let e = parse_extraction_response(reply).unwrap();
        assert_eq!(e.chief_complaint, "");
        assert_eq!(e.pain_scale, None);
        assert_eq!(e.mental_status, MentalStatus::Alert);
        assert_eq!(e.risk_signals.can_breathe, SignalState::Unknown);
    }

    #[test]
    fn empty_reply_is_an_error() {
        assert_eq!(
            parse_extraction_response("   \n"),
            Err(ExtractionError::EmptyResponse)
        );
    }

    #[test]
    fn unclosed_fence_is_malformed() {
        let err = parse_extraction_response("```json\n{\"symptoms\": []}").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
    }

    #[test]
    fn prose_only_is_malformed() {
        let err = parse_extraction_response("I could not extract anything.").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse(_)));
    }

    #[test]
    fn broken_json_is_a_parse_error() {
        let err = parse_extraction_response("{\"symptoms\": [\"cough\",}").unwrap_err();
        assert!(matches!(err, ExtractionError::JsonParsing(_)));
    }

    #[test]
    fn unknown_enum_value_is_a_parse_error() {
        let err = parse_extraction_response(r#"{"mental_status": "drowsy"}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::JsonParsing(_)));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let err = parse_extraction_response(r#"{"pain_scale": 14}"#).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Invalid(ModelError::OutOfRange { field: "pain_scale", .. })
        ));

        let err = parse_extraction_response(
            r#"{"risk_signals": {"suicidal_ideation_conviction": 1.5}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::Invalid(_)));
    }
}

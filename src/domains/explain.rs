use serde_json::Value;

use crate::models::Domain;

/// Human-readable sentence for one audit event.
///
/// `payload` is the already-redacted event payload. Unknown steps, and every
/// step of a domain without rules, fall back to a generic line.
pub fn explain_event(domain: Domain, step: &str, payload: &Value) -> String {
    if domain != Domain::Medical {
        return generic(step);
    }
    match step {
        "STT" => format!(
            "Transcribed your audio using {}.",
            model_or(payload, "speech-to-text model")
        ),
        "EXTRACT" => explain_extract(payload),
        "TRIAGE" => explain_triage(payload),
        "GENERATE" => format!(
            "Generated follow-up question using {}.",
            model_or(payload, "language model")
        ),
        "TTS" => format!(
            "Converted response to speech using {}.",
            model_or(payload, "text-to-speech model")
        ),
        _ => generic(step),
    }
}

fn generic(step: &str) -> String {
    format!("Processing step: {step}")
}

fn model_or<'a>(payload: &'a Value, fallback: &'a str) -> &'a str {
    payload
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
}

fn explain_extract(payload: &Value) -> String {
    let model = model_or(payload, "language model");
    let symptoms: Vec<&str> = payload
        .get("symptoms")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if symptoms.is_empty() {
        return format!("Extracted key medical details using {model}.");
    }
    let mut listed = symptoms.iter().take(3).copied().collect::<Vec<_>>().join(", ");
    if symptoms.len() > 3 {
        listed.push_str(&format!(" and {} more", symptoms.len() - 3));
    }
    format!("Extracted key details using {model}: {listed}.")
}

fn explain_triage(payload: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(acuity) = payload.get("acuity").and_then(Value::as_u64).filter(|a| *a > 0) {
        parts.push(format!("Assessed urgency level: ESI-{acuity}"));
    }

    let flag_names: Vec<String> = payload
        .get("red_flags")
        .and_then(Value::as_array)
        .map(|flags| flags.iter().map(flag_name).collect())
        .unwrap_or_default();
    if !flag_names.is_empty() {
        parts.push(format!(
            "Safety check found concerns: {}",
            flag_names.join(", ")
        ));
    }

    let escalate = payload
        .get("escalate")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    parts.push(if escalate {
        "Decision: Escalate to human professional immediately.".to_string()
    } else {
        "Decision: Continue assessment.".to_string()
    });

    parts.join(" ")
}

/// Flags arrive either as full objects or as bare names.
fn flag_name(flag: &Value) -> String {
    match flag {
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

//! Redaction of audit payloads before they are stored.
//!
//! Sensitive keys are replaced by a short SHA-256 digest so equal values stay
//! correlatable; identifiers embedded in free text are blanked outright.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

const DIGEST_HEX_CHARS: usize = 12;
const REDACTED_TEXT: &str = "[REDACTED]";

static SENSITIVE_KEYS: &[&str] = &[
    "ssn",
    "social_security",
    "phone",
    "email",
    "address",
    "name",
    "patient_name",
    "date_of_birth",
    "dob",
];

static SENSITIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // SSN
        Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap(),
        // Phone numbers
        Regex::new(r"\b\d{10,11}\b").unwrap(),
        // Email
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap(),
    ]
});

/// `REDACTED:` followed by the first 12 hex chars of the SHA-256 of `value`.
pub fn redact_value(value: &str) -> String {
    let hash = format!("{:x}", Sha256::digest(value.as_bytes()));
    format!("REDACTED:{}", &hash[..DIGEST_HEX_CHARS])
}

/// Blank SSNs, phone numbers and email addresses inside free text.
pub fn redact_text(text: &str) -> String {
    SENSITIVE_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, pattern| {
            pattern.replace_all(&acc, REDACTED_TEXT).into_owned()
        })
}

/// Recursively redact a JSON value.
pub fn redact_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(redact_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(redact_json).collect()),
        Value::String(s) => Value::String(redact_text(s)),
        other => other.clone(),
    }
}

fn redact_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let redacted = if is_sensitive_key(key) {
                hash_sensitive(value)
            } else {
                redact_json(value)
            };
            (key.clone(), redacted)
        })
        .collect()
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEYS.contains(&key.as_str())
}

/// Empty values carry nothing worth hashing and become `null`.
fn hash_sensitive(value: &Value) -> Value {
    let is_empty = match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    };
    if is_empty {
        return Value::Null;
    }
    let plain = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Value::String(redact_value(&plain))
}

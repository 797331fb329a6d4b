use crate::domains::{parse_active_domains, DomainRegistry};
use crate::models::Domain;

pub const APP_NAME: &str = "incident-triage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Comma-separated domain keys, e.g. "medical" or "medical,sre".
pub const ACTIVE_DOMAINS_ENV: &str = "TRIAGE_ACTIVE_DOMAINS";
/// Model name handed to LLM-backed extractors and follow-up generators.
pub const TEXT_MODEL_ENV: &str = "TRIAGE_TEXT_MODEL";

pub const DEFAULT_ACTIVE_DOMAINS: &str = "medical";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> &'static str {
    "info,incident_triage=debug"
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub active_domains: Vec<Domain>,
    pub text_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active_domains: parse_active_domains(DEFAULT_ACTIVE_DOMAINS),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup. Unset or blank values
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let active_domains = non_blank(ACTIVE_DOMAINS_ENV)
            .map(|raw| parse_active_domains(&raw))
            .unwrap_or_else(|| parse_active_domains(DEFAULT_ACTIVE_DOMAINS));
        let text_model = non_blank(TEXT_MODEL_ENV)
            .map(|m| m.trim().to_string())
            .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string());

        tracing::debug!(
            active = active_domains.len(),
            text_model = %text_model,
            "Settings loaded"
        );

        Self {
            active_domains,
            text_model,
        }
    }

    pub fn registry(&self) -> DomainRegistry {
        DomainRegistry::new(self.active_domains.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_name_and_version() {
        assert_eq!(APP_NAME, "incident-triage");
        assert!(!APP_VERSION.is_empty());
    }

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.active_domains, vec![Domain::Medical]);
        assert_eq!(settings.text_model, "gpt-4o-mini");
    }

    #[test]
    fn reads_active_domains() {
        let settings = Settings::from_lookup(lookup(&[(ACTIVE_DOMAINS_ENV, " Medical , SRE ")]));
        assert_eq!(settings.active_domains, vec![Domain::Medical, Domain::Sre]);
        assert!(settings.registry().is_active(Domain::Sre));
    }

    #[test]
    fn blank_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[
            (ACTIVE_DOMAINS_ENV, "  "),
            (TEXT_MODEL_ENV, ""),
        ]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unknown_domains_only_yields_empty_registry() {
        let settings = Settings::from_lookup(lookup(&[(ACTIVE_DOMAINS_ENV, "astrology")]));
        assert!(settings.active_domains.is_empty());
        assert!(settings.registry().get("medical", false).is_err());
    }

    #[test]
    fn text_model_override() {
        let settings = Settings::from_lookup(lookup(&[(TEXT_MODEL_ENV, " gpt-4o ")]));
        assert_eq!(settings.text_model, "gpt-4o");
    }

    #[test]
    fn log_filter_targets_this_crate() {
        assert!(default_log_filter().contains("incident_triage"));
    }
}

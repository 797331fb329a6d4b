use std::str::FromStr;

use crate::models::Domain;

use super::DomainError;

/// Parse a comma-separated domain list. Keys are trimmed and lowercased;
/// unknown keys and duplicates are dropped, first-seen order is kept.
pub fn parse_active_domains(raw: &str) -> Vec<Domain> {
    let mut active = Vec::new();
    for key in raw.split(',').map(|k| k.trim().to_lowercase()) {
        if key.is_empty() {
            continue;
        }
        match Domain::from_str(&key) {
            Ok(domain) if !active.contains(&domain) => active.push(domain),
            Ok(_) => {}
            Err(_) => tracing::warn!(key = %key, "Ignoring unknown domain key"),
        }
    }
    active
}

/// Every known domain plus the set switched on for this process.
///
/// Built once at startup and shared read-only; there is no registration
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRegistry {
    active: Vec<Domain>,
}

impl DomainRegistry {
    pub fn new(active: impl IntoIterator<Item = Domain>) -> Self {
        let mut deduped = Vec::new();
        for domain in active {
            if !deduped.contains(&domain) {
                deduped.push(domain);
            }
        }
        tracing::info!(
            active = ?deduped.iter().map(Domain::as_str).collect::<Vec<_>>(),
            "Domain registry initialized"
        );
        Self { active: deduped }
    }

    /// Resolve a domain key. Inactive domains are refused unless
    /// `allow_inactive` is set.
    pub fn get(&self, key: &str, allow_inactive: bool) -> Result<Domain, DomainError> {
        let domain = Domain::from_str(key).map_err(|_| DomainError::NotFound(key.to_string()))?;
        if !allow_inactive && !self.is_active(domain) {
            return Err(DomainError::Inactive(domain));
        }
        Ok(domain)
    }

    /// Registered domains in registration order.
    pub fn list(&self, include_inactive: bool) -> Vec<Domain> {
        Domain::ALL
            .into_iter()
            .filter(|d| include_inactive || self.is_active(*d))
            .collect()
    }

    pub fn is_registered(&self, key: &str) -> bool {
        Domain::from_str(key).is_ok()
    }

    pub fn is_active(&self, domain: Domain) -> bool {
        self.active.contains(&domain)
    }
}

impl Default for DomainRegistry {
    /// Medical only.
    fn default() -> Self {
        Self::new([Domain::Medical])
    }
}

use serde::{Deserialize, Serialize};

use super::enums::{Disposition, RiskFlagType, Severity, SeverityLabel};

/// A named, explained indicator of a potentially dangerous condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlag {
    pub name: String,
    pub reason: String,
    #[serde(default)]
    pub severity: Severity,
}

impl RedFlag {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            severity: Severity::High,
        }
    }
}

/// A risk signal whose indicator or conviction crossed its danger threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredRiskFlag {
    pub flag_type: RiskFlagType,
    /// Raw signal value as reported ("true"/"false" or "yes"/"no"/"unknown").
    pub signal_value: String,
    pub conviction: f64,
    pub threshold: f64,
    pub human_explanation: String,
}

impl TriggeredRiskFlag {
    /// Critical red flag carrying this trigger, so it counts toward acuity tiers.
    pub fn to_red_flag(&self) -> RedFlag {
        RedFlag {
            name: self.flag_type.as_str().to_string(),
            reason: self.human_explanation.clone(),
            severity: Severity::Critical,
        }
    }
}

/// Final triage decision for one extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// ESI level, 1 (most urgent) to 5.
    pub acuity: u8,
    pub escalate: bool,
    /// Keyword/vital flags followed by triggered risk flags as critical red flags.
    pub red_flags: Vec<RedFlag>,
    pub triggered_risk_flags: Vec<TriggeredRiskFlag>,
    pub escalation_reason: String,
    pub disposition: Disposition,
    pub summary: String,
}

impl Assessment {
    pub fn severity_label(&self) -> SeverityLabel {
        match self.acuity {
            1 => SeverityLabel::Critical,
            2 => SeverityLabel::High,
            3 => SeverityLabel::Medium,
            _ => SeverityLabel::Low,
        }
    }

    pub fn red_flag_names(&self) -> Vec<&str> {
        self.red_flags.iter().map(|f| f.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment_with_acuity(acuity: u8) -> Assessment {
        Assessment {
            acuity,
            escalate: acuity <= 2,
            red_flags: vec![],
            triggered_risk_flags: vec![],
            escalation_reason: String::new(),
            disposition: Disposition::Continue,
            summary: format!("ESI-{acuity}"),
        }
    }

    #[test]
    fn severity_label_follows_acuity() {
        assert_eq!(assessment_with_acuity(1).severity_label(), SeverityLabel::Critical);
        assert_eq!(assessment_with_acuity(2).severity_label(), SeverityLabel::High);
        assert_eq!(assessment_with_acuity(3).severity_label(), SeverityLabel::Medium);
        assert_eq!(assessment_with_acuity(4).severity_label(), SeverityLabel::Low);
        assert_eq!(assessment_with_acuity(5).severity_label(), SeverityLabel::Low);
    }

    #[test]
    fn triggered_flag_converts_to_critical_red_flag() {
        let trf = TriggeredRiskFlag {
            flag_type: RiskFlagType::ChestPain,
            signal_value: "yes".into(),
            conviction: 0.9,
            threshold: 0.5,
            human_explanation: "Patient reports chest pain.".into(),
        };
        let flag = trf.to_red_flag();
        assert_eq!(flag.name, "CHEST_PAIN");
        assert_eq!(flag.severity, Severity::Critical);
        assert_eq!(flag.reason, trf.human_explanation);
    }

    #[test]
    fn red_flag_severity_defaults_to_high_on_the_wire() {
        let flag: RedFlag =
            serde_json::from_str(r#"{"name": "seizure", "reason": "Neurological emergency"}"#)
                .unwrap();
        assert_eq!(flag.severity, Severity::High);
        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["severity"], "high");
    }
}

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form doubles as the serde wire value.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Level of consciousness reported in the extraction.
    MentalStatus {
        Alert => "alert",
        Confused => "confused",
        Unresponsive => "unresponsive",
    }
);

str_enum!(
    /// Tri-state observation for physical risk signals.
    /// `Unknown` means "not observed" and is never treated as the safe answer.
    SignalState {
        Yes => "yes",
        No => "no",
        Unknown => "unknown",
    }
);

str_enum!(
    /// Critical red flags that require immediate escalation.
    RiskFlagType {
        SuicidalIdeation => "SUICIDAL_IDEATION",
        SelfHarm => "SELF_HARM",
        HomicidalIdeation => "HOMICIDAL_IDEATION",
        CannotBreathe => "CANNOT_BREATHE",
        ChestPain => "CHEST_PAIN",
        NeuroDeficit => "NEURO_DEFICIT",
        BleedingUncontrolled => "BLEEDING_UNCONTROLLED",
        AlteredConsciousness => "ALTERED_CONSCIOUSNESS",
        SeverePain => "SEVERE_PAIN",
    }
);

str_enum!(
    Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
);

str_enum!(
    /// Recommended next action for the incident.
    Disposition {
        Continue => "continue",
        Escalate => "escalate",
        Discharge => "discharge",
    }
);

str_enum!(
    /// Coarse label used for filtering and display.
    SeverityLabel {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

str_enum!(
    Domain {
        Medical => "medical",
        Sre => "sre",
        Crypto => "crypto",
    }
);

str_enum!(
    IncidentStatus {
        Open => "open",
        Escalated => "escalated",
        Closed => "closed",
    }
);

str_enum!(
    /// Pipeline step recorded in the audit trail.
    AuditStep {
        Extract => "EXTRACT",
        Triage => "TRIAGE",
        Generate => "GENERATE",
    }
);

impl Default for MentalStatus {
    fn default() -> Self {
        Self::Alert
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::High
    }
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Medical, Domain::Sre, Domain::Crypto];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Medical => "Medical Triage",
            Self::Sre => "SRE Incident",
            Self::Crypto => "Crypto/DeFi",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Medical => {
                "Voice-powered medical triage with symptom extraction and urgency assessment"
            }
            Self::Sre => "Infrastructure and service incident triage",
            Self::Crypto => "DeFi protocol and crypto market incident triage",
        }
    }
}

impl IncidentStatus {
    /// Status after a triage turn. Escalation is sticky: an escalated incident
    /// never returns to open, and a closed incident stays closed.
    pub fn after_assessment(self, escalate: bool) -> IncidentStatus {
        match (self, escalate) {
            (Self::Open, true) => Self::Escalated,
            (status, _) => status,
        }
    }
}

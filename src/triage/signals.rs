//! Conviction-threshold evaluation of structured risk signals.
//!
//! Thresholds are conservative. Psychiatric signals escalate on slight
//! suspicion because a false negative is unacceptable.

use crate::models::{RiskFlagType, RiskSignals, SignalState, TriggeredRiskFlag};

/// Which indicator value counts as danger for a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerWhen {
    /// Boolean signal is `true`.
    Affirmed,
    /// Tri-state signal equals this state.
    State(SignalState),
}

/// One row of the threshold policy.
#[derive(Debug, Clone, Copy)]
pub struct SignalThreshold {
    pub flag_type: RiskFlagType,
    pub threshold: f64,
    pub danger_when: DangerWhen,
    pub explanation: &'static str,
}

/// Threshold policy, in evaluation and emission order.
pub static SIGNAL_THRESHOLDS: [SignalThreshold; 7] = [
    SignalThreshold {
        flag_type: RiskFlagType::SuicidalIdeation,
        threshold: 0.2,
        danger_when: DangerWhen::Affirmed,
        explanation: "Patient may be expressing suicidal thoughts; policy requires immediate escalation.",
    },
    SignalThreshold {
        flag_type: RiskFlagType::SelfHarm,
        threshold: 0.2,
        danger_when: DangerWhen::Affirmed,
        explanation: "Patient may be expressing intent to self-harm; policy requires immediate escalation.",
    },
    SignalThreshold {
        flag_type: RiskFlagType::HomicidalIdeation,
        threshold: 0.4,
        danger_when: DangerWhen::Affirmed,
        explanation: "Patient may be expressing intent to harm others; policy requires immediate escalation.",
    },
    SignalThreshold {
        flag_type: RiskFlagType::CannotBreathe,
        threshold: 0.5,
        danger_when: DangerWhen::State(SignalState::No),
        explanation: "Patient reports difficulty breathing; this is a potential emergency.",
    },
    SignalThreshold {
        flag_type: RiskFlagType::ChestPain,
        threshold: 0.5,
        danger_when: DangerWhen::State(SignalState::Yes),
        explanation: "Patient reports chest pain; cardiac emergency must be ruled out.",
    },
    SignalThreshold {
        flag_type: RiskFlagType::NeuroDeficit,
        threshold: 0.5,
        danger_when: DangerWhen::State(SignalState::Yes),
        explanation: "Patient shows signs of neurological deficit; possible stroke or emergency.",
    },
    SignalThreshold {
        flag_type: RiskFlagType::BleedingUncontrolled,
        threshold: 0.5,
        danger_when: DangerWhen::State(SignalState::Yes),
        explanation: "Patient reports uncontrolled bleeding; hemorrhage risk.",
    },
];

/// Raw value of a single signal as carried by the extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalValue {
    Flag(bool),
    State(SignalState),
}

impl SignalValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flag(true) => "true",
            Self::Flag(false) => "false",
            Self::State(state) => state.as_str(),
        }
    }

    fn matches(&self, danger_when: DangerWhen) -> bool {
        match (self, danger_when) {
            (Self::Flag(value), DangerWhen::Affirmed) => *value,
            (Self::State(state), DangerWhen::State(danger)) => *state == danger,
            _ => false,
        }
    }
}

/// Indicator value and conviction of the signal behind `flag_type`.
/// Returns `None` for flag types with no backing signal.
pub fn read_signal(signals: &RiskSignals, flag_type: RiskFlagType) -> Option<(SignalValue, f64)> {
    let reading = match flag_type {
        RiskFlagType::SuicidalIdeation => (
            SignalValue::Flag(signals.suicidal_ideation),
            signals.suicidal_ideation_conviction,
        ),
        RiskFlagType::SelfHarm => (
            SignalValue::Flag(signals.self_harm_intent),
            signals.self_harm_intent_conviction,
        ),
        RiskFlagType::HomicidalIdeation => (
            SignalValue::Flag(signals.homicidal_ideation),
            signals.homicidal_ideation_conviction,
        ),
        RiskFlagType::CannotBreathe => (
            SignalValue::State(signals.can_breathe),
            signals.can_breathe_conviction,
        ),
        RiskFlagType::ChestPain => (
            SignalValue::State(signals.chest_pain),
            signals.chest_pain_conviction,
        ),
        RiskFlagType::NeuroDeficit => (
            SignalValue::State(signals.neuro_deficit),
            signals.neuro_deficit_conviction,
        ),
        RiskFlagType::BleedingUncontrolled => (
            SignalValue::State(signals.bleeding_uncontrolled),
            signals.bleeding_uncontrolled_conviction,
        ),
        RiskFlagType::AlteredConsciousness | RiskFlagType::SeverePain => return None,
    };
    Some(reading)
}

/// Evaluate every signal against its threshold. A signal triggers when its
/// indicator shows danger OR its conviction is at or above the threshold.
pub fn evaluate_risk_signals(signals: &RiskSignals) -> Vec<TriggeredRiskFlag> {
    SIGNAL_THRESHOLDS
        .iter()
        .filter_map(|rule| {
            let (value, conviction) = read_signal(signals, rule.flag_type)?;
            let triggered = value.matches(rule.danger_when) || conviction >= rule.threshold;
            triggered.then(|| TriggeredRiskFlag {
                flag_type: rule.flag_type,
                signal_value: value.as_str().to_string(),
                conviction,
                threshold: rule.threshold,
                human_explanation: rule.explanation.to_string(),
            })
        })
        .collect()
}

/// Threshold configured for a flag type, if it has one.
pub fn threshold_for(flag_type: RiskFlagType) -> Option<f64> {
    SIGNAL_THRESHOLDS
        .iter()
        .find(|rule| rule.flag_type == flag_type)
        .map(|rule| rule.threshold)
}

use crate::models::{Assessment, Disposition, Extraction, RedFlag, TriggeredRiskFlag};

use super::acuity::{compute_acuity, ESI_EMERGENT, ESI_LESS_URGENT};
use super::keywords::detect_red_flags;
use super::signals::evaluate_risk_signals;

/// Run deterministic triage on one extraction.
///
/// Two independent escalation layers feed one decision: keyword/vital red
/// flags through the acuity tiers, and risk-signal convictions. Either layer
/// alone is enough to escalate, and a triggered risk signal never leaves the
/// case less urgent than ESI-2. Pure and total for any validated extraction.
pub fn assess(extraction: &Extraction) -> Assessment {
    let mut red_flags = detect_red_flags(extraction);
    let keyword_flag_count = red_flags.len();

    let triggered = evaluate_risk_signals(&extraction.risk_signals);
    red_flags.extend(triggered.iter().map(TriggeredRiskFlag::to_red_flag));

    let mut acuity = compute_acuity(extraction, &red_flags);

    let escalate_by_acuity = acuity <= ESI_EMERGENT;
    let escalate_by_risk = !triggered.is_empty();
    let escalate = escalate_by_acuity || escalate_by_risk;

    if escalate_by_risk && acuity > ESI_EMERGENT {
        tracing::warn!(
            scored_acuity = acuity,
            triggered = triggered.len(),
            "Risk signals raised acuity to ESI-2"
        );
        acuity = ESI_EMERGENT;
    }

    let disposition = decide_disposition(escalate, acuity, &red_flags);
    let escalation_reason = triggered
        .iter()
        .map(|t| t.human_explanation.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let summary = build_summary(acuity, &red_flags, escalate);

    tracing::info!(
        acuity,
        escalate,
        keyword_flags = keyword_flag_count,
        risk_flags = triggered.len(),
        disposition = disposition.as_str(),
        "Triage assessment complete"
    );

    Assessment {
        acuity,
        escalate,
        red_flags,
        triggered_risk_flags: triggered,
        escalation_reason,
        disposition,
        summary,
    }
}

fn decide_disposition(escalate: bool, acuity: u8, red_flags: &[RedFlag]) -> Disposition {
    if escalate {
        Disposition::Escalate
    } else if acuity >= ESI_LESS_URGENT && red_flags.is_empty() {
        Disposition::Discharge
    } else {
        Disposition::Continue
    }
}

/// "ESI-n | red flags: a, b | ESCALATE"
fn build_summary(acuity: u8, red_flags: &[RedFlag], escalate: bool) -> String {
    let mut parts = vec![format!("ESI-{acuity}")];
    if !red_flags.is_empty() {
        let names = red_flags
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("red flags: {names}"));
    }
    if escalate {
        parts.push("ESCALATE".to_string());
    }
    parts.join(" | ")
}

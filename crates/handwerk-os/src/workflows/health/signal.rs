use super::{HealthReason, Severity, TrafficLight};

/// Worst severity wins; no reasons means green.
pub fn overall_status(reasons: &[HealthReason]) -> TrafficLight {
    if reasons.iter().any(|reason| reason.severity == Severity::Red) {
        TrafficLight::Red
    } else if reasons.iter().any(|reason| reason.severity == Severity::Yellow) {
        TrafficLight::Yellow
    } else {
        TrafficLight::Green
    }
}

/// Red before yellow; rule order is kept within a severity.
pub(crate) fn sort_by_severity(reasons: &mut [HealthReason]) {
    reasons.sort_by_key(|reason| match reason.severity {
        Severity::Red => 0u8,
        Severity::Yellow => 1,
    });
}

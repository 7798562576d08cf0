//! Traffic-light health for a single project.
//!
//! The evaluator runs every reason rule against a snapshot, orders the
//! reasons red-first, derives the overall signal, picks one next action and
//! summarises the economics. The result is never stored; callers recompute it
//! from fresh snapshots whenever they need it.

mod actions;
pub mod calendar;
mod config;
pub mod domain;
mod economy;
mod rules;
mod signal;

#[cfg(test)]
mod tests;

pub use actions::{NextAction, NextActionKey};
pub use config::HealthThresholds;
pub use domain::{
    InvalidInputError, MaterialEntry, ProjectAggregates, ProjectStatus, ProjectWithTargets,
    TimeEntry,
};
pub use economy::{calculate_economy, EconomySummary, MarginTier};
pub use signal::overall_status;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Three-valued summary of project risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

impl TrafficLight {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "All good",
            Self::Yellow => "Needs attention",
            Self::Red => "Critical",
        }
    }
}

/// Weight of a single health reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Yellow,
    Red,
}

impl From<Severity> for TrafficLight {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Yellow => TrafficLight::Yellow,
            Severity::Red => TrafficLight::Red,
        }
    }
}

/// Stable identifiers for the health rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthReasonCode {
    MissingTargets,
    NoTimeEntries,
    NoProjectManager,
    TimeOverPlanned,
    CostOverTarget,
    DeadlineRisk,
    MissingInvoice,
}

impl HealthReasonCode {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::MissingTargets,
            Self::NoTimeEntries,
            Self::NoProjectManager,
            Self::TimeOverPlanned,
            Self::CostOverTarget,
            Self::DeadlineRisk,
            Self::MissingInvoice,
        ]
    }

    /// Lower is more urgent.
    pub const fn priority(self) -> u8 {
        match self {
            Self::MissingTargets => 0,
            Self::NoTimeEntries => 1,
            Self::NoProjectManager => 2,
            Self::TimeOverPlanned => 3,
            Self::CostOverTarget => 4,
            Self::DeadlineRisk => 5,
            Self::MissingInvoice => 6,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::MissingTargets => "Targets missing",
            Self::NoTimeEntries => "No time entries",
            Self::NoProjectManager => "No project manager",
            Self::TimeOverPlanned => "Hours over plan",
            Self::CostOverTarget => "Costs over target",
            Self::DeadlineRisk => "Deadline risk",
            Self::MissingInvoice => "Invoice missing",
        }
    }
}

/// One condition contributing to a non-green signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReason {
    pub code: HealthReasonCode,
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl HealthReason {
    pub fn new(code: HealthReasonCode, severity: Severity, detail: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            title: code.title().to_string(),
            detail: detail.into(),
        }
    }
}

/// Computed health of one project at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHealth {
    pub status: TrafficLight,
    pub reasons: Vec<HealthReason>,
    pub next_action: Option<NextAction>,
    pub economy: EconomySummary,
    #[serde(rename = "computedAtISO")]
    pub computed_at_iso: DateTime<Utc>,
}

impl ProjectHealth {
    /// The most severe reasons, as shown in compact views.
    pub fn top_reasons(&self, limit: usize) -> &[HealthReason] {
        &self.reasons[..limit.min(self.reasons.len())]
    }

    /// Equality ignoring the computation timestamp.
    pub fn same_assessment(&self, other: &ProjectHealth) -> bool {
        self.status == other.status
            && self.reasons == other.reasons
            && self.next_action == other.next_action
            && self.economy == other.economy
    }
}

/// Stateless evaluator applying the configured thresholds to a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProjectHealthEvaluator {
    thresholds: HealthThresholds,
}

impl ProjectHealthEvaluator {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Evaluate against today's local date.
    pub fn evaluate(
        &self,
        project: &ProjectWithTargets,
        aggregates: &ProjectAggregates,
    ) -> ProjectHealth {
        self.evaluate_on(project, aggregates, Local::now().date_naive())
    }

    pub fn evaluate_on(
        &self,
        project: &ProjectWithTargets,
        aggregates: &ProjectAggregates,
        today: NaiveDate,
    ) -> ProjectHealth {
        let project = project.sanitized();
        let aggregates = aggregates.sanitized(&project.id);

        let input = rules::RuleInput {
            project: &project,
            aggregates: &aggregates,
            thresholds: &self.thresholds,
            today,
        };
        let mut reasons = rules::collect_reasons(&input);
        signal::sort_by_severity(&mut reasons);

        let status = overall_status(&reasons);
        let next_action = actions::select_next_action(&project.id, &reasons);
        let economy = calculate_economy(project.target_revenue, aggregates.actual_costs);

        debug!(
            project_id = %project.id,
            ?status,
            reasons = reasons.len(),
            next_action = ?next_action.as_ref().map(|action| action.key),
            "project health evaluated"
        );

        ProjectHealth {
            status,
            reasons,
            next_action,
            economy,
            computed_at_iso: Utc::now(),
        }
    }
}

/// Evaluate with the default thresholds against today's date.
pub fn evaluate_project_health(
    project: &ProjectWithTargets,
    aggregates: &ProjectAggregates,
) -> ProjectHealth {
    ProjectHealthEvaluator::default().evaluate(project, aggregates)
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::calendar::{entry_hours, round_to};

/// Lifecycle state of a project as stored by the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    New,
    Active,
    OnHold,
    Completed,
    Cancelled,
    Other(String),
}

impl ProjectStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" | "draft" | "planned" | "geplant" | "neu" => Self::New,
            "active" | "in_progress" | "in_bearbeitung" | "aktiv" => Self::Active,
            "on_hold" | "paused" | "pausiert" => Self::OnHold,
            "completed" | "finished" | "done" | "abgeschlossen" => Self::Completed,
            "cancelled" | "canceled" | "storniert" => Self::Cancelled,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    /// Work is expected to be booked once a project leaves the planning state.
    pub fn has_started(&self) -> bool {
        !matches!(self, Self::New | Self::Cancelled)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Planning attributes of one project, read from the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithTargets {
    pub id: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub planned_hours: Option<f64>,
    #[serde(default)]
    pub target_revenue: Option<f64>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub project_manager_id: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl ProjectWithTargets {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        check_optional("planned_hours", self.planned_hours)?;
        check_optional("target_revenue", self.target_revenue)?;
        check_optional("budget", self.budget)
    }

    pub(crate) fn sanitized(&self) -> Self {
        Self {
            planned_hours: clamp_optional(&self.id, "planned_hours", self.planned_hours),
            target_revenue: clamp_optional(&self.id, "target_revenue", self.target_revenue),
            budget: clamp_optional(&self.id, "budget", self.budget),
            ..self.clone()
        }
    }
}

/// Actuals aggregated from time entries, material entries and invoices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAggregates {
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default)]
    pub actual_costs: f64,
    #[serde(default)]
    pub has_invoice: bool,
}

impl ProjectAggregates {
    /// Sums closed time entries (minus breaks) and material costs.
    pub fn from_entries(
        time_entries: &[TimeEntry],
        material_entries: &[MaterialEntry],
        has_invoice: bool,
    ) -> Self {
        let hours: f64 = time_entries
            .iter()
            .filter_map(|entry| {
                entry
                    .end_time
                    .map(|end| entry_hours(entry.start_time, end, entry.break_minutes))
            })
            .sum();

        let costs: f64 = material_entries
            .iter()
            .filter_map(|entry| entry.total_cost)
            .filter(|cost| cost.is_finite())
            .sum();

        Self {
            actual_hours: round_to(hours, 1),
            actual_costs: round_to(costs, 2),
            has_invoice,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidInputError> {
        check_value("actual_hours", self.actual_hours)?;
        check_value("actual_costs", self.actual_costs)
    }

    pub(crate) fn sanitized(&self, project_id: &str) -> Self {
        Self {
            actual_hours: clamp_value(project_id, "actual_hours", self.actual_hours),
            actual_costs: clamp_value(project_id, "actual_costs", self.actual_costs),
            has_invoice: self.has_invoice,
        }
    }
}

/// A booked working period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub break_minutes: Option<u32>,
}

/// A material booking with its total cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    #[serde(default)]
    pub total_cost: Option<f64>,
}

/// Raised by strict callers that refuse structurally invalid snapshots.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

pub(crate) fn check_value(field: &'static str, value: f64) -> Result<(), InvalidInputError> {
    if !value.is_finite() {
        return Err(InvalidInputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInputError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn check_optional(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), InvalidInputError> {
    value.map_or(Ok(()), |value| check_value(field, value))
}

fn clamp_value(project_id: &str, field: &'static str, value: f64) -> f64 {
    if !value.is_finite() {
        warn!(project_id, field, "non-finite aggregate replaced with 0");
        return 0.0;
    }
    if value < 0.0 {
        warn!(project_id, field, value, "negative aggregate clamped to 0");
        return 0.0;
    }
    value
}

fn clamp_optional(project_id: &str, field: &'static str, value: Option<f64>) -> Option<f64> {
    match value {
        Some(value) if !value.is_finite() => {
            warn!(project_id, field, "non-finite target treated as unset");
            None
        }
        Some(value) if value < 0.0 => {
            warn!(project_id, field, value, "negative target clamped to 0");
            Some(0.0)
        }
        other => other,
    }
}

use chrono::{Duration, NaiveDate};

use crate::workflows::health::domain::{ProjectAggregates, ProjectStatus, ProjectWithTargets};
use crate::workflows::health::{HealthThresholds, ProjectHealthEvaluator};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid date")
}

/// An active project with every target set and nothing wrong with it.
pub(super) fn healthy_project() -> ProjectWithTargets {
    ProjectWithTargets {
        id: "proj-001".to_string(),
        status: ProjectStatus::Active,
        planned_hours: Some(40.0),
        target_revenue: Some(10_000.0),
        end_date: Some(today() + Duration::days(30)),
        project_manager_id: Some("emp-017".to_string()),
        budget: Some(8_000.0),
    }
}

pub(super) fn healthy_aggregates() -> ProjectAggregates {
    ProjectAggregates {
        actual_hours: 20.0,
        actual_costs: 3_000.0,
        has_invoice: false,
    }
}

pub(super) fn evaluator() -> ProjectHealthEvaluator {
    ProjectHealthEvaluator::new(HealthThresholds::default())
}

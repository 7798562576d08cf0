use chrono::NaiveDate;
use tracing::debug;

use super::calendar::{days_until, round_half_up, round_to, working_days_between};
use super::config::HealthThresholds;
use super::domain::{ProjectAggregates, ProjectStatus, ProjectWithTargets};
use super::{HealthReason, HealthReasonCode, Severity};

pub(crate) struct RuleInput<'a> {
    pub project: &'a ProjectWithTargets,
    pub aggregates: &'a ProjectAggregates,
    pub thresholds: &'a HealthThresholds,
    pub today: NaiveDate,
}

const RATIO_DECIMALS: u32 = 9;

pub(super) type HealthRule = fn(&RuleInput<'_>) -> Option<HealthReason>;

/// Rules in evaluation (and priority) order.
pub(super) const HEALTH_RULES: [(HealthReasonCode, HealthRule); 7] = [
    (HealthReasonCode::MissingTargets, missing_targets),
    (HealthReasonCode::NoTimeEntries, no_time_entries),
    (HealthReasonCode::NoProjectManager, no_project_manager),
    (HealthReasonCode::TimeOverPlanned, time_over_planned),
    (HealthReasonCode::CostOverTarget, cost_over_target),
    (HealthReasonCode::DeadlineRisk, deadline_risk),
    (HealthReasonCode::MissingInvoice, missing_invoice),
];

pub(crate) fn collect_reasons(input: &RuleInput<'_>) -> Vec<HealthReason> {
    HEALTH_RULES
        .iter()
        .filter_map(|(code, rule)| {
            let reason = rule(input)?;
            debug!(
                project_id = %input.project.id,
                ?code,
                severity = ?reason.severity,
                "health rule fired"
            );
            Some(reason)
        })
        .collect()
}

fn missing_targets(input: &RuleInput<'_>) -> Option<HealthReason> {
    let project = input.project;
    if project.planned_hours.is_some() || project.target_revenue.is_some() {
        return None;
    }

    Some(HealthReason::new(
        HealthReasonCode::MissingTargets,
        Severity::Yellow,
        "Neither planned hours nor a target revenue are set.",
    ))
}

fn no_time_entries(input: &RuleInput<'_>) -> Option<HealthReason> {
    if !input.project.status.has_started() || input.aggregates.actual_hours > 0.0 {
        return None;
    }

    Some(HealthReason::new(
        HealthReasonCode::NoTimeEntries,
        Severity::Yellow,
        "No working hours have been booked on this project yet.",
    ))
}

fn no_project_manager(input: &RuleInput<'_>) -> Option<HealthReason> {
    let assigned = input
        .project
        .project_manager_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    if assigned {
        return None;
    }

    Some(HealthReason::new(
        HealthReasonCode::NoProjectManager,
        Severity::Yellow,
        "Assign a responsible project manager.",
    ))
}

fn time_over_planned(input: &RuleInput<'_>) -> Option<HealthReason> {
    let planned = input.project.planned_hours?;
    let actual = input.aggregates.actual_hours;
    if actual <= planned {
        return None;
    }

    if planned <= 0.0 {
        return Some(HealthReason::new(
            HealthReasonCode::TimeOverPlanned,
            Severity::Red,
            format!("{actual:.1}h booked with no hours planned"),
        ));
    }

    // Compared at fixed precision so an exact 20% overrun stays at 20%.
    let overrun = round_to((actual - planned) / planned, RATIO_DECIMALS);
    let red_above = round_to(input.thresholds.time_red_overrun_pct, RATIO_DECIMALS);
    let severity = if overrun > red_above {
        Severity::Red
    } else {
        Severity::Yellow
    };

    Some(HealthReason::new(
        HealthReasonCode::TimeOverPlanned,
        severity,
        format!(
            "{actual:.1}h booked of {planned}h planned ({}% over plan)",
            round_half_up(overrun * 100.0)
        ),
    ))
}

fn cost_over_target(input: &RuleInput<'_>) -> Option<HealthReason> {
    let target = input.project.target_revenue?;
    let costs = input.aggregates.actual_costs;
    if costs <= target {
        return None;
    }

    let detail = if target > 0.0 {
        format!(
            "{costs:.2} costs against {target:.2} target revenue ({}% over target)",
            round_half_up((costs - target) * 100.0 / target)
        )
    } else {
        format!("{costs:.2} costs against a target revenue of 0")
    };

    Some(HealthReason::new(
        HealthReasonCode::CostOverTarget,
        Severity::Red,
        detail,
    ))
}

fn deadline_risk(input: &RuleInput<'_>) -> Option<HealthReason> {
    let end = input.project.end_date?;
    if input.project.status.is_closed() {
        return None;
    }

    let days_left = days_until(end, input.today);
    if days_left < 0 {
        return Some(HealthReason::new(
            HealthReasonCode::DeadlineRisk,
            Severity::Red,
            format!("The planned end on {end} passed {} ago.", days(-days_left)),
        ));
    }

    if days_left > input.thresholds.deadline_window_days {
        return None;
    }

    let working_days = working_days_between(input.today, end);
    Some(HealthReason::new(
        HealthReasonCode::DeadlineRisk,
        Severity::Yellow,
        format!(
            "{} ({working_days} working) until the planned end on {end}.",
            days(days_left)
        ),
    ))
}

fn missing_invoice(input: &RuleInput<'_>) -> Option<HealthReason> {
    if input.project.status != ProjectStatus::Completed || input.aggregates.has_invoice {
        return None;
    }

    Some(HealthReason::new(
        HealthReasonCode::MissingInvoice,
        Severity::Red,
        "The project is completed but no invoice is linked.",
    ))
}

fn days(count: i64) -> String {
    if count == 1 {
        "1 day".to_string()
    } else {
        format!("{count} days")
    }
}

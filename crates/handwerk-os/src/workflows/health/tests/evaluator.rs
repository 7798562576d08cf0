use super::common::*;
use crate::workflows::health::domain::{ProjectAggregates, ProjectStatus};
use crate::workflows::health::{
    HealthReasonCode, HealthThresholds, MarginTier, ProjectHealthEvaluator, Severity,
    TrafficLight,
};
use chrono::Duration;

#[test]
fn healthy_project_is_green_with_nothing_to_do() {
    let health = evaluator().evaluate_on(&healthy_project(), &healthy_aggregates(), today());

    assert_eq!(health.status, TrafficLight::Green);
    assert!(health.reasons.is_empty());
    assert!(health.next_action.is_none());
    assert_eq!(health.economy.gross_profit, Some(7_000.0));
    assert_eq!(health.economy.gross_margin_pct, Some(70));
}

#[test]
fn red_reasons_are_listed_before_yellow_ones() {
    let mut project = healthy_project();
    project.project_manager_id = None;
    project.status = ProjectStatus::Completed;
    project.end_date = Some(today() - Duration::days(10));
    let mut aggregates = healthy_aggregates();
    aggregates.actual_costs = 12_000.0;

    let health = evaluator().evaluate_on(&project, &aggregates, today());

    let ordered: Vec<(HealthReasonCode, Severity)> = health
        .reasons
        .iter()
        .map(|reason| (reason.code, reason.severity))
        .collect();
    assert_eq!(
        ordered,
        vec![
            (HealthReasonCode::CostOverTarget, Severity::Red),
            (HealthReasonCode::MissingInvoice, Severity::Red),
            (HealthReasonCode::NoProjectManager, Severity::Yellow),
        ]
    );
    assert_eq!(health.status, TrafficLight::Red);
    assert_eq!(health.top_reasons(2).len(), 2);
    assert!(health
        .top_reasons(2)
        .iter()
        .all(|reason| reason.severity == Severity::Red));
    assert_eq!(health.economy.margin_tier(), MarginTier::Negative);
}

#[test]
fn yellow_only_reasons_give_yellow_status() {
    let mut project = healthy_project();
    project.project_manager_id = None;

    let health = evaluator().evaluate_on(&project, &healthy_aggregates(), today());

    assert_eq!(health.status, TrafficLight::Yellow);
    assert_eq!(health.reasons.len(), 1);
    assert!(health.next_action.is_some());
}

#[test]
fn repeated_evaluations_agree_apart_from_timestamp() {
    let mut project = healthy_project();
    project.planned_hours = Some(10.0);
    let aggregates = healthy_aggregates();
    let evaluator = evaluator();

    let first = evaluator.evaluate_on(&project, &aggregates, today());
    let second = evaluator.evaluate_on(&project, &aggregates, today());

    assert!(first.same_assessment(&second));
    assert_eq!(first.status, TrafficLight::Red);
}

#[test]
fn negative_and_non_finite_inputs_are_clamped() {
    let mut project = healthy_project();
    project.target_revenue = Some(f64::NAN);
    project.planned_hours = Some(-5.0);
    let aggregates = ProjectAggregates {
        actual_hours: -3.0,
        actual_costs: f64::INFINITY,
        has_invoice: false,
    };

    let health = evaluator().evaluate_on(&project, &aggregates, today());

    assert_eq!(health.economy.actual_costs, 0.0);
    assert_eq!(health.economy.target_revenue, None);
    assert_eq!(health.economy.gross_margin_pct, None);
    assert!(health
        .reasons
        .iter()
        .any(|reason| reason.code == HealthReasonCode::NoTimeEntries));
    assert!(project.validate().is_err());
    assert!(aggregates.validate().is_err());
}

#[test]
fn custom_thresholds_widen_the_deadline_window() {
    let mut project = healthy_project();
    project.end_date = Some(today() + Duration::days(12));
    let evaluator = ProjectHealthEvaluator::new(HealthThresholds {
        time_red_overrun_pct: 0.20,
        deadline_window_days: 14,
    });

    let health = evaluator.evaluate_on(&project, &healthy_aggregates(), today());

    assert_eq!(health.status, TrafficLight::Yellow);
    assert_eq!(health.reasons[0].code, HealthReasonCode::DeadlineRisk);
}

#[test]
fn serialises_in_the_cockpit_shape() {
    let mut project = healthy_project();
    project.planned_hours = None;
    project.target_revenue = None;

    let health = evaluator().evaluate_on(&project, &healthy_aggregates(), today());
    let json = serde_json::to_value(&health).expect("health serialises");

    assert_eq!(json["status"], "yellow");
    assert_eq!(json["reasons"][0]["code"], "MISSING_TARGETS");
    assert_eq!(json["nextAction"]["key"], "SET_TARGETS");
    assert_eq!(json["nextAction"]["ctaRoute"], "/projects/proj-001/edit");
    assert!(json["economy"]["grossProfit"].is_null());
    assert!(json["computedAtISO"].is_string());
}

use crate::infra::InMemoryProjectStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use handwerk_os::config::AppConfig;
use handwerk_os::error::AppError;
use handwerk_os::workflows::billing::{WorkflowEngine, WorkflowStats};
use handwerk_os::workflows::cockpit::router::{HealthRequest, WorkflowRequest};
use handwerk_os::workflows::cockpit::{ProjectCockpitService, WorkflowOutcome};
use handwerk_os::workflows::health::{ProjectHealth, ProjectHealthEvaluator, TrafficLight};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct HealthArgs {
    /// JSON file holding `{ "project": ..., "aggregates": ... }`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Overrides the file, defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct WorkflowArgs {
    /// JSON file holding `{ "project": ..., "settings": ..., "previous_workflow": ... }`
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the sample portfolio (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn run_health_report(args: HealthArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let request: HealthRequest = read_json(&args.input)?;
    request.project.validate()?;
    request.aggregates.validate()?;

    let today = args
        .today
        .or(request.today)
        .unwrap_or_else(|| Local::now().date_naive());
    let health = ProjectHealthEvaluator::new(config.health).evaluate_on(
        &request.project,
        &request.aggregates,
        today,
    );

    println!("{}", serde_json::to_string_pretty(&health)?);
    Ok(())
}

pub(crate) fn run_workflow_report(args: WorkflowArgs) -> Result<(), AppError> {
    let request: WorkflowRequest = read_json(&args.input)?;
    request.project.validate()?;
    let settings = request.settings.unwrap_or_default();
    settings.validate()?;
    let engine = WorkflowEngine::new(settings);

    let decision = engine.decide(&request.project);
    let switch = engine.switch_notice(&request.project.id, request.previous_workflow, &decision);
    let outcome = WorkflowOutcome { decision, switch };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let config = AppConfig::load()?;
    let store = Arc::new(InMemoryProjectStore::demo(today));
    let service = ProjectCockpitService::new(store.clone(), store.clone(), config.health);

    println!("HandwerkOS project cockpit demo ({today})");
    println!(
        "Thresholds: red above {:.0}% hour overrun | deadline window {} days",
        config.health.time_red_overrun_pct * 100.0,
        config.health.deadline_window_days
    );

    println!("\nProject health");
    for project_id in store.project_ids() {
        let health = service.health(&project_id, Some(today))?;
        render_health(&project_id, &health);
    }

    for company_id in store.company_ids() {
        println!("\nBilling workflow for {company_id}");
        let mut decisions = Vec::new();
        for project in store.workflow_project_ids(&company_id) {
            let outcome = service.workflow(&company_id, &project, None)?;
            render_workflow(&project, &outcome);
            decisions.push(outcome.decision);
        }

        let stats: WorkflowStats = decisions.iter().collect();
        println!(
            "  Summary: {} projects | {} direct invoice | {} delivery note first | {} manual overrides",
            stats.total_projects,
            stats.direct_invoices,
            stats.delivery_note_first,
            stats.manual_override
        );
    }

    Ok(())
}

fn signal_marker(status: TrafficLight) -> &'static str {
    match status {
        TrafficLight::Green => "[green] ",
        TrafficLight::Yellow => "[yellow]",
        TrafficLight::Red => "[red]   ",
    }
}

fn render_health(project_id: &str, health: &ProjectHealth) {
    println!(
        "- {} {} ({})",
        signal_marker(health.status),
        project_id,
        health.status.label()
    );
    for reason in &health.reasons {
        println!("    {:?} {}: {}", reason.severity, reason.title, reason.detail);
    }
    match &health.next_action {
        Some(action) => println!("    Next: {} -> {}", action.cta_label, action.cta_route),
        None => println!("    Next: nothing to do"),
    }

    let economy = &health.economy;
    match (economy.gross_profit, economy.gross_margin_pct) {
        (Some(profit), Some(margin)) => println!(
            "    Economy: {profit:.2} gross profit | {margin}% margin ({})",
            economy.margin_tier().color()
        ),
        (Some(profit), None) => println!("    Economy: {profit:.2} gross profit"),
        _ => println!("    Economy: no target revenue set"),
    }
}

fn render_workflow(project_id: &str, outcome: &WorkflowOutcome) {
    let decision = &outcome.decision;
    let origin = if decision.auto_determined {
        "automatic"
    } else {
        "manual"
    };
    println!(
        "- {}: {} ({})",
        project_id,
        decision.workflow.label(),
        origin
    );
    for reason in &decision.reason {
        println!("    {reason}");
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::service::{ProjectCockpitService, WorkflowOutcome};
use super::sources::{ProjectSnapshotSource, WorkflowSource};
use crate::error::AppError;
use crate::workflows::billing::{
    ProjectWithWorkflow, WorkflowSettings, WorkflowStats, WorkflowType,
};
use crate::workflows::health::{ProjectAggregates, ProjectHealth, ProjectWithTargets};

/// Body of an ad-hoc health evaluation.
#[derive(Debug, Deserialize)]
pub struct HealthRequest {
    pub project: ProjectWithTargets,
    #[serde(default)]
    pub aggregates: ProjectAggregates,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Body of an ad-hoc billing decision.
#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    pub project: ProjectWithWorkflow,
    #[serde(default)]
    pub settings: Option<WorkflowSettings>,
    #[serde(default)]
    pub previous_workflow: Option<WorkflowType>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkflowQuery {
    #[serde(default)]
    pub previous: Option<WorkflowType>,
}

/// Router builder exposing the cockpit endpoints.
pub fn cockpit_router<P, W>(service: Arc<ProjectCockpitService<P, W>>) -> Router
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    Router::new()
        .route("/api/v1/projects/health", post(assess_handler::<P, W>))
        .route(
            "/api/v1/projects/:project_id/health",
            get(health_handler::<P, W>),
        )
        .route("/api/v1/projects/workflow", post(decide_handler::<P, W>))
        .route(
            "/api/v1/companies/:company_id/projects/:project_id/workflow",
            get(workflow_handler::<P, W>),
        )
        .route(
            "/api/v1/companies/:company_id/workflow/stats",
            get(stats_handler::<P, W>),
        )
        .with_state(service)
}

pub(crate) async fn assess_handler<P, W>(
    State(service): State<Arc<ProjectCockpitService<P, W>>>,
    Json(request): Json<HealthRequest>,
) -> Result<Json<ProjectHealth>, AppError>
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    let health = service.assess(&request.project, &request.aggregates, request.today)?;
    Ok(Json(health))
}

pub(crate) async fn health_handler<P, W>(
    State(service): State<Arc<ProjectCockpitService<P, W>>>,
    Path(project_id): Path<String>,
    Query(query): Query<HealthQuery>,
) -> Result<Json<ProjectHealth>, AppError>
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    Ok(Json(service.health(&project_id, query.today)?))
}

pub(crate) async fn decide_handler<P, W>(
    State(service): State<Arc<ProjectCockpitService<P, W>>>,
    Json(request): Json<WorkflowRequest>,
) -> Result<Json<WorkflowOutcome>, AppError>
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    let outcome = service.decide(
        &request.project,
        request.settings,
        request.previous_workflow,
    )?;
    Ok(Json(outcome))
}

pub(crate) async fn workflow_handler<P, W>(
    State(service): State<Arc<ProjectCockpitService<P, W>>>,
    Path((company_id, project_id)): Path<(String, String)>,
    Query(query): Query<WorkflowQuery>,
) -> Result<Json<WorkflowOutcome>, AppError>
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    Ok(Json(service.workflow(
        &company_id,
        &project_id,
        query.previous,
    )?))
}

pub(crate) async fn stats_handler<P, W>(
    State(service): State<Arc<ProjectCockpitService<P, W>>>,
    Path(company_id): Path<String>,
) -> Result<Json<WorkflowStats>, AppError>
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    Ok(Json(service.workflow_stats(&company_id)?))
}

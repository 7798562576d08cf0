use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::sources::{ProjectSnapshotSource, SourceError, WorkflowSource};
use crate::workflows::billing::{
    ProjectWithWorkflow, WorkflowDecision, WorkflowEngine, WorkflowSettings, WorkflowStats,
    WorkflowSwitch, WorkflowType,
};
use crate::workflows::health::{
    HealthThresholds, InvalidInputError, ProjectAggregates, ProjectHealth,
    ProjectHealthEvaluator, ProjectWithTargets,
};

/// Billing decision together with an optional switch notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub decision: WorkflowDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch: Option<WorkflowSwitch>,
}

/// Service composing the snapshot sources with both decision engines.
///
/// It only reads: nothing it computes is written back.
pub struct ProjectCockpitService<P, W> {
    projects: Arc<P>,
    workflows: Arc<W>,
    evaluator: ProjectHealthEvaluator,
}

impl<P, W> ProjectCockpitService<P, W>
where
    P: ProjectSnapshotSource + 'static,
    W: WorkflowSource + 'static,
{
    pub fn new(projects: Arc<P>, workflows: Arc<W>, thresholds: HealthThresholds) -> Self {
        Self {
            projects,
            workflows,
            evaluator: ProjectHealthEvaluator::new(thresholds),
        }
    }

    /// Health of a stored project, recomputed from fresh snapshots.
    pub fn health(
        &self,
        project_id: &str,
        today: Option<NaiveDate>,
    ) -> Result<ProjectHealth, CockpitError> {
        let project = self
            .projects
            .project(project_id)?
            .ok_or_else(|| CockpitError::NotFound(project_id.to_string()))?;
        let aggregates = self.projects.aggregates(project_id)?;

        Ok(self.evaluate(&project, &aggregates, today))
    }

    /// Health of a caller-supplied snapshot; structurally invalid input is refused.
    pub fn assess(
        &self,
        project: &ProjectWithTargets,
        aggregates: &ProjectAggregates,
        today: Option<NaiveDate>,
    ) -> Result<ProjectHealth, CockpitError> {
        project.validate()?;
        aggregates.validate()?;
        Ok(self.evaluate(project, aggregates, today))
    }

    /// Billing decision for a stored project under its company's settings.
    pub fn workflow(
        &self,
        company_id: &str,
        project_id: &str,
        previous: Option<WorkflowType>,
    ) -> Result<WorkflowOutcome, CockpitError> {
        let project = self
            .workflows
            .workflow_project(company_id, project_id)?
            .ok_or_else(|| CockpitError::NotFound(project_id.to_string()))?;
        let engine = self.engine_for(company_id)?;

        Ok(outcome(&engine, &project, previous))
    }

    /// Billing decision for a caller-supplied project and settings; negative
    /// or non-finite figures are refused.
    pub fn decide(
        &self,
        project: &ProjectWithWorkflow,
        settings: Option<WorkflowSettings>,
        previous: Option<WorkflowType>,
    ) -> Result<WorkflowOutcome, CockpitError> {
        project.validate()?;
        let settings = settings.unwrap_or_default();
        settings.validate()?;

        let engine = WorkflowEngine::new(settings);
        Ok(outcome(&engine, project, previous))
    }

    pub fn workflow_stats(&self, company_id: &str) -> Result<WorkflowStats, CockpitError> {
        let engine = self.engine_for(company_id)?;
        let projects = self.workflows.workflow_projects(company_id)?;

        let decisions: Vec<WorkflowDecision> =
            projects.iter().map(|project| engine.decide(project)).collect();
        Ok(decisions.iter().collect())
    }

    fn evaluate(
        &self,
        project: &ProjectWithTargets,
        aggregates: &ProjectAggregates,
        today: Option<NaiveDate>,
    ) -> ProjectHealth {
        match today {
            Some(today) => self.evaluator.evaluate_on(project, aggregates, today),
            None => self.evaluator.evaluate(project, aggregates),
        }
    }

    fn engine_for(&self, company_id: &str) -> Result<WorkflowEngine, CockpitError> {
        let settings = match self.workflows.company_settings(company_id)? {
            Some(settings) => settings,
            None => {
                info!(company_id, "no workflow settings stored, using defaults");
                WorkflowSettings::default()
            }
        };
        Ok(WorkflowEngine::new(settings))
    }
}

fn outcome(
    engine: &WorkflowEngine,
    project: &ProjectWithWorkflow,
    previous: Option<WorkflowType>,
) -> WorkflowOutcome {
    let decision = engine.decide(project);
    let switch = engine.switch_notice(&project.id, previous, &decision);
    if let Some(notice) = &switch {
        info!(
            project_id = %notice.project_id,
            from = ?notice.from,
            to = ?notice.to,
            "billing workflow switched automatically"
        );
    }
    WorkflowOutcome { decision, switch }
}

/// Error raised by the cockpit service.
#[derive(Debug, thiserror::Error)]
pub enum CockpitError {
    #[error("project {0} not found")]
    NotFound(String),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

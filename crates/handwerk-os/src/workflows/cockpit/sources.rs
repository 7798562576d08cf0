use crate::workflows::billing::{ProjectWithWorkflow, WorkflowSettings};
use crate::workflows::health::{ProjectAggregates, ProjectWithTargets};

/// Supplies project planning snapshots and their aggregated actuals.
pub trait ProjectSnapshotSource: Send + Sync {
    fn project(&self, project_id: &str) -> Result<Option<ProjectWithTargets>, SourceError>;
    fn aggregates(&self, project_id: &str) -> Result<ProjectAggregates, SourceError>;
}

/// Supplies company billing settings and the projects they apply to.
pub trait WorkflowSource: Send + Sync {
    fn company_settings(&self, company_id: &str) -> Result<Option<WorkflowSettings>, SourceError>;
    fn workflow_project(
        &self,
        company_id: &str,
        project_id: &str,
    ) -> Result<Option<ProjectWithWorkflow>, SourceError>;
    fn workflow_projects(&self, company_id: &str)
        -> Result<Vec<ProjectWithWorkflow>, SourceError>;
}

/// Failure reported by a snapshot source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
}

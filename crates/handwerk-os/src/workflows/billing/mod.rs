//! Billing path selection: direct invoice or delivery note first.
//!
//! A project's stored override always wins. Otherwise every threshold rule
//! is checked and any match forces the delivery-note path; all matches are
//! reported for auditing.

pub mod domain;
mod rules;
mod stats;

#[cfg(test)]
mod tests;

pub use domain::{
    CustomerType, ProjectSize, ProjectWithWorkflow, ProjectWorkflowConfig, WorkflowProjectStatus,
    WorkflowSettings,
};
pub use stats::WorkflowStats;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    DirectInvoice,
    DeliveryNoteFirst,
}

impl WorkflowType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DirectInvoice => "Direct invoice",
            Self::DeliveryNoteFirst => "Delivery note first",
        }
    }
}

/// Outcome of the billing path selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDecision {
    pub workflow: WorkflowType,
    pub reason: Vec<String>,
    pub auto_determined: bool,
    pub triggered_rules: Vec<String>,
}

/// Notice that an automatic decision moved a project to another path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSwitch {
    pub project_id: String,
    pub from: WorkflowType,
    pub to: WorkflowType,
    pub triggered_rules: Vec<String>,
}

/// Stateless engine holding one company's settings.
#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    settings: WorkflowSettings,
}

impl WorkflowEngine {
    pub fn new(settings: WorkflowSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    pub fn decide(&self, project: &ProjectWithWorkflow) -> WorkflowDecision {
        if let Some(forced) = rules::manual_override(project) {
            let detail = project
                .workflow_config
                .as_ref()
                .and_then(|config| config.override_reason.as_deref())
                .map(str::trim)
                .filter(|reason| !reason.is_empty())
                .unwrap_or(forced.default_reason);

            debug!(project_id = %project.id, rule = forced.code, "manual workflow override");
            return WorkflowDecision {
                workflow: forced.workflow,
                reason: vec![format!("manual override: {detail}")],
                auto_determined: false,
                triggered_rules: vec![forced.code.to_string()],
            };
        }

        let fired = rules::fired_rules(project, &self.settings);
        if fired.is_empty() {
            debug!(project_id = %project.id, "no delivery note threshold exceeded");
            return WorkflowDecision {
                workflow: WorkflowType::DirectInvoice,
                reason: vec!["no threshold exceeded".to_string()],
                auto_determined: true,
                triggered_rules: Vec::new(),
            };
        }

        debug!(
            project_id = %project.id,
            rules = ?fired.iter().map(|rule| rule.code).collect::<Vec<_>>(),
            "delivery note thresholds exceeded"
        );
        let (triggered_rules, reason): (Vec<String>, Vec<String>) = fired
            .into_iter()
            .map(|rule| (rule.code.to_string(), rule.reason))
            .unzip();

        WorkflowDecision {
            workflow: WorkflowType::DeliveryNoteFirst,
            reason,
            auto_determined: true,
            triggered_rules,
        }
    }

    /// Switch notice for an automatic decision that differs from `previous`.
    pub fn switch_notice(
        &self,
        project_id: &str,
        previous: Option<WorkflowType>,
        decision: &WorkflowDecision,
    ) -> Option<WorkflowSwitch> {
        let previous = previous?;
        if !self.settings.notify_on_workflow_auto_switch
            || !decision.auto_determined
            || previous == decision.workflow
        {
            return None;
        }

        Some(WorkflowSwitch {
            project_id: project_id.to_string(),
            from: previous,
            to: decision.workflow,
            triggered_rules: decision.triggered_rules.clone(),
        })
    }
}

pub fn determine_workflow(
    project: &ProjectWithWorkflow,
    settings: &WorkflowSettings,
) -> WorkflowDecision {
    WorkflowEngine::new(settings.clone()).decide(project)
}

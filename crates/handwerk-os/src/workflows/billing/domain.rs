use serde::{Deserialize, Serialize};

use crate::workflows::health::domain::{check_optional, check_value};
use crate::workflows::health::InvalidInputError;

/// Company-wide thresholds for choosing the billing path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    pub min_hours_for_delivery_note: f64,
    pub min_material_value_for_delivery_note: f64,
    pub b2b_always_delivery_note: bool,
    pub b2c_delivery_note_threshold: f64,
    /// Whether users may set new per-project overrides. Overrides already
    /// stored on a project are honoured regardless.
    pub allow_manual_override: bool,
    pub notify_on_workflow_auto_switch: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            min_hours_for_delivery_note: 8.0,
            min_material_value_for_delivery_note: 500.0,
            b2b_always_delivery_note: true,
            b2c_delivery_note_threshold: 1_000.0,
            allow_manual_override: true,
            notify_on_workflow_auto_switch: true,
        }
    }
}

impl WorkflowSettings {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        check_value("min_hours_for_delivery_note", self.min_hours_for_delivery_note)?;
        check_value(
            "min_material_value_for_delivery_note",
            self.min_material_value_for_delivery_note,
        )?;
        check_value("b2c_delivery_note_threshold", self.b2c_delivery_note_threshold)
    }
}

/// Manual size classification of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSize {
    #[default]
    Auto,
    Small,
    Large,
}

/// Per-project override of the automatic decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWorkflowConfig {
    #[serde(default)]
    pub workflow_type: ProjectSize,
    /// `None` leaves the choice to the threshold rules.
    #[serde(default)]
    pub requires_delivery_note: Option<bool>,
    #[serde(default)]
    pub override_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    B2b,
    B2c,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowProjectStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

/// Project snapshot carrying the figures the billing rules look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithWorkflow {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub customer_id: String,
    pub customer_type: CustomerType,
    #[serde(default)]
    pub estimated_budget: Option<f64>,
    #[serde(default)]
    pub workflow_config: Option<ProjectWorkflowConfig>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub total_material_value: Option<f64>,
    #[serde(default)]
    pub status: WorkflowProjectStatus,
}

impl ProjectWithWorkflow {
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        check_optional("estimated_budget", self.estimated_budget)?;
        check_optional("total_hours", self.total_hours)?;
        check_optional("total_material_value", self.total_material_value)
    }
}

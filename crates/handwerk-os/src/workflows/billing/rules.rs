use super::domain::{CustomerType, ProjectSize, ProjectWithWorkflow, WorkflowSettings};
use super::WorkflowType;

/// A threshold rule that fired, with its audit text.
pub(crate) struct FiredRule {
    pub code: &'static str,
    pub reason: String,
}

type ThresholdRule = fn(&ProjectWithWorkflow, &WorkflowSettings) -> Option<String>;

/// Threshold rules in evaluation order.
pub(super) const THRESHOLD_RULES: [(&str, ThresholdRule); 4] = [
    ("hours_threshold", hours_threshold),
    ("material_value_threshold", material_value_threshold),
    ("b2b_auto_delivery_note", b2b_auto_delivery_note),
    ("b2c_threshold", b2c_threshold),
];

pub(crate) fn fired_rules(
    project: &ProjectWithWorkflow,
    settings: &WorkflowSettings,
) -> Vec<FiredRule> {
    THRESHOLD_RULES
        .iter()
        .filter_map(|(code, rule)| {
            rule(project, settings).map(|reason| FiredRule { code: *code, reason })
        })
        .collect()
}

fn hours_threshold(project: &ProjectWithWorkflow, settings: &WorkflowSettings) -> Option<String> {
    let hours = project.total_hours?;
    (hours >= settings.min_hours_for_delivery_note).then(|| {
        format!(
            "{hours}h booked, at least {}h require a delivery note",
            settings.min_hours_for_delivery_note
        )
    })
}

fn material_value_threshold(
    project: &ProjectWithWorkflow,
    settings: &WorkflowSettings,
) -> Option<String> {
    let value = project.total_material_value?;
    (value >= settings.min_material_value_for_delivery_note).then(|| {
        format!(
            "material value {value:.2} reaches the delivery note minimum of {:.2}",
            settings.min_material_value_for_delivery_note
        )
    })
}

fn b2b_auto_delivery_note(
    project: &ProjectWithWorkflow,
    settings: &WorkflowSettings,
) -> Option<String> {
    (project.customer_type == CustomerType::B2b && settings.b2b_always_delivery_note)
        .then(|| "business customer, delivery note always required".to_string())
}

fn b2c_threshold(project: &ProjectWithWorkflow, settings: &WorkflowSettings) -> Option<String> {
    if project.customer_type != CustomerType::B2c {
        return None;
    }
    let budget = project.estimated_budget?;
    (budget >= settings.b2c_delivery_note_threshold).then(|| {
        format!(
            "private customer budget {budget:.2} reaches the threshold of {:.2}",
            settings.b2c_delivery_note_threshold
        )
    })
}

/// A forced decision taken from the project's own configuration.
pub(crate) struct ManualOverride {
    pub workflow: WorkflowType,
    pub code: &'static str,
    pub default_reason: &'static str,
}

pub(crate) fn manual_override(project: &ProjectWithWorkflow) -> Option<ManualOverride> {
    let config = project.workflow_config.as_ref()?;

    match config.workflow_type {
        ProjectSize::Small => {
            return Some(ManualOverride {
                workflow: WorkflowType::DirectInvoice,
                code: "manual_override_small",
                default_reason: "project configured as small",
            })
        }
        ProjectSize::Large => {
            return Some(ManualOverride {
                workflow: WorkflowType::DeliveryNoteFirst,
                code: "manual_override_large",
                default_reason: "project configured as large",
            })
        }
        ProjectSize::Auto => {}
    }

    config.requires_delivery_note.map(|required| {
        if required {
            ManualOverride {
                workflow: WorkflowType::DeliveryNoteFirst,
                code: "manual_delivery_note_required",
                default_reason: "delivery note required for this project",
            }
        } else {
            ManualOverride {
                workflow: WorkflowType::DirectInvoice,
                code: "manual_delivery_note_disabled",
                default_reason: "delivery note disabled for this project",
            }
        }
    })
}

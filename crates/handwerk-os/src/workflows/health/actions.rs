use serde::{Deserialize, Serialize};

use super::{HealthReason, HealthReasonCode};

/// Recommended follow-ups a project view can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextActionKey {
    SetTargets,
    BookFirstTime,
    AssignManager,
    ReviewDeadline,
    CreateInvoice,
    AddMaterial,
}

struct ActionTemplate {
    title: &'static str,
    description: &'static str,
    cta_label: &'static str,
    cta_route: &'static str,
}

impl NextActionKey {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::SetTargets,
            Self::BookFirstTime,
            Self::AssignManager,
            Self::ReviewDeadline,
            Self::CreateInvoice,
            Self::AddMaterial,
        ]
    }

    /// Action resolving the given reason.
    pub const fn for_reason(code: HealthReasonCode) -> Self {
        match code {
            HealthReasonCode::MissingTargets => Self::SetTargets,
            HealthReasonCode::NoTimeEntries => Self::BookFirstTime,
            HealthReasonCode::NoProjectManager => Self::AssignManager,
            HealthReasonCode::TimeOverPlanned => Self::ReviewDeadline,
            HealthReasonCode::CostOverTarget => Self::SetTargets,
            HealthReasonCode::DeadlineRisk => Self::ReviewDeadline,
            HealthReasonCode::MissingInvoice => Self::CreateInvoice,
        }
    }

    const fn template(self) -> ActionTemplate {
        match self {
            Self::SetTargets => ActionTemplate {
                title: "Set targets",
                description: "Define planned hours, target revenue and end date",
                cta_label: "Edit project",
                cta_route: "/projects/{id}/edit",
            },
            Self::BookFirstTime => ActionTemplate {
                title: "Book first hours",
                description: "Record working time for this project",
                cta_label: "Book time",
                cta_route: "/projects/{id}?tab=time",
            },
            Self::AssignManager => ActionTemplate {
                title: "Assign project manager",
                description: "Choose who is responsible for this project",
                cta_label: "Edit team",
                cta_route: "/projects/{id}/edit",
            },
            Self::ReviewDeadline => ActionTemplate {
                title: "Review schedule",
                description: "Check progress against the planned hours and end date",
                cta_label: "Open project",
                cta_route: "/projects/{id}",
            },
            Self::CreateInvoice => ActionTemplate {
                title: "Create invoice",
                description: "The project is finished and ready to be invoiced",
                cta_label: "Create invoice",
                cta_route: "/invoices/new?project={id}",
            },
            Self::AddMaterial => ActionTemplate {
                title: "Record material",
                description: "Add the materials used on this project",
                cta_label: "Add material",
                cta_route: "/projects/{id}?tab=materials",
            },
        }
    }
}

/// The single recommended follow-up for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAction {
    pub key: NextActionKey,
    pub title: String,
    pub description: String,
    pub cta_label: String,
    pub cta_route: String,
}

impl NextAction {
    pub fn for_key(key: NextActionKey, project_id: &str) -> Self {
        let template = key.template();
        Self {
            key,
            title: template.title.to_string(),
            description: template.description.to_string(),
            cta_label: template.cta_label.to_string(),
            cta_route: template.cta_route.replace("{id}", project_id),
        }
    }
}

/// Picks the action for the highest-priority reason, if any.
pub(crate) fn select_next_action(project_id: &str, reasons: &[HealthReason]) -> Option<NextAction> {
    reasons
        .iter()
        .min_by_key(|reason| reason.code.priority())
        .map(|reason| NextAction::for_key(NextActionKey::for_reason(reason.code), project_id))
}

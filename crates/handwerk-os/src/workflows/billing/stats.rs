use serde::{Deserialize, Serialize};

use super::{WorkflowDecision, WorkflowType};

/// Counts over a set of billing decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStats {
    pub total_projects: usize,
    pub direct_invoices: usize,
    pub delivery_note_first: usize,
    pub auto_determined: usize,
    pub manual_override: usize,
}

impl WorkflowStats {
    pub fn record(&mut self, decision: &WorkflowDecision) {
        self.total_projects += 1;
        match decision.workflow {
            WorkflowType::DirectInvoice => self.direct_invoices += 1,
            WorkflowType::DeliveryNoteFirst => self.delivery_note_first += 1,
        }
        if decision.auto_determined {
            self.auto_determined += 1;
        } else {
            self.manual_override += 1;
        }
    }
}

impl<'a> FromIterator<&'a WorkflowDecision> for WorkflowStats {
    fn from_iter<I: IntoIterator<Item = &'a WorkflowDecision>>(iter: I) -> Self {
        let mut stats = Self::default();
        for decision in iter {
            stats.record(decision);
        }
        stats
    }
}

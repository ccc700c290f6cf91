use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store::Entity;

use super::labelled_enum;

labelled_enum! {
    pub enum ServiceType {
        Maintenance => "Maintenance",
        Repair => "Repair",
        Warranty => "Warranty",
        Inspection => "Inspection",
    }
}

labelled_enum! {
    pub enum ServiceStatus {
        Scheduled => "Scheduled",
        InProgress => "In Progress",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

/// A technician visit to an installed project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub project_id: String,
    pub customer_id: String,
    #[serde(rename = "type")]
    pub kind: ServiceType,
    pub status: ServiceStatus,
    pub scheduled_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDate>,
    pub technician: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDraft {
    pub project_id: String,
    pub customer_id: String,
    pub kind: ServiceType,
    pub status: ServiceStatus,
    pub scheduled_date: NaiveDate,
    pub technician: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePatch {
    pub kind: Option<ServiceType>,
    pub status: Option<ServiceStatus>,
    pub scheduled_date: Option<NaiveDate>,
    pub completed_at: Option<NaiveDate>,
    pub technician: Option<String>,
    pub notes: Option<String>,
}

impl Entity for Service {
    type Draft = ServiceDraft;
    type Patch = ServicePatch;
    const KIND: &'static str = "Service";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ServiceDraft, _today: NaiveDate) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            customer_id: draft.customer_id,
            kind: draft.kind,
            status: draft.status,
            scheduled_date: draft.scheduled_date,
            completed_at: None,
            technician: draft.technician,
            notes: draft.notes,
        }
    }

    fn apply(&mut self, patch: ServicePatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            self.scheduled_date = scheduled_date;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = Some(completed_at);
        }
        if let Some(technician) = patch.technician {
            self.technician = technician;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

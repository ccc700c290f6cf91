use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store::Entity;

use super::catalog::Package;
use super::labelled_enum;
use super::payment::Payment;
use super::quotation::Quotation;

labelled_enum! {
    /// Grid connection of an installation. Packages use the same labels.
    pub enum ProjectType {
        OnGrid => "On-Grid",
        OffGrid => "Off-Grid",
    }
}

labelled_enum! {
    pub enum ProjectStatus {
        Pending => "Pending",
        Started => "Started",
        Completed => "Completed",
        Hold => "Hold",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProjectType,
    pub status: ProjectStatus,
    pub location: Location,
    /// Snapshot of the package at the time of sale
    pub package: Package,
    pub quotation: Quotation,
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub created_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub customer_id: String,
    pub name: String,
    pub kind: ProjectType,
    pub status: ProjectStatus,
    pub location: Location,
    pub package: Package,
    pub quotation: Quotation,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub kind: Option<ProjectType>,
    pub status: Option<ProjectStatus>,
    pub location: Option<Location>,
    pub package: Option<Package>,
    pub quotation: Option<Quotation>,
    pub payments: Option<Vec<Payment>>,
    pub completed_at: Option<NaiveDate>,
}

impl Entity for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;
    const KIND: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    /// The embedded quotation is re-pointed at the new project id.
    fn from_draft(id: String, draft: ProjectDraft, today: NaiveDate) -> Self {
        let mut quotation = draft.quotation;
        quotation.project_id = id.clone();

        Self {
            id,
            customer_id: draft.customer_id,
            name: draft.name,
            kind: draft.kind,
            status: draft.status,
            location: draft.location,
            package: draft.package,
            quotation,
            payments: draft.payments,
            created_at: today,
            completed_at: None,
        }
    }

    fn apply(&mut self, patch: ProjectPatch) {
        if let Some(customer_id) = patch.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(package) = patch.package {
            self.package = package;
        }
        if let Some(quotation) = patch.quotation {
            self.quotation = quotation;
        }
        if let Some(payments) = patch.payments {
            self.payments = payments;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = Some(completed_at);
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store::Entity;

use super::labelled_enum;

labelled_enum! {
    pub enum CustomerStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: CustomerStatus,
    pub created_at: NaiveDate,
    /// Ids of the customer's projects. Denormalized and never checked.
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: CustomerStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
    pub projects: Option<Vec<String>>,
}

impl Entity for Customer {
    type Draft = CustomerDraft;
    type Patch = CustomerPatch;
    const KIND: &'static str = "Customer";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: CustomerDraft, today: NaiveDate) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            status: draft.status,
            created_at: today,
            projects: Vec::new(),
        }
    }

    fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(projects) = patch.projects {
            self.projects = projects;
        }
    }
}

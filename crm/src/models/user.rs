use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store::Entity;

use super::labelled_enum;

labelled_enum! {
    pub enum Role {
        SuperAdmin => "SuperAdmin",
        Admin => "Admin",
        Salesmen => "Salesmen",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl Entity for User {
    type Draft = UserDraft;
    type Patch = UserPatch;
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: UserDraft, _today: NaiveDate) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

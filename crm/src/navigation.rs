use serde::Serialize;

use crate::models::Role;

/// Top-level screens of the application, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    Dashboard,
    Customers,
    Projects,
    Quotations,
    Payments,
    Services,
    Admin,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Dashboard,
        Section::Customers,
        Section::Projects,
        Section::Quotations,
        Section::Payments,
        Section::Services,
        Section::Admin,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Admin => "Admin Panel",
            Section::Dashboard => "Dashboard",
            Section::Customers => "Customers",
            Section::Projects => "Projects",
            Section::Quotations => "Quotations",
            Section::Payments => "Payments",
            Section::Services => "Services",
        }
    }

    pub fn visible_to(&self, role: Role) -> bool {
        match self {
            Section::Dashboard | Section::Customers | Section::Projects | Section::Quotations => {
                true
            }
            Section::Payments | Section::Services => matches!(role, Role::SuperAdmin | Role::Admin),
            Section::Admin => role == Role::SuperAdmin,
        }
    }
}

pub fn visible_sections(role: Role) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| section.visible_to(role))
        .collect()
}

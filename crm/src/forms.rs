//! Create/edit forms. A form holds raw field values; `submit` checks the
//! required ones and turns the rest into a store draft.

use std::fmt;

use chrono::{Days, NaiveDate};
use store::IdGenerator;

use crate::models::{
    Coordinates, Customer, CustomerDraft, CustomerPatch, CustomerStatus, Location, Package,
    Project, ProjectDraft, ProjectPatch, ProjectStatus, ProjectType, Quotation, QuotationStatus,
};

/// How long a freshly generated quotation stays valid.
pub const QUOTATION_VALIDITY_DAYS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Blank required fields, in form order
    MissingFields(Vec<&'static str>),
    UnknownPackage(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            FormError::UnknownPackage(id) => write!(f, "unknown package: {}", id),
        }
    }
}

impl std::error::Error for FormError {}

fn require(fields: &[(&'static str, &str)]) -> Result<(), FormError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FormError::MissingFields(missing))
    }
}

// ─── Customer ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: CustomerStatus,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            status: CustomerStatus::Active,
        }
    }
}

impl CustomerForm {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            status: customer.status,
        }
    }

    fn check(&self) -> Result<(), FormError> {
        require(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
        ])
    }

    pub fn submit(self) -> Result<CustomerDraft, FormError> {
        self.check()?;
        Ok(CustomerDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            status: self.status,
        })
    }

    /// Every field is written back, so an edit replaces the whole record
    /// apart from its id, creation date and project list.
    pub fn into_patch(self) -> Result<CustomerPatch, FormError> {
        let draft = self.submit()?;
        Ok(CustomerPatch {
            name: Some(draft.name),
            email: Some(draft.email),
            phone: Some(draft.phone),
            address: Some(draft.address),
            status: Some(draft.status),
            projects: None,
        })
    }
}

// ─── Project ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub customer_id: String,
    pub kind: ProjectType,
    pub status: ProjectStatus,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub package_id: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            customer_id: String::new(),
            kind: ProjectType::OnGrid,
            status: ProjectStatus::Pending,
            address: String::new(),
            lat: 0.0,
            lng: 0.0,
            package_id: String::new(),
        }
    }
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            customer_id: project.customer_id.clone(),
            kind: project.kind,
            status: project.status,
            address: project.location.address.clone(),
            lat: project.location.coordinates.lat,
            lng: project.location.coordinates.lng,
            package_id: project.package.id.clone(),
        }
    }

    fn check(&self) -> Result<(), FormError> {
        require(&[
            ("name", self.name.as_str()),
            ("customer", self.customer_id.as_str()),
            ("address", self.address.as_str()),
            ("package", self.package_id.as_str()),
        ])
    }

    fn resolve_package(&self, packages: &[Package]) -> Result<Package, FormError> {
        let wanted = self.package_id.trim();
        packages
            .iter()
            .find(|p| p.id == wanted)
            .cloned()
            .ok_or_else(|| FormError::UnknownPackage(wanted.to_string()))
    }

    fn location(&self) -> Location {
        Location {
            address: self.address.trim().to_string(),
            coordinates: Coordinates {
                lat: self.lat,
                lng: self.lng,
            },
        }
    }

    /// Builds a draft with a fresh quotation for the chosen package, valid
    /// for [`QUOTATION_VALIDITY_DAYS`]. The store points the quotation at the
    /// project once the project has an id.
    pub fn submit(
        self,
        packages: &[Package],
        ids: &dyn IdGenerator,
        today: NaiveDate,
    ) -> Result<ProjectDraft, FormError> {
        self.check()?;
        let package = self.resolve_package(packages)?;

        let quotation = Quotation {
            id: ids.next_id(),
            project_id: String::new(),
            valid_until: today
                .checked_add_days(Days::new(QUOTATION_VALIDITY_DAYS))
                .unwrap_or(today),
            total_amount: package.total_price,
            status: QuotationStatus::Draft,
            created_at: today,
        };

        Ok(ProjectDraft {
            customer_id: self.customer_id.trim().to_string(),
            name: self.name.trim().to_string(),
            kind: self.kind,
            status: self.status,
            location: self.location(),
            package,
            quotation,
            payments: Vec::new(),
        })
    }

    /// Editing keeps the existing quotation and payments.
    pub fn into_patch(self, packages: &[Package]) -> Result<ProjectPatch, FormError> {
        self.check()?;
        let package = self.resolve_package(packages)?;

        Ok(ProjectPatch {
            customer_id: Some(self.customer_id.trim().to_string()),
            name: Some(self.name.trim().to_string()),
            kind: Some(self.kind),
            status: Some(self.status),
            location: Some(self.location()),
            package: Some(package),
            ..ProjectPatch::default()
        })
    }
}

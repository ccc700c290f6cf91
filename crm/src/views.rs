//! Filtered, joined lists for each screen.
//!
//! The `filter_*` functions are pure: snapshot(s) plus filter in, rows out.
//! [`LiveView`] wires one of them to store subscriptions so the rows are
//! recomputed whenever an input store publishes or the filter changes.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use store::{StoreClosed, Subscription};

use crate::filter::{EnumFilter, matches_search};
use crate::models::{
    Component, ComponentType, Customer, CustomerStatus, Package, Payment, PaymentStage,
    PaymentStatus, Project, ProjectStatus, ProjectType, Quotation, QuotationStatus, Service,
    Role, ServiceStatus, ServiceType, User,
};
use crate::queries::{DashboardStats, dashboard_stats};

const UNKNOWN: &str = "Unknown";
const UNKNOWN_PROJECT: &str = "Unknown Project";
const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

// ─── Filters ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    pub search: String,
    pub status: EnumFilter<CustomerStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub search: String,
    pub status: EnumFilter<ProjectStatus>,
    pub kind: EnumFilter<ProjectType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationFilter {
    pub search: String,
    pub status: EnumFilter<QuotationStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilter {
    pub search: String,
    pub status: EnumFilter<PaymentStatus>,
    pub stage: EnumFilter<PaymentStage>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFilter {
    pub search: String,
    pub status: EnumFilter<ServiceStatus>,
    pub kind: EnumFilter<ServiceType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageFilter {
    pub kind: EnumFilter<ProjectType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentFilter {
    pub kind: EnumFilter<ComponentType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub search: String,
    pub role: EnumFilter<Role>,
}

// ─── Rows ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    #[serde(flatten)]
    pub project: Project,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRow {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub project_name: String,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    #[serde(flatten)]
    pub payment: Payment,
    pub project_name: String,
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRow {
    #[serde(flatten)]
    pub service: Service,
    pub project_name: String,
    pub customer_name: String,
}

// ─── Filter functions ──────────────────────────────────────────────────────

fn names_by_id<'a, I>(records: I) -> HashMap<&'a str, &'a str>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    records.into_iter().collect()
}

fn customer_names(customers: &[Customer]) -> HashMap<&str, &str> {
    names_by_id(customers.iter().map(|c| (c.id.as_str(), c.name.as_str())))
}

/// Search matches the customer name.
pub fn filter_customers(customers: &[Customer], filter: &CustomerFilter) -> Vec<Customer> {
    customers
        .iter()
        .filter(|c| filter.status.matches(&c.status))
        .filter(|c| matches_search(&filter.search, &[&c.name]))
        .cloned()
        .collect()
}

/// Search matches the project name or the owning customer's name.
pub fn filter_projects(
    projects: &[Project],
    customers: &[Customer],
    filter: &ProjectFilter,
) -> Vec<ProjectRow> {
    let names = customer_names(customers);
    projects
        .iter()
        .filter(|p| filter.status.matches(&p.status) && filter.kind.matches(&p.kind))
        .filter_map(|p| {
            let customer = names.get(p.customer_id.as_str()).copied();
            let searchable = [p.name.as_str(), customer.unwrap_or_default()];
            matches_search(&filter.search, &searchable).then(|| ProjectRow {
                project: p.clone(),
                customer_name: customer.unwrap_or(UNKNOWN).to_string(),
            })
        })
        .collect()
}

/// One row per project, built from its embedded quotation.
pub fn filter_quotations(
    projects: &[Project],
    customers: &[Customer],
    filter: &QuotationFilter,
) -> Vec<QuotationRow> {
    let names = customer_names(customers);
    projects
        .iter()
        .map(|p| QuotationRow {
            quotation: p.quotation.clone(),
            project_name: p.name.clone(),
            customer_name: names
                .get(p.customer_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN)
                .to_string(),
        })
        .filter(|row| {
            filter.status.matches(&row.quotation.status)
                && matches_search(&filter.search, &[&row.project_name, &row.customer_name])
        })
        .collect()
}

/// Payments reach their customer through the project.
pub fn filter_payments(
    payments: &[Payment],
    projects: &[Project],
    customers: &[Customer],
    filter: &PaymentFilter,
) -> Vec<PaymentRow> {
    let projects: HashMap<&str, &Project> =
        projects.iter().map(|p| (p.id.as_str(), p)).collect();
    let names = customer_names(customers);

    payments
        .iter()
        .map(|payment| {
            let project = projects.get(payment.project_id.as_str());
            let customer = project.and_then(|p| names.get(p.customer_id.as_str()));
            PaymentRow {
                payment: payment.clone(),
                project_name: project.map_or(UNKNOWN_PROJECT, |p| p.name.as_str()).to_string(),
                customer_name: customer.copied().unwrap_or(UNKNOWN_CUSTOMER).to_string(),
            }
        })
        .filter(|row| {
            filter.status.matches(&row.payment.status)
                && filter.stage.matches(&row.payment.stage)
                && matches_search(&filter.search, &[&row.project_name, &row.customer_name])
        })
        .collect()
}

/// Services carry their own customer id; search also covers the technician.
pub fn filter_services(
    services: &[Service],
    projects: &[Project],
    customers: &[Customer],
    filter: &ServiceFilter,
) -> Vec<ServiceRow> {
    let project_names = names_by_id(projects.iter().map(|p| (p.id.as_str(), p.name.as_str())));
    let names = customer_names(customers);

    services
        .iter()
        .map(|service| ServiceRow {
            service: service.clone(),
            project_name: project_names
                .get(service.project_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN_PROJECT)
                .to_string(),
            customer_name: names
                .get(service.customer_id.as_str())
                .copied()
                .unwrap_or(UNKNOWN_CUSTOMER)
                .to_string(),
        })
        .filter(|row| {
            filter.status.matches(&row.service.status)
                && filter.kind.matches(&row.service.kind)
                && matches_search(
                    &filter.search,
                    &[&row.project_name, &row.customer_name, &row.service.technician],
                )
        })
        .collect()
}

pub fn filter_packages(packages: &[Package], filter: &PackageFilter) -> Vec<Package> {
    packages
        .iter()
        .filter(|p| filter.kind.matches(&p.kind))
        .cloned()
        .collect()
}

pub fn filter_components(components: &[Component], filter: &ComponentFilter) -> Vec<Component> {
    components
        .iter()
        .filter(|c| filter.kind.matches(&c.kind))
        .cloned()
        .collect()
}

/// Search matches the user's name or email.
pub fn filter_users(users: &[User], filter: &UserFilter) -> Vec<User> {
    users
        .iter()
        .filter(|u| filter.role.matches(&u.role))
        .filter(|u| matches_search(&filter.search, &[u.name.as_str(), u.email.as_str()]))
        .cloned()
        .collect()
}

// ─── Live views ────────────────────────────────────────────────────────────

/// A store reported a failure while a view was reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub kind: &'static str,
    pub message: String,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} store: {}", self.kind, self.message)
    }
}

impl std::error::Error for ViewError {}

/// One or more store subscriptions read together.
pub trait Sources {
    type Snapshot;

    /// Latest value of every source. Marks all of them as seen, even when one
    /// of them is in error.
    fn snapshot(&mut self) -> Result<Self::Snapshot, ViewError>;

    /// Resolves when any source publishes.
    async fn changed(&mut self) -> Result<(), StoreClosed>;
}

impl<T: Clone> Sources for Subscription<T> {
    type Snapshot = Vec<T>;

    fn snapshot(&mut self) -> Result<Vec<T>, ViewError> {
        let items = self.items();
        match self.error() {
            Some(message) => Err(ViewError {
                kind: self.kind(),
                message,
            }),
            None => Ok(items),
        }
    }

    async fn changed(&mut self) -> Result<(), StoreClosed> {
        Subscription::changed(self).await
    }
}

impl<A: Sources, B: Sources> Sources for (A, B) {
    type Snapshot = (A::Snapshot, B::Snapshot);

    fn snapshot(&mut self) -> Result<Self::Snapshot, ViewError> {
        let a = self.0.snapshot();
        let b = self.1.snapshot();
        Ok((a?, b?))
    }

    async fn changed(&mut self) -> Result<(), StoreClosed> {
        let (a, b) = self;
        tokio::select! {
            res = a.changed() => res,
            res = b.changed() => res,
        }
    }
}

impl<A: Sources, B: Sources, C: Sources> Sources for (A, B, C) {
    type Snapshot = (A::Snapshot, B::Snapshot, C::Snapshot);

    fn snapshot(&mut self) -> Result<Self::Snapshot, ViewError> {
        let a = self.0.snapshot();
        let b = self.1.snapshot();
        let c = self.2.snapshot();
        Ok((a?, b?, c?))
    }

    async fn changed(&mut self) -> Result<(), StoreClosed> {
        let (a, b, c) = self;
        tokio::select! {
            res = a.changed() => res,
            res = b.changed() => res,
            res = c.changed() => res,
        }
    }
}

/// Rows derived from live stores. Holds no result between calls: every read
/// recomputes from the latest snapshots.
pub struct LiveView<S: Sources, F, R> {
    sources: S,
    filter: F,
    compute: fn(S::Snapshot, &F) -> R,
}

impl<S: Sources, F, R> LiveView<S, F, R> {
    pub fn new(sources: S, filter: F, compute: fn(S::Snapshot, &F) -> R) -> Self {
        Self {
            sources,
            filter,
            compute,
        }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn current(&mut self) -> Result<R, ViewError> {
        let snapshot = self.sources.snapshot()?;
        Ok((self.compute)(snapshot, &self.filter))
    }

    pub fn set_filter(&mut self, filter: F) -> Result<R, ViewError> {
        self.filter = filter;
        self.current()
    }

    pub fn update_filter(&mut self, edit: impl FnOnce(&mut F)) -> Result<R, ViewError> {
        edit(&mut self.filter);
        self.current()
    }

    /// Waits for any input store to publish, then recomputes. `None` once a
    /// store has been dropped.
    pub async fn next(&mut self) -> Option<Result<R, ViewError>> {
        self.sources.changed().await.ok()?;
        Some(self.current())
    }

}

pub type CustomerView = LiveView<Subscription<Customer>, CustomerFilter, Vec<Customer>>;
pub type ProjectView =
    LiveView<(Subscription<Project>, Subscription<Customer>), ProjectFilter, Vec<ProjectRow>>;
pub type QuotationView =
    LiveView<(Subscription<Project>, Subscription<Customer>), QuotationFilter, Vec<QuotationRow>>;
pub type PaymentView = LiveView<
    (Subscription<Payment>, Subscription<Project>, Subscription<Customer>),
    PaymentFilter,
    Vec<PaymentRow>,
>;
pub type ServiceView = LiveView<
    (Subscription<Service>, Subscription<Project>, Subscription<Customer>),
    ServiceFilter,
    Vec<ServiceRow>,
>;
pub type PackageView = LiveView<Subscription<Package>, PackageFilter, Vec<Package>>;
pub type ComponentView = LiveView<Subscription<Component>, ComponentFilter, Vec<Component>>;
pub type UserView = LiveView<Subscription<User>, UserFilter, Vec<User>>;
pub type DashboardView = LiveView<
    (Subscription<Project>, Subscription<Payment>, Subscription<Service>),
    (),
    DashboardStats,
>;

pub fn customer_view(customers: Subscription<Customer>, filter: CustomerFilter) -> CustomerView {
    fn compute(customers: Vec<Customer>, filter: &CustomerFilter) -> Vec<Customer> {
        filter_customers(&customers, filter)
    }
    LiveView::new(customers, filter, compute)
}

pub fn project_view(
    projects: Subscription<Project>,
    customers: Subscription<Customer>,
    filter: ProjectFilter,
) -> ProjectView {
    fn compute(
        (projects, customers): (Vec<Project>, Vec<Customer>),
        filter: &ProjectFilter,
    ) -> Vec<ProjectRow> {
        filter_projects(&projects, &customers, filter)
    }
    LiveView::new((projects, customers), filter, compute)
}

pub fn quotation_view(
    projects: Subscription<Project>,
    customers: Subscription<Customer>,
    filter: QuotationFilter,
) -> QuotationView {
    fn compute(
        (projects, customers): (Vec<Project>, Vec<Customer>),
        filter: &QuotationFilter,
    ) -> Vec<QuotationRow> {
        filter_quotations(&projects, &customers, filter)
    }
    LiveView::new((projects, customers), filter, compute)
}

pub fn payment_view(
    payments: Subscription<Payment>,
    projects: Subscription<Project>,
    customers: Subscription<Customer>,
    filter: PaymentFilter,
) -> PaymentView {
    fn compute(
        (payments, projects, customers): (Vec<Payment>, Vec<Project>, Vec<Customer>),
        filter: &PaymentFilter,
    ) -> Vec<PaymentRow> {
        filter_payments(&payments, &projects, &customers, filter)
    }
    LiveView::new((payments, projects, customers), filter, compute)
}

pub fn service_view(
    services: Subscription<Service>,
    projects: Subscription<Project>,
    customers: Subscription<Customer>,
    filter: ServiceFilter,
) -> ServiceView {
    fn compute(
        (services, projects, customers): (Vec<Service>, Vec<Project>, Vec<Customer>),
        filter: &ServiceFilter,
    ) -> Vec<ServiceRow> {
        filter_services(&services, &projects, &customers, filter)
    }
    LiveView::new((services, projects, customers), filter, compute)
}

pub fn package_view(packages: Subscription<Package>, filter: PackageFilter) -> PackageView {
    fn compute(packages: Vec<Package>, filter: &PackageFilter) -> Vec<Package> {
        filter_packages(&packages, filter)
    }
    LiveView::new(packages, filter, compute)
}

pub fn component_view(
    components: Subscription<Component>,
    filter: ComponentFilter,
) -> ComponentView {
    fn compute(components: Vec<Component>, filter: &ComponentFilter) -> Vec<Component> {
        filter_components(&components, filter)
    }
    LiveView::new(components, filter, compute)
}

pub fn user_view(users: Subscription<User>, filter: UserFilter) -> UserView {
    fn compute(users: Vec<User>, filter: &UserFilter) -> Vec<User> {
        filter_users(&users, filter)
    }
    LiveView::new(users, filter, compute)
}

pub fn dashboard_view(
    projects: Subscription<Project>,
    payments: Subscription<Payment>,
    services: Subscription<Service>,
) -> DashboardView {
    fn compute(
        (projects, payments, services): (Vec<Project>, Vec<Payment>, Vec<Service>),
        _: &(),
    ) -> DashboardStats {
        dashboard_stats(&projects, &payments, &services)
    }
    LiveView::new((projects, payments, services), (), compute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn names<T>(rows: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
        rows.iter().map(|r| name(r).to_string()).collect()
    }

    #[test]
    fn inactive_status_keeps_only_michael() {
        let filter = CustomerFilter {
            status: EnumFilter::Only(CustomerStatus::Inactive),
            ..CustomerFilter::default()
        };
        let rows = filter_customers(&seed::customers(), &filter);
        assert_eq!(names(&rows, |c| c.name.as_str()), ["Michael Brown"]);
    }

    #[test]
    fn search_em_keeps_only_emily() {
        let filter = CustomerFilter {
            search: "em".into(),
            ..CustomerFilter::default()
        };
        let rows = filter_customers(&seed::customers(), &filter);
        assert_eq!(names(&rows, |c| c.name.as_str()), ["Emily Davis"]);
    }

    #[test]
    fn all_filter_is_identity_and_filtering_is_idempotent() {
        let customers = seed::customers();
        let everything = filter_customers(&customers, &CustomerFilter::default());
        assert_eq!(everything, customers);

        let filter = CustomerFilter {
            search: "o".into(),
            status: EnumFilter::Only(CustomerStatus::Active),
        };
        let once = filter_customers(&customers, &filter);
        let twice = filter_customers(&once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn project_search_matches_customer_name() {
        let filter = ProjectFilter {
            search: "emily".into(),
            ..ProjectFilter::default()
        };
        let rows = filter_projects(&seed::projects(), &seed::customers(), &filter);
        assert_eq!(names(&rows, |r| r.project.name.as_str()), ["Davis Home Off-Grid System"]);
        assert_eq!(rows[0].customer_name, "Emily Davis");
    }

    #[test]
    fn quotations_fall_back_to_unknown_customer() {
        let rows = filter_quotations(&seed::projects(), &[], &QuotationFilter::default());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.customer_name == "Unknown"));

        let sent = QuotationFilter {
            status: EnumFilter::Only(QuotationStatus::Sent),
            ..QuotationFilter::default()
        };
        let rows = filter_quotations(&seed::projects(), &seed::customers(), &sent);
        assert_eq!(names(&rows, |r| r.project_name.as_str()), ["Davis Home Off-Grid System"]);
    }

    #[test]
    fn payments_join_customer_through_project() {
        let filter = PaymentFilter {
            stage: EnumFilter::Only(PaymentStage::Completion),
            ..PaymentFilter::default()
        };
        let rows = filter_payments(
            &seed::payments(),
            &seed::projects(),
            &seed::customers(),
            &filter,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].project_name, "Johnson Residence Solar Installation");
        assert_eq!(rows[0].customer_name, "Robert Johnson");

        let orphans = filter_payments(&seed::payments(), &[], &[], &PaymentFilter::default());
        assert!(orphans.iter().all(|r| r.project_name == "Unknown Project"
            && r.customer_name == "Unknown Customer"));
    }

    #[test]
    fn service_search_covers_technician() {
        let filter = ServiceFilter {
            search: "team b".into(),
            ..ServiceFilter::default()
        };
        let rows = filter_services(
            &seed::services(),
            &seed::projects(),
            &seed::customers(),
            &filter,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].service.kind, ServiceType::Inspection);
    }

    #[test]
    fn catalog_filters_by_type() {
        let off_grid = PackageFilter {
            kind: EnumFilter::Only(ProjectType::OffGrid),
        };
        let rows = filter_packages(&seed::packages(), &off_grid);
        assert_eq!(names(&rows, |p| p.name.as_str()), ["Residential Off-Grid 5kW"]);

        let panels = ComponentFilter {
            kind: EnumFilter::Only(ComponentType::Panel),
        };
        assert_eq!(filter_components(&seed::components(), &panels).len(), 1);
    }

    #[test]
    fn users_filter_by_role_and_search_email() {
        let users = seed::users();

        let admins = UserFilter {
            role: EnumFilter::Only(Role::Admin),
            ..UserFilter::default()
        };
        let rows = filter_users(&users, &admins);
        assert_eq!(names(&rows, |u| u.name.as_str()), ["Sarah Manager"]);

        let by_email = UserFilter {
            search: "MIKE@".into(),
            ..UserFilter::default()
        };
        let rows = filter_users(&users, &by_email);
        assert_eq!(names(&rows, |u| u.name.as_str()), ["Mike Sales"]);

        assert_eq!(filter_users(&users, &UserFilter::default()), users);
    }

    #[test]
    fn rows_serialize_flat() {
        let rows = filter_payments(
            &seed::payments(),
            &seed::projects(),
            &seed::customers(),
            &PaymentFilter::default(),
        );
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["stage"], "Booking");
        assert_eq!(json["projectId"], "1");
        assert_eq!(json["customerName"], "Robert Johnson");
    }
}

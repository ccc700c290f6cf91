//! AppContext, the one place stores are constructed.
//!
//! Owns a store per record type, all built from the same [`StoreOptions`],
//! and hands out live views over them.

use std::fmt;

use futures::future::join_all;
use store::{EntityStore, StoreError, StoreOptions};
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::models::{Component, Customer, Package, Payment, Project, Service, User};
use crate::seed;
use crate::views::{
    self, ComponentFilter, ComponentView, CustomerFilter, CustomerView, DashboardView,
    PackageFilter, PackageView, PaymentFilter, PaymentView, ProjectFilter, ProjectView,
    QuotationFilter, QuotationView, ServiceFilter, ServiceView, UserFilter, UserView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Customers,
    Projects,
    Packages,
    Components,
    Payments,
    Services,
    Users,
}

impl StoreKind {
    pub const ALL: [StoreKind; 7] = [
        StoreKind::Customers,
        StoreKind::Projects,
        StoreKind::Packages,
        StoreKind::Components,
        StoreKind::Payments,
        StoreKind::Services,
        StoreKind::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Customers => "customers",
            StoreKind::Projects => "projects",
            StoreKind::Packages => "packages",
            StoreKind::Components => "components",
            StoreKind::Payments => "payments",
            StoreKind::Services => "services",
            StoreKind::Users => "users",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub customers: EntityStore<Customer>,
    pub projects: EntityStore<Project>,
    pub packages: EntityStore<Package>,
    pub components: EntityStore<Component>,
    pub payments: EntityStore<Payment>,
    pub services: EntityStore<Service>,
    pub users: EntityStore<User>,
    options: StoreOptions,
}

impl AppContext {
    /// Stores seeded with the built-in data set. Nothing is loaded yet.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            customers: EntityStore::new(seed::customers(), options.clone()),
            projects: EntityStore::new(seed::projects(), options.clone()),
            packages: EntityStore::new(seed::packages(), options.clone()),
            components: EntityStore::new(seed::components(), options.clone()),
            payments: EntityStore::new(seed::payments(), options.clone()),
            services: EntityStore::new(seed::services(), options.clone()),
            users: EntityStore::new(seed::users(), options.clone()),
            options,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store_options())
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    // ─── Loading ───────────────────────────────────────────────────────

    pub async fn load(&self, kind: StoreKind) -> Result<(), StoreError> {
        match kind {
            StoreKind::Customers => self.customers.load_all().await.map(drop),
            StoreKind::Projects => self.projects.load_all().await.map(drop),
            StoreKind::Packages => self.packages.load_all().await.map(drop),
            StoreKind::Components => self.components.load_all().await.map(drop),
            StoreKind::Payments => self.payments.load_all().await.map(drop),
            StoreKind::Services => self.services.load_all().await.map(drop),
            StoreKind::Users => self.users.load_all().await.map(drop),
        }
    }

    /// Loads `kinds` concurrently and returns the ones that failed.
    async fn load_kinds(&self, kinds: &[StoreKind]) -> Vec<(StoreKind, StoreError)> {
        let results = join_all(kinds.iter().map(|&kind| async move {
            (kind, self.load(kind).await)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(kind, result)| result.err().map(|err| (kind, err)))
            .inspect(|(kind, err)| warn!(store = %kind, error = %err, "Store failed to load"))
            .collect()
    }

    /// Loads every store. All stores are attempted; the first failure (in
    /// [`StoreKind::ALL`] order) is returned.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<(), StoreError> {
        let failures = self.load_kinds(&StoreKind::ALL).await;
        match failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => {
                info!("All stores loaded");
                Ok(())
            }
        }
    }

    /// Loads every store, then reloads the ones that failed up to `retries`
    /// more times.
    #[instrument(skip(self))]
    pub async fn retry_load(&self, retries: u32) -> Result<(), StoreError> {
        let mut failures = self.load_kinds(&StoreKind::ALL).await;

        for attempt in 1..=retries {
            if failures.is_empty() {
                break;
            }
            let pending: Vec<StoreKind> = failures.iter().map(|(kind, _)| *kind).collect();
            info!(attempt, stores = pending.len(), "Retrying failed loads");
            failures = self.load_kinds(&pending).await;
        }

        match failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => {
                info!("All stores loaded");
                Ok(())
            }
        }
    }

    // ─── Views ─────────────────────────────────────────────────────────

    pub fn customer_view(&self, filter: CustomerFilter) -> CustomerView {
        views::customer_view(self.customers.subscribe(), filter)
    }

    pub fn project_view(&self, filter: ProjectFilter) -> ProjectView {
        views::project_view(self.projects.subscribe(), self.customers.subscribe(), filter)
    }

    pub fn quotation_view(&self, filter: QuotationFilter) -> QuotationView {
        views::quotation_view(self.projects.subscribe(), self.customers.subscribe(), filter)
    }

    pub fn payment_view(&self, filter: PaymentFilter) -> PaymentView {
        views::payment_view(
            self.payments.subscribe(),
            self.projects.subscribe(),
            self.customers.subscribe(),
            filter,
        )
    }

    pub fn service_view(&self, filter: ServiceFilter) -> ServiceView {
        views::service_view(
            self.services.subscribe(),
            self.projects.subscribe(),
            self.customers.subscribe(),
            filter,
        )
    }

    pub fn package_view(&self, filter: PackageFilter) -> PackageView {
        views::package_view(self.packages.subscribe(), filter)
    }

    pub fn component_view(&self, filter: ComponentFilter) -> ComponentView {
        views::component_view(self.components.subscribe(), filter)
    }

    pub fn user_view(&self, filter: UserFilter) -> UserView {
        views::user_view(self.users.subscribe(), filter)
    }

    pub fn dashboard_view(&self) -> DashboardView {
        views::dashboard_view(
            self.projects.subscribe(),
            self.payments.subscribe(),
            self.services.subscribe(),
        )
    }
}

//! Aggregates the dashboard and list screens show next to their rows.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{
    Payment, PaymentStatus, Project, ProjectStatus, QuotationStatus, Service, ServiceStatus,
};

/// Sum of payment amounts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PaymentTotals {
    pub paid: f64,
    pub pending: f64,
    pub overdue: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCounts {
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_projects: usize,
    pub pending_quotations: usize,
    pub completed_installations: usize,
    pub upcoming_services: usize,
    pub total_revenue: f64,
}

pub fn payment_totals<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> PaymentTotals {
    payments
        .into_iter()
        .fold(PaymentTotals::default(), |mut totals, payment| {
            match payment.status {
                PaymentStatus::Paid => totals.paid += payment.amount,
                PaymentStatus::Pending => totals.pending += payment.amount,
                PaymentStatus::Overdue => totals.overdue += payment.amount,
            }
            totals
        })
}

/// Cancelled visits are not counted.
pub fn service_counts<'a>(services: impl IntoIterator<Item = &'a Service>) -> ServiceCounts {
    services
        .into_iter()
        .fold(ServiceCounts::default(), |mut counts, service| {
            match service.status {
                ServiceStatus::Scheduled => counts.scheduled += 1,
                ServiceStatus::InProgress => counts.in_progress += 1,
                ServiceStatus::Completed => counts.completed += 1,
                ServiceStatus::Cancelled => {}
            }
            counts
        })
}

/// Projects grouped under their customer id, in collection order.
pub fn projects_by_customer(projects: &[Project]) -> HashMap<String, Vec<Project>> {
    let mut grouped: HashMap<String, Vec<Project>> = HashMap::new();
    for project in projects {
        grouped
            .entry(project.customer_id.clone())
            .or_default()
            .push(project.clone());
    }
    grouped
}

pub fn payments_by_project(payments: &[Payment]) -> HashMap<String, Vec<Payment>> {
    let mut grouped: HashMap<String, Vec<Payment>> = HashMap::new();
    for payment in payments {
        grouped
            .entry(payment.project_id.clone())
            .or_default()
            .push(payment.clone());
    }
    grouped
}

pub fn dashboard_stats(
    projects: &[Project],
    payments: &[Payment],
    services: &[Service],
) -> DashboardStats {
    let count = |status| projects.iter().filter(|p| p.status == status).count();

    DashboardStats {
        active_projects: count(ProjectStatus::Started),
        pending_quotations: projects
            .iter()
            .filter(|p| p.quotation.status == QuotationStatus::Sent)
            .count(),
        completed_installations: count(ProjectStatus::Completed),
        upcoming_services: services
            .iter()
            .filter(|s| s.status == ServiceStatus::Scheduled)
            .count(),
        total_revenue: payment_totals(payments).paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn seed_payment_totals() {
        let totals = payment_totals(&seed::payments());
        assert_eq!(
            totals,
            PaymentTotals {
                paid: 2310.0,
                pending: 1890.0,
                overdue: 0.0,
            }
        );
    }

    #[test]
    fn seed_service_counts() {
        let counts = service_counts(&seed::services());
        assert_eq!(
            counts,
            ServiceCounts {
                scheduled: 1,
                in_progress: 0,
                completed: 1,
            }
        );
    }

    #[test]
    fn groups_keep_collection_order() {
        let by_project = payments_by_project(&seed::payments());
        let ids: Vec<_> = by_project["1"].iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
        assert!(!by_project.contains_key("2"));

        let by_customer = projects_by_customer(&seed::projects());
        assert_eq!(by_customer["2"][0].name, "Davis Home Off-Grid System");
    }

    #[test]
    fn seed_dashboard() {
        let stats = dashboard_stats(&seed::projects(), &seed::payments(), &seed::services());
        assert_eq!(
            stats,
            DashboardStats {
                active_projects: 1,
                pending_quotations: 1,
                completed_installations: 0,
                upcoming_services: 1,
                total_revenue: 2310.0,
            }
        );
    }
}

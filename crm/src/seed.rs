//! Fixed data set published by each store's `load_all`.

use chrono::NaiveDate;

use crate::models::{
    Component, ComponentType, Coordinates, Customer, CustomerStatus, Location, Package, Payment,
    PaymentStage, PaymentStatus, Project, ProjectStatus, ProjectType, Quotation, QuotationStatus,
    Role, Service, ServiceStatus, ServiceType, User,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

pub fn users() -> Vec<User> {
    let user = |id: &str, name: &str, email: &str, role| User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        role,
    };
    vec![
        user("1", "John Admin", "john@cshsolar.com", Role::SuperAdmin),
        user("2", "Sarah Manager", "sarah@cshsolar.com", Role::Admin),
        user("3", "Mike Sales", "mike@cshsolar.com", Role::Salesmen),
    ]
}

pub fn components() -> Vec<Component> {
    vec![
        Component {
            id: "1".into(),
            kind: ComponentType::Inverter,
            brand: "SMA".into(),
            model: "Sunny Boy 5.0".into(),
            quantity: 1,
            price: 1200.0,
            warranty: "10 years".into(),
        },
        Component {
            id: "2".into(),
            kind: ComponentType::Panel,
            brand: "Canadian Solar".into(),
            model: "CS3W-400P".into(),
            quantity: 12,
            price: 250.0,
            warranty: "25 years".into(),
        },
        Component {
            id: "3".into(),
            kind: ComponentType::Battery,
            brand: "Tesla".into(),
            model: "Powerwall 2".into(),
            quantity: 1,
            price: 7000.0,
            warranty: "10 years".into(),
        },
    ]
}

pub fn packages() -> Vec<Package> {
    let components = components();
    vec![
        Package {
            id: "1".into(),
            name: "Residential On-Grid 5kW".into(),
            kind: ProjectType::OnGrid,
            capacity: "5kW".into(),
            components: components[..2].to_vec(),
            total_price: 4200.0,
        },
        Package {
            id: "2".into(),
            name: "Residential Off-Grid 5kW".into(),
            kind: ProjectType::OffGrid,
            capacity: "5kW".into(),
            components,
            total_price: 11200.0,
        },
    ]
}

pub fn customers() -> Vec<Customer> {
    let customer = |id: &str, name: &str, email: &str, phone: &str, address: &str, status, created| {
        Customer {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
            status,
            created_at: created,
            projects: Vec::new(),
        }
    };
    vec![
        customer(
            "1",
            "Robert Johnson",
            "robert@email.com",
            "+1 (555) 123-4567",
            "123 Main St, Anytown, USA",
            CustomerStatus::Active,
            day(2024, 1, 15),
        ),
        customer(
            "2",
            "Emily Davis",
            "emily@email.com",
            "+1 (555) 987-6543",
            "456 Oak Ave, Somewhere, USA",
            CustomerStatus::Active,
            day(2024, 1, 20),
        ),
        customer(
            "3",
            "Michael Brown",
            "michael@email.com",
            "+1 (555) 456-7890",
            "789 Pine Rd, Anywhere, USA",
            CustomerStatus::Inactive,
            day(2024, 1, 10),
        ),
    ]
}

pub fn projects() -> Vec<Project> {
    let mut packages = packages().into_iter();
    let on_grid = packages.next();
    let off_grid = packages.next();

    let mut projects = Vec::new();
    if let Some(package) = on_grid {
        projects.push(Project {
            id: "1".into(),
            customer_id: "1".into(),
            name: "Johnson Residence Solar Installation".into(),
            kind: ProjectType::OnGrid,
            status: ProjectStatus::Started,
            location: Location {
                address: "123 Main St, Anytown, USA".into(),
                coordinates: Coordinates {
                    lat: 40.7128,
                    lng: -74.0060,
                },
            },
            package,
            quotation: Quotation {
                id: "1".into(),
                project_id: "1".into(),
                valid_until: day(2024, 2, 15),
                total_amount: 4200.0,
                status: QuotationStatus::Approved,
                created_at: day(2024, 1, 15),
            },
            payments: Vec::new(),
            created_at: day(2024, 1, 15),
            completed_at: None,
        });
    }
    if let Some(package) = off_grid {
        projects.push(Project {
            id: "2".into(),
            customer_id: "2".into(),
            name: "Davis Home Off-Grid System".into(),
            kind: ProjectType::OffGrid,
            status: ProjectStatus::Pending,
            location: Location {
                address: "456 Oak Ave, Somewhere, USA".into(),
                coordinates: Coordinates {
                    lat: 40.7589,
                    lng: -73.9851,
                },
            },
            package,
            quotation: Quotation {
                id: "2".into(),
                project_id: "2".into(),
                valid_until: day(2024, 2, 20),
                total_amount: 11200.0,
                status: QuotationStatus::Sent,
                created_at: day(2024, 1, 20),
            },
            payments: Vec::new(),
            created_at: day(2024, 1, 20),
            completed_at: None,
        });
    }
    projects
}

pub fn payments() -> Vec<Payment> {
    let payment = |id: &str, stage, amount, status, due, paid: Option<NaiveDate>, receipt: Option<&str>| {
        Payment {
            id: id.into(),
            project_id: "1".into(),
            stage,
            amount,
            status,
            due_date: due,
            paid_at: paid,
            receipt: receipt.map(str::to_string),
        }
    };
    vec![
        payment(
            "1",
            PaymentStage::Booking,
            1050.0,
            PaymentStatus::Paid,
            day(2024, 1, 20),
            Some(day(2024, 1, 18)),
            Some("REC-001"),
        ),
        payment(
            "2",
            PaymentStage::PackageReservation,
            1260.0,
            PaymentStatus::Paid,
            day(2024, 1, 25),
            Some(day(2024, 1, 24)),
            Some("REC-002"),
        ),
        payment(
            "3",
            PaymentStage::PackageDelivery,
            1260.0,
            PaymentStatus::Pending,
            day(2024, 2, 10),
            None,
            None,
        ),
        payment(
            "4",
            PaymentStage::Completion,
            630.0,
            PaymentStatus::Pending,
            day(2024, 2, 20),
            None,
            None,
        ),
    ]
}

pub fn services() -> Vec<Service> {
    vec![
        Service {
            id: "1".into(),
            project_id: "1".into(),
            customer_id: "1".into(),
            kind: ServiceType::Maintenance,
            status: ServiceStatus::Scheduled,
            scheduled_date: day(2024, 2, 15),
            completed_at: None,
            technician: "Tech Team A".into(),
            notes: "Routine maintenance check".into(),
        },
        Service {
            id: "2".into(),
            project_id: "1".into(),
            customer_id: "1".into(),
            kind: ServiceType::Inspection,
            status: ServiceStatus::Completed,
            scheduled_date: day(2024, 1, 30),
            completed_at: Some(day(2024, 1, 30)),
            technician: "Tech Team B".into(),
            notes: "Pre-installation inspection completed".into(),
        },
    ]
}

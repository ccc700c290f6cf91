//! Records kept by the installer: customers, projects and everything hanging
//! off them. All types serialize with the camelCase field names and the
//! human-readable enum labels used by the front end.

mod catalog;
mod customer;
mod payment;
mod project;
mod quotation;
mod service;
mod user;

use std::fmt;

pub use catalog::{
    Component, ComponentDraft, ComponentPatch, ComponentType, Package, PackageDraft,
    PackagePatch,
};
pub use customer::{Customer, CustomerDraft, CustomerPatch, CustomerStatus};
pub use payment::{Payment, PaymentDraft, PaymentPatch, PaymentStage, PaymentStatus};
pub use project::{
    Coordinates, Location, Project, ProjectDraft, ProjectPatch, ProjectStatus, ProjectType,
};
pub use quotation::{Quotation, QuotationStatus};
pub use service::{Service, ServiceDraft, ServicePatch, ServiceStatus, ServiceType};
pub use user::{Role, User, UserDraft, UserPatch};

/// A string that is not one of an enum's labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub label: String,
}

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.label)
    }
}

impl std::error::Error for UnknownLabel {}

/// Declares a closed set of labelled values. The label is what the UI shows,
/// what serde writes and what `FromStr` accepts (case-insensitively).
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| $crate::models::UnknownLabel {
                        kind: stringify!($name),
                        label: s.to_string(),
                    })
            }
        }
    };
}

pub(crate) use labelled_enum;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for stage in PaymentStage::ALL {
            assert_eq!(stage.as_str().parse::<PaymentStage>(), Ok(*stage));
        }
        assert_eq!("in progress".parse::<ServiceStatus>(), Ok(ServiceStatus::InProgress));
        assert_eq!("off-grid".parse::<ProjectType>(), Ok(ProjectType::OffGrid));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "Sideways".parse::<ProjectStatus>().unwrap_err();
        assert_eq!(err.kind, "ProjectStatus");
        assert_eq!(err.to_string(), "unknown ProjectStatus 'Sideways'");
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&PaymentStage::PackageReservation).unwrap();
        assert_eq!(json, "\"Package Reservation\"");

        let status: ServiceStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(status, ServiceStatus::InProgress);
    }

    #[test]
    fn quotation_days_remaining_goes_negative_after_expiry() {
        let day = |d| chrono::NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let quotation = Quotation {
            id: "q".into(),
            project_id: "p".into(),
            valid_until: day(10),
            total_amount: 100.0,
            status: QuotationStatus::Sent,
            created_at: day(1),
        };

        assert_eq!(quotation.days_remaining(day(7)), 3);
        assert_eq!(quotation.days_remaining(day(10)), 0);
        assert_eq!(quotation.days_remaining(day(12)), -2);
    }
}

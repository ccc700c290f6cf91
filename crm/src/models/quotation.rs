use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::labelled_enum;

labelled_enum! {
    pub enum QuotationStatus {
        Draft => "Draft",
        Sent => "Sent",
        Approved => "Approved",
        Rejected => "Rejected",
        Expired => "Expired",
    }
}

/// A time-limited priced offer. Lives embedded in its [`Project`](super::Project).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: String,
    pub project_id: String,
    pub valid_until: NaiveDate,
    pub total_amount: f64,
    pub status: QuotationStatus,
    pub created_at: NaiveDate,
}

impl Quotation {
    /// Days left until `valid_until`; negative once it has lapsed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.valid_until - today).num_days()
    }
}

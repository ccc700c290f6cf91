use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store::Entity;

use super::labelled_enum;

labelled_enum! {
    /// Milestones of a project's payment schedule, in order.
    pub enum PaymentStage {
        Booking => "Booking",
        PackageReservation => "Package Reservation",
        PackageDelivery => "Package Delivery",
        Completion => "Completion",
    }
}

labelled_enum! {
    pub enum PaymentStatus {
        Pending => "Pending",
        Paid => "Paid",
        Overdue => "Overdue",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub project_id: String,
    pub stage: PaymentStage,
    pub amount: f64,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<NaiveDate>,
    /// Receipt number, e.g. "REC-001"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub project_id: String,
    pub stage: PaymentStage,
    pub amount: f64,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    pub paid_at: Option<NaiveDate>,
    pub receipt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentPatch {
    pub project_id: Option<String>,
    pub stage: Option<PaymentStage>,
    pub amount: Option<f64>,
    pub status: Option<PaymentStatus>,
    pub due_date: Option<NaiveDate>,
    pub paid_at: Option<NaiveDate>,
    pub receipt: Option<String>,
}

impl PaymentPatch {
    /// Marks a payment as paid on `date` with the given receipt.
    pub fn paid(date: NaiveDate, receipt: impl Into<String>) -> Self {
        Self {
            status: Some(PaymentStatus::Paid),
            paid_at: Some(date),
            receipt: Some(receipt.into()),
            ..Self::default()
        }
    }
}

impl Entity for Payment {
    type Draft = PaymentDraft;
    type Patch = PaymentPatch;
    const KIND: &'static str = "Payment";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: PaymentDraft, _today: NaiveDate) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            stage: draft.stage,
            amount: draft.amount,
            status: draft.status,
            due_date: draft.due_date,
            paid_at: draft.paid_at,
            receipt: draft.receipt,
        }
    }

    fn apply(&mut self, patch: PaymentPatch) {
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        if let Some(stage) = patch.stage {
            self.stage = stage;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(paid_at) = patch.paid_at {
            self.paid_at = Some(paid_at);
        }
        if let Some(receipt) = patch.receipt {
            self.receipt = Some(receipt);
        }
    }
}

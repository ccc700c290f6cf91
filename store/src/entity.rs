use chrono::NaiveDate;

/// A record type that can live in an [`EntityStore`](crate::EntityStore).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The record without its id, as submitted by a create form.
    type Draft: Send;
    /// Partial update. Fields left as `None` keep their current value.
    type Patch: Send;
    /// Type name used in errors and log fields.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Builds a new record from a draft, filling in type-specific defaults
    /// such as the creation date.
    fn from_draft(id: String, draft: Self::Draft, today: NaiveDate) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}

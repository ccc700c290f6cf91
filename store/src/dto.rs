use std::fmt;

/// The four store operations, as seen by a [`FaultPolicy`](crate::FaultPolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadAll,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::LoadAll,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LoadAll => "load_all",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Simulated API failure. The caller may retry.
    Transient { kind: &'static str, op: Operation },
    /// No record with this id. Retrying will not help.
    NotFound { kind: &'static str, id: String },
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Transient { kind, .. } | StoreError::NotFound { kind, .. } => kind,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transient { .. } => write!(f, "Simulated API error"),
            StoreError::NotFound { kind, id } => write!(f, "{} not found: {}", kind, id),
        }
    }
}

impl std::error::Error for StoreError {}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Every handle to the store was dropped; no further updates will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreClosed {
    pub kind: &'static str,
}

impl fmt::Display for StoreClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} store closed", self.kind)
    }
}

impl std::error::Error for StoreClosed {}

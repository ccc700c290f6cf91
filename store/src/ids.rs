use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Mints ids for newly created records.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Time-ordered UUIDs (v7).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn next_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// `prefix` followed by a monotonic counter: `c-1`, `c-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

//! Scripted fault policy for tests.
//!
//! [`MockFaults`] records every fault check in a [`FaultTracker`] so tests can
//! assert which operations reached the simulated API, and fails calls
//! according to a [`MockFaultConfig`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::dto::Operation;
use crate::faults::FaultPolicy;

// ─── Configuration for failure injection ──────────────────────────────────

/// Controls which calls fail. Defaults to all-success.
#[derive(Debug, Clone, Default)]
pub struct MockFaultConfig {
    /// Consumed in order, one entry per fault check; `true` fails that call.
    /// Once exhausted, `always_fail` decides.
    pub script: Vec<bool>,
    /// Operations that fail every time
    pub always_fail: Vec<Operation>,
}

// ─── Call tracker ─────────────────────────────────────────────────────────

/// Counts fault checks per operation. Shared between the policy and the test.
#[derive(Debug, Clone, Default)]
pub struct FaultTracker {
    pub load_alls: Arc<AtomicUsize>,
    pub creates: Arc<AtomicUsize>,
    pub updates: Arc<AtomicUsize>,
    pub deletes: Arc<AtomicUsize>,
    pub failures: Arc<AtomicUsize>,
}

impl FaultTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, op: Operation) {
        let counter = match op {
            Operation::LoadAll => &self.load_alls,
            Operation::Create => &self.creates,
            Operation::Update => &self.updates,
            Operation::Delete => &self.deletes,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn load_all_count(&self) -> usize {
        self.load_alls.load(Ordering::Relaxed)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::Relaxed)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::Relaxed)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

// ─── Mock policy ──────────────────────────────────────────────────────────

pub struct MockFaults {
    tracker: FaultTracker,
    script: Mutex<VecDeque<bool>>,
    always_fail: Vec<Operation>,
}

impl MockFaults {
    /// A policy that never fails.
    pub fn new() -> (Self, FaultTracker) {
        Self::with_config(MockFaultConfig::default())
    }

    pub fn with_config(config: MockFaultConfig) -> (Self, FaultTracker) {
        let tracker = FaultTracker::new();
        let faults = Self {
            tracker: tracker.clone(),
            script: Mutex::new(config.script.into_iter().collect()),
            always_fail: config.always_fail,
        };
        (faults, tracker)
    }

    /// Shorthand for a policy whose first checks follow `script`.
    pub fn scripted(script: impl IntoIterator<Item = bool>) -> (Self, FaultTracker) {
        Self::with_config(MockFaultConfig {
            script: script.into_iter().collect(),
            ..MockFaultConfig::default()
        })
    }
}

impl FaultPolicy for MockFaults {
    fn should_fail(&self, _kind: &'static str, op: Operation) -> bool {
        self.tracker.record(op);

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        let fail = scripted.unwrap_or_else(|| self.always_fail.contains(&op));

        if fail {
            self.tracker.failures.fetch_add(1, Ordering::Relaxed);
        }
        fail
    }
}

//! EntityStore: the single owner of one record collection.
//!
//! State lives in three `watch` channels (items, loading, error). Every
//! mutation is one modify of the items channel, so readers never observe a
//! half-applied change. Operations are not ordered against each other: two
//! calls racing on the same id commit in whichever order their latency
//! timers fire.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::dto::{Operation, Result, StoreClosed, StoreError};
use crate::entity::Entity;
use crate::faults::{FaultPolicy, NoFaults, RandomFaults};
use crate::ids::{IdGenerator, UuidV7Ids};

// ─── Configuration ─────────────────────────────────────────────────────────

/// Collaborators injected into a store.
#[derive(Clone)]
pub struct StoreOptions {
    /// Simulated round-trip time applied to every operation
    pub latency: Duration,
    pub faults: Arc<dyn FaultPolicy>,
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}

impl Default for StoreOptions {
    /// 500 ms latency and a 5% failure rate, the behaviour of the mock API.
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(500),
            faults: Arc::new(RandomFaults::from_entropy(0.05)),
            ids: Arc::new(UuidV7Ids),
            clock: Arc::new(SystemClock),
        }
    }
}

impl StoreOptions {
    /// No latency and no failures.
    pub fn immediate() -> Self {
        Self {
            latency: Duration::ZERO,
            faults: Arc::new(NoFaults),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_faults(mut self, faults: Arc<dyn FaultPolicy>) -> Self {
        self.faults = faults;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

// ─── Shared state ──────────────────────────────────────────────────────────

struct Shared<T> {
    /// What `load_all` publishes
    seed: Vec<T>,
    items: watch::Sender<Vec<T>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    in_flight: AtomicUsize,
    options: StoreOptions,
}

impl<T> Shared<T> {
    fn publish_loading(&self) {
        self.loading.send_if_modified(|flag| {
            let busy = self.in_flight.load(Ordering::SeqCst) > 0;
            if *flag == busy {
                return false;
            }
            *flag = busy;
            true
        });
    }
}

/// Marks one operation as in flight until dropped, including when the
/// operation's future is dropped before completion.
struct InFlight<'a, T> {
    shared: &'a Shared<T>,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.shared.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.shared.publish_loading();
    }
}

// ─── EntityStore ───────────────────────────────────────────────────────────

/// In-memory collection of one entity type. Clones share the same state.
pub struct EntityStore<T: Entity> {
    shared: Arc<Shared<T>>,
}

impl<T: Entity> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Entity> EntityStore<T> {
    /// Creates an empty store. `seed` is published by [`load_all`](Self::load_all).
    pub fn new(seed: Vec<T>, options: StoreOptions) -> Self {
        let (items, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                seed,
                items,
                loading,
                error,
                in_flight: AtomicUsize::new(0),
                options,
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        T::KIND
    }

    // ─── Operations ────────────────────────────────────────────────────

    /// Replaces the collection with the seed set.
    #[instrument(skip(self), fields(kind = T::KIND))]
    pub async fn load_all(&self) -> Result<Vec<T>> {
        let _guard = self.begin();
        self.simulate(Operation::LoadAll).await?;

        let items = self.shared.seed.clone();
        self.shared.items.send_replace(items.clone());

        info!(count = items.len(), "Loaded records");
        Ok(items)
    }

    /// Assigns a fresh id, applies type defaults and appends the record.
    #[instrument(skip(self, draft), fields(kind = T::KIND))]
    pub async fn create(&self, draft: T::Draft) -> Result<T> {
        let _guard = self.begin();

        let id = self.shared.options.ids.next_id();
        let record = T::from_draft(id, draft, self.shared.options.clock.today());

        self.simulate(Operation::Create).await?;
        self.shared
            .items
            .send_modify(|items| items.push(record.clone()));

        info!(id = record.id(), "Created record");
        Ok(record)
    }

    /// Merges `patch` onto the record with this id.
    ///
    /// A missing id fails straight away, without latency or fault checks. The
    /// id is checked again at commit time in case a delete got there first.
    #[instrument(skip(self, patch), fields(kind = T::KIND))]
    pub async fn update(&self, id: &str, patch: T::Patch) -> Result<T> {
        if !self.contains(id) {
            return Err(self.not_found(id));
        }

        let _guard = self.begin();
        self.simulate(Operation::Update).await?;

        let mut updated = None;
        self.shared.items.send_if_modified(|items| {
            match items.iter_mut().find(|item| item.id() == id) {
                Some(item) => {
                    item.apply(patch);
                    updated = Some(item.clone());
                    true
                }
                None => false,
            }
        });

        match updated {
            Some(record) => {
                info!("Updated record");
                Ok(record)
            }
            None => {
                warn!("Record disappeared before update committed");
                Err(self.not_found(id))
            }
        }
    }

    /// Removes the record with this id. Returns whether anything was removed;
    /// an unknown id is not an error.
    #[instrument(skip(self), fields(kind = T::KIND))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.begin();
        self.simulate(Operation::Delete).await?;

        let removed = self.shared.items.send_if_modified(|items| {
            let before = items.len();
            items.retain(|item| item.id() != id);
            items.len() != before
        });

        info!(removed, "Delete finished");
        Ok(removed)
    }

    // ─── Reads ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Vec<T> {
        self.shared.items.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.shared
            .items
            .borrow()
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shared.items.borrow().iter().any(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.shared.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        *self.shared.loading.borrow()
    }

    pub fn last_error(&self) -> Option<String> {
        self.shared.error.borrow().clone()
    }

    /// Registers a new observer. Drop it (or call
    /// [`Subscription::unsubscribe`]) to detach.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            kind: T::KIND,
            items: self.shared.items.subscribe(),
            loading: self.shared.loading.subscribe(),
            error: self.shared.error.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.items.receiver_count()
    }

    // ─── Helpers ───────────────────────────────────────────────────────

    fn begin(&self) -> InFlight<'_, T> {
        self.shared.error.send_if_modified(|err| err.take().is_some());
        self.shared.in_flight.fetch_add(1, Ordering::SeqCst);
        self.shared.publish_loading();
        InFlight {
            shared: &self.shared,
        }
    }

    async fn simulate(&self, op: Operation) -> Result<()> {
        let latency = self.shared.options.latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.shared.options.faults.should_fail(T::KIND, op) {
            let err = StoreError::Transient { kind: T::KIND, op };
            warn!(%op, "Injected store failure");
            self.shared.error.send_replace(Some(err.to_string()));
            return Err(err);
        }
        Ok(())
    }

    fn not_found(&self, id: &str) -> StoreError {
        StoreError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }
}

// ─── Subscription ──────────────────────────────────────────────────────────

/// Observer handle for one store: the three signals plus change notification.
pub struct Subscription<T> {
    kind: &'static str,
    items: watch::Receiver<Vec<T>>,
    loading: watch::Receiver<bool>,
    error: watch::Receiver<Option<String>>,
}

impl<T: Clone> Subscription<T> {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Latest collection; marks it as seen.
    pub fn items(&mut self) -> Vec<T> {
        self.items.borrow_and_update().clone()
    }

    pub fn loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Latest error; marks it as seen.
    pub fn error(&mut self) -> Option<String> {
        self.error.borrow_and_update().clone()
    }

    /// True when the collection or the error changed since last seen.
    pub fn has_changed(&self) -> bool {
        self.items.has_changed().unwrap_or(false) || self.error.has_changed().unwrap_or(false)
    }

    /// Waits until the collection or the error changes.
    pub async fn changed(&mut self) -> std::result::Result<(), StoreClosed> {
        let kind = self.kind;
        tokio::select! {
            res = self.items.changed() => res.map_err(|_| StoreClosed { kind }),
            res = self.error.changed() => res.map_err(|_| StoreClosed { kind }),
        }
    }

    /// Waits until the loading flag flips and returns the new value.
    pub async fn loading_changed(&mut self) -> std::result::Result<bool, StoreClosed> {
        let kind = self.kind;
        self.loading
            .changed()
            .await
            .map_err(|_| StoreClosed { kind })?;
        Ok(*self.loading.borrow_and_update())
    }

    pub fn unsubscribe(self) {}
}

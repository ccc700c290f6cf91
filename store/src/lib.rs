//! Generic in-memory entity store.
//!
//! Every record type of the application lives in an [`EntityStore`]: one ordered
//! collection plus a loading flag and a last-error string, each published on its
//! own `watch` channel. Operations simulate a remote API: they wait for a fixed
//! latency and may fail according to an injected [`FaultPolicy`].
//!
//! Ids, dates and failures all come from injected collaborators
//! ([`IdGenerator`], [`Clock`], [`FaultPolicy`]) so a run is reproducible.

mod clock;
mod dto;
mod entity;
mod faults;
mod ids;
pub mod mock;
mod store;

#[cfg(test)]
mod store_tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dto::{Operation, Result, StoreClosed, StoreError};
pub use entity::Entity;
pub use faults::{FaultPolicy, NoFaults, RandomFaults};
pub use ids::{IdGenerator, SequentialIds, UuidV7Ids};
pub use store::{EntityStore, StoreOptions, Subscription};

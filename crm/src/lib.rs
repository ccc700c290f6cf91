//! Solar installer CRM core: record types, seed data, filtered views and the
//! [`AppContext`] that owns one [`store::EntityStore`] per record type.

pub mod config;
pub mod context;
pub mod filter;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod queries;
pub mod seed;
pub mod views;

#[cfg(test)]
mod context_tests;

pub use config::{Config, ConfigError, IdStrategy, LogFormat};
pub use context::{AppContext, StoreKind};
pub use filter::{EnumFilter, matches_search};
pub use forms::{CustomerForm, FormError, ProjectForm};
pub use navigation::{Section, visible_sections};
pub use views::{LiveView, Sources, ViewError};

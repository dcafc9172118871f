//! Core registration logic for the RSVP app.
//! This crate is the single source of truth for registrant invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;
pub mod validation;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::event::{Countdown, EventDetails};
pub use model::registrant::{
    Attending, DraftShapeError, Registrant, RegistrantDraft, RegistrantId, MAX_ADULTS, MAX_KIDS,
    MAX_KID_AGE,
};
pub use service::registration_form::{RegistrationForm, SubmitOutcome};
pub use storage::{LocalStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult};
pub use store::registrant_store::{OpenStoreError, RegistrantStore, StoreError, DEFAULT_STORAGE_KEY};
pub use validation::{validate, FormField, ValidationErrors};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

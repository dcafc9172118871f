//! In-memory registrant store with write-through persistence.
//!
//! # Responsibility
//! - Admit validated drafts as registrants with fresh id and timestamp.
//! - Remove registrants by id; removal of an unknown id is a no-op.
//! - Rehydrate the collection from local storage at startup.
//!
//! # Invariants
//! - Insertion order is preserved; no two records share an `id`.
//! - A rejected `add` leaves the collection untouched.
//! - A mutation only stands once storage accepted it; a failed write rolls
//!   the in-memory change back and is reported to the caller.
//! - Unreadable persisted state yields an empty collection, never an error.

use crate::model::registrant::{DraftShapeError, Registrant, RegistrantDraft, RegistrantId};
use crate::config::{ConfigError, CoreConfig};
use crate::storage::{LocalStorage, SqliteStorage, StorageError};
use crate::validation::{validate, ValidationErrors};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use uuid::Uuid;

/// Storage key used by the browser app's persisted root state.
pub const DEFAULT_STORAGE_KEY: &str = "persist:root";

/// Failure of a store mutation. The collection is unchanged in every case.
#[derive(Debug)]
pub enum StoreError {
    /// The draft did not pass validation.
    Rejected(ValidationErrors),
    /// Numeric fields break the registrant shape.
    MalformedDraft(DraftShapeError),
    /// The collection could not be encoded for storage.
    Encode(serde_json::Error),
    /// Local storage refused the write.
    Persist(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(errors) => write!(f, "draft rejected: {errors}"),
            Self::MalformedDraft(err) => write!(f, "malformed draft: {err}"),
            Self::Encode(err) => write!(f, "failed to encode registrants: {err}"),
            Self::Persist(err) => write!(f, "failed to persist registrants: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(_) => None,
            Self::MalformedDraft(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<DraftShapeError> for StoreError {
    fn from(value: DraftShapeError) -> Self {
        Self::MalformedDraft(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Persist(value)
    }
}

/// Failure to open the store described by a `CoreConfig`.
#[derive(Debug)]
pub enum OpenStoreError {
    Config(ConfigError),
    Io(std::io::Error),
    Storage(StorageError),
}

impl Display for OpenStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to create data directory: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OpenStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ConfigError> for OpenStoreError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StorageError> for OpenStoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

#[derive(Serialize)]
struct PersistedListRef<'a> {
    list: &'a [Registrant],
}

#[derive(Deserialize)]
struct PersistedList {
    list: Vec<Registrant>,
}

/// Ordered registrant collection bound to one storage key.
pub struct RegistrantStore<S: LocalStorage> {
    storage: S,
    key: String,
    list: Vec<Registrant>,
}

impl<S: LocalStorage> RegistrantStore<S> {
    /// Creates a store seeded from the state persisted under `key`.
    ///
    /// A missing or unreadable item starts an empty collection.
    pub fn restore(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let list = load_list(&storage, &key);
        info!(
            "event=store_restore module=store status=ok count={}",
            list.len()
        );
        Self { storage, key, list }
    }

    /// Admits a draft and appends the new registrant.
    ///
    /// # Errors
    /// - `StoreError::Rejected` when the draft fails `validate`.
    /// - `StoreError::MalformedDraft` when counts or ages are out of shape.
    /// - `StoreError::Encode` / `StoreError::Persist` when the new list could
    ///   not be written; the appended record is dropped again.
    ///
    /// Every error leaves the collection exactly as it was.
    pub fn add(&mut self, draft: &RegistrantDraft) -> Result<Registrant, StoreError> {
        let errors = validate(draft);
        if !errors.is_empty() {
            warn!(
                "event=registrant_add module=store status=rejected error_code=validation fields={}",
                errors.len()
            );
            return Err(StoreError::Rejected(errors));
        }
        if let Err(err) = draft.check_shape() {
            warn!(
                "event=registrant_add module=store status=rejected error_code=malformed_draft error={err}"
            );
            return Err(err.into());
        }

        let registrant = Registrant::from_draft(draft, Uuid::new_v4(), Utc::now());
        self.list.push(registrant.clone());
        if let Err(err) = self.persist("registrant_add") {
            self.list.pop();
            return Err(err);
        }

        info!(
            "event=registrant_add module=store status=ok id={} count={}",
            registrant.id,
            self.list.len()
        );
        Ok(registrant)
    }

    /// Removes the registrant with `id`.
    ///
    /// Returns whether a record was removed; an unknown id changes nothing
    /// and touches no storage.
    ///
    /// # Errors
    /// - `StoreError::Encode` / `StoreError::Persist` when the shortened list
    ///   could not be written; the record is put back at its old position.
    pub fn delete(&mut self, id: RegistrantId) -> Result<bool, StoreError> {
        let Some(index) = self.list.iter().position(|registrant| registrant.id == id) else {
            debug!("event=registrant_delete module=store status=noop id={id}");
            return Ok(false);
        };

        let removed = self.list.remove(index);
        if let Err(err) = self.persist("registrant_delete") {
            self.list.insert(index, removed);
            return Err(err);
        }

        info!(
            "event=registrant_delete module=store status=ok id={id} count={}",
            self.list.len()
        );
        Ok(true)
    }

    /// Current registrants in insertion order.
    pub fn list(&self) -> &[Registrant] {
        &self.list
    }

    pub fn get(&self, id: RegistrantId) -> Option<&Registrant> {
        self.list.iter().find(|registrant| registrant.id == id)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self, event: &str) -> Result<(), StoreError> {
        let document = PersistedListRef { list: &self.list };
        let payload = serde_json::to_string(&document).map_err(|err| {
            error!(
                "event={event} module=store status=error error_code=persist_encode_failed error={err}"
            );
            StoreError::Encode(err)
        })?;

        self.storage.set_item(&self.key, &payload).map_err(|err| {
            error!(
                "event={event} module=store status=error error_code=persist_write_failed error={err}"
            );
            StoreError::Persist(err)
        })
    }
}

impl RegistrantStore<SqliteStorage> {
    /// Opens a SQLite-backed store file and rehydrates it.
    pub fn open_sqlite(
        path: impl AsRef<Path>,
        key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let storage = SqliteStorage::open(path)?;
        Ok(Self::restore(storage, key))
    }

    /// Opens the store described by `config`.
    ///
    /// With a `data_dir` the directory is created and the storage file lives
    /// inside it; without one the store is an in-memory SQLite database.
    pub fn open_configured(config: &CoreConfig) -> Result<Self, OpenStoreError> {
        config.validate()?;
        let storage = match (&config.data_dir, config.storage_path()) {
            (Some(dir), Some(path)) => {
                std::fs::create_dir_all(dir).map_err(OpenStoreError::Io)?;
                SqliteStorage::open(path)?
            }
            _ => SqliteStorage::open_in_memory()?,
        };
        Ok(Self::restore(storage, config.storage_key.as_str()))
    }
}

fn load_list(storage: &impl LocalStorage, key: &str) -> Vec<Registrant> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(
                "event=store_restore module=store status=fallback error_code=storage_read_failed error={err}"
            );
            return Vec::new();
        }
    };

    match decode_list(&raw) {
        Ok(list) => list,
        Err(reason) => {
            warn!(
                "event=store_restore module=store status=fallback error_code=invalid_persisted_state reason={reason}"
            );
            Vec::new()
        }
    }
}

fn decode_list(raw: &str) -> Result<Vec<Registrant>, String> {
    let persisted: PersistedList =
        serde_json::from_str(raw).map_err(|err| format!("decode failed: {err}"))?;

    let mut seen = HashSet::with_capacity(persisted.list.len());
    for registrant in &persisted.list {
        registrant
            .check_shape()
            .map_err(|err| format!("registrant {}: {err}", registrant.id))?;
        if !seen.insert(registrant.id) {
            return Err(format!("duplicate registrant id {}", registrant.id));
        }
    }

    Ok(persisted.list)
}

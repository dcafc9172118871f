//! Core configuration.
//!
//! # Responsibility
//! - Collect the knobs a host (UI bridge, CLI) passes into core.
//! - Derive storage and log locations from one data directory.
//!
//! # Invariants
//! - `storage_key` is never blank.
//! - `data_dir`, when set, is absolute.

use crate::logging::default_log_level;
use crate::model::event::EventDetails;
use crate::store::registrant_store::DEFAULT_STORAGE_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// File name of the SQLite local-storage database inside `data_dir`.
pub const STORAGE_FILE_NAME: &str = "rsvp_local_storage.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
    RelativeDataDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
            Self::RelativeDataDir(path) => write!(
                f,
                "data_dir must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Host-provided settings for one core session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Key under which the registrant list is persisted.
    pub storage_key: String,
    /// Directory for the storage file and logs. `None` keeps state in memory.
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub event: EventDetails,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            log_level: default_log_level().to_string(),
            event: EventDetails::default(),
        }
    }
}

impl CoreConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if let Some(dir) = &self.data_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeDataDir(dir.clone()));
            }
        }
        Ok(())
    }

    pub fn storage_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(STORAGE_FILE_NAME))
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(LOG_DIR_NAME))
    }
}

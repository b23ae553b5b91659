use crate::request::RequestOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const HISTORY_FILE_NAME: &str = ".api_test_history.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Could not locate a home directory (set HOME or USERPROFILE)")]
    NoHomeDirectory,
    #[error("Failed to write history file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One logged invocation of the tool.
///
/// Records are immutable once written and only ever appended, so insertion
/// order is the only meaningful order. Extra fields written by newer versions
/// are ignored on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub options: RequestOptions,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

/// Append-only store over a single JSON-array history file.
///
/// The whole file is read and rewritten per append. There is no locking, so
/// concurrent invocations against the same path can lose updates (last
/// writer wins).
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user history file, derived from the home-directory variable.
    pub fn default_path() -> Result<PathBuf, HistoryError> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(HISTORY_FILE_NAME))
            .ok_or(HistoryError::NoHomeDirectory)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all stored records; a missing, unreadable, or corrupt file is
    /// treated as an empty history and never fails the caller.
    #[tracing::instrument]
    pub fn load(&self) -> Vec<RequestRecord> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                debug!(%error, "History file not readable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(error) => {
                warn!(%error, "History file is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Append one record, stamped with the current time, and rewrite the
    /// whole file.
    #[tracing::instrument(skip(options))]
    pub fn append(
        &self,
        method: &str,
        url: &str,
        options: RequestOptions,
        status: u16,
    ) -> Result<(), HistoryError> {
        let mut records = self.load();

        records.push(RequestRecord {
            method: method.to_string(),
            url: url.to_string(),
            options,
            status,
            timestamp: Utc::now(),
        });

        std::fs::write(&self.path, serde_json::to_string_pretty(&records)?)?;
        info!(total = records.len(), "Appended request to history");

        Ok(())
    }
}

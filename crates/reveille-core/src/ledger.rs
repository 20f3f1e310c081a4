//! Append-only per-user wake-up history, persisted as JSON.
//!
//! The ledger is the sole owner of persisted history. All mutation is
//! serialized through an internal mutex held across the whole
//! read-modify-write, and the file is replaced atomically (temp file plus
//! rename) so a reader never observes a partial write. Records are never
//! removed or mutated once appended.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::submission::Outcome;

/// One verified wake-up attempt. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeupRecord {
    /// Calendar day of the verified instant, in the window's timezone.
    pub date: NaiveDate,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

type History = HashMap<String, Vec<WakeupRecord>>;

/// Persisted mapping from user id to ordered outcome history.
pub struct StatusLedger {
    path: PathBuf,
    inner: Mutex<History>,
}

impl StatusLedger {
    /// Open the ledger file, loading existing history. A missing file
    /// starts an empty ledger; an unreadable or corrupt file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let inner = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| {
                LedgerError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => History::new(),
            Err(source) => {
                return Err(LedgerError::Read {
                    path: path.clone(),
                    source,
                })
            }
        };
        Ok(Self {
            path,
            inner: Mutex::new(inner),
        })
    }

    /// Durably append a record to the user's history.
    ///
    /// Atomic with respect to concurrent appends across any users: the
    /// lock is held from the in-memory insert through the file replace.
    /// On a persistence failure the in-memory insert is rolled back and
    /// the error surfaces to the caller.
    pub fn append(&self, user_id: &str, record: WakeupRecord) -> Result<(), LedgerError> {
        let mut history = self.inner.lock().map_err(|_| LedgerError::Poisoned)?;
        history.entry(user_id.to_string()).or_default().push(record);
        if let Err(e) = persist(&self.path, &history) {
            if let Some(records) = history.get_mut(user_id) {
                records.pop();
            }
            return Err(e);
        }
        Ok(())
    }

    /// Full ordered history for one user (owned copy, not a live view).
    pub fn read(&self, user_id: &str) -> Result<Vec<WakeupRecord>, LedgerError> {
        let history = self.inner.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(history.get(user_id).cloned().unwrap_or_default())
    }

    /// The full mapping, for reporting and statistics.
    pub fn read_all(&self) -> Result<HashMap<String, Vec<WakeupRecord>>, LedgerError> {
        let history = self.inner.lock().map_err(|_| LedgerError::Poisoned)?;
        Ok(history.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whole-file replace: serialize, write a sibling temp file, rename over
/// the target. Readers see either the old file or the new one.
fn persist(path: &Path, history: &History) -> Result<(), LedgerError> {
    let json = serde_json::to_string_pretty(history).map_err(LedgerError::Serialize)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).map_err(|source| LedgerError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| LedgerError::Write {
        path: path.to_path_buf(),
        source,
    })
}

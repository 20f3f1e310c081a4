//! Core error types for reveille-core.
//!
//! This module defines the error hierarchy using thiserror. Expected,
//! user-caused conditions (no attachment, bad file type, missing metadata,
//! unparseable date) are not errors at all -- they resolve into
//! [`crate::Outcome`] variants and become user-visible feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for reveille-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Ledger persistence errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Outbound chat delivery errors
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ledger persistence errors.
///
/// Any variant reaching a caller means an append or read against the
/// persisted store did not take effect; the in-memory state is rolled
/// back so memory and disk never diverge.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Ledger file exists but could not be read
    #[error("Failed to read ledger at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ledger file contents are not valid ledger JSON
    #[error("Ledger file at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Ledger state could not be serialized
    #[error("Failed to serialize ledger: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Ledger file could not be written or atomically replaced
    #[error("Failed to write ledger at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A previous writer panicked while holding the ledger lock
    #[error("Ledger lock poisoned by a panicked writer")]
    Poisoned,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The data directory could not be determined or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// Outbound delivery to the chat platform failed.
///
/// Never fatal: feedback and reminder sends are best-effort, logged and
/// dropped so the next submission is not blocked.
#[derive(Error, Debug)]
#[error("Delivery to chat platform failed: {0}")]
pub struct DeliveryError(String);

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

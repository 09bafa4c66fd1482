// File: src/error.rs
//! Error types.
//!
//! Fetch failures are fatal at startup; persistence failures surface from the
//! operation that tried to save.

use std::path::PathBuf;
use thiserror::Error;

/// The word list could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read word list: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch word list from {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Word list request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// The session snapshot could not be written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to {operation} session file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize session")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to complete save of {path}")]
    AtomicWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DrillError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Terminal I/O failed")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = DrillError> = std::result::Result<T, E>;

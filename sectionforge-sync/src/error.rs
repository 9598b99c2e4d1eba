//! Error types for the sync layer.

use sectionforge_schema::SchemaError;
use std::time::Duration;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid configuration. Raised before any work starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Schema derivation failed, including name collisions.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A read kept failing after every allowed attempt.
    #[error("{what} failed after {attempts} attempts: {last}")]
    ReadExhausted {
        what: String,
        attempts: u32,
        last: String,
    },

    /// Template store failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl SyncError {
    /// Returns true for errors that must abort a run before any mutation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Config(_) | SyncError::Schema(_))
    }

    /// Returns true if repeating the same read may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Network(_) | SyncError::RateLimited { .. } => true,
            SyncError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns the server-requested delay for rate-limit errors.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SyncError::RateLimited { retry_after_secs } => {
                Some(Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(e: rusqlite::Error) -> Self {
        SyncError::Storage(e.to_string())
    }
}

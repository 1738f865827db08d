//! Error types for the store module.

use ledgerpost_core::{CoreError, SequenceError};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Sequence arithmetic failed, including exhaustion of the sequence space.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// A stored snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] CoreError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

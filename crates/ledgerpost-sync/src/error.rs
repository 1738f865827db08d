//! Error types for the sync module.

use ledgerpost_core::{Sha256Hash, ValidationError};
use thiserror::Error;

/// Errors that can occur while synchronizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The local snapshot is longer than the observed one.
    #[error("local chain is ahead: local={local}, observed={observed}")]
    LocalAhead { local: usize, observed: usize },

    /// The observed snapshot does not contain the local head at its
    /// position, so adopting it would discard local blocks.
    #[error("observed chain diverges from local chain at block {index}")]
    Diverged { index: u64 },

    /// The observed snapshot failed validation.
    #[error("observed chain is invalid: {0}")]
    InvalidObserved(#[from] ValidationError),

    /// The cursor block does not appear in the observed chain.
    #[error("cursor {0:?} not found in observed chain")]
    UnknownCursor(Sha256Hash),

    /// No record payload anywhere in the chain.
    #[error("no sequence number found in chain")]
    SequenceNotFound,
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

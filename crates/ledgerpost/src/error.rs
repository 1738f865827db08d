//! Error types for the Ledgerpost facade.

use ledgerpost_codec::CodecError;
use ledgerpost_core::{Address, CoreError};
use ledgerpost_store::StoreError;
use ledgerpost_sync::SyncError;
use thiserror::Error;

/// Errors that can occur during party operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger error: {0}")]
    Core(#[from] CoreError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// No public identity is registered for this address.
    #[error("unknown peer: {0}")]
    UnknownPeer(Address),

    /// A background mining task panicked or was cancelled by the runtime.
    #[error("mining task failed: {0}")]
    Task(String),
}

/// Result type for party operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

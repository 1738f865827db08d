//! Store trait: the abstract interface for party persistence.

use bytes::Bytes;
use ledgerpost_core::{Blockchain, ChainConfig};
use tracing::debug;

use crate::error::Result;

/// Durable storage for one party.
///
/// Methods take `&self`; implementations use interior locking so a store
/// can be shared behind an `Arc`.
pub trait Store: Send + Sync {
    /// Read an integer slot. `None` if it was never written.
    fn get_slot(&self, key: &str) -> Result<Option<u64>>;

    /// Write an integer slot, replacing any previous value.
    fn put_slot(&self, key: &str, value: u64) -> Result<()>;

    /// Store snapshot bytes under `name`, replacing any previous snapshot.
    fn save_snapshot(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Load the snapshot stored under `name`.
    fn load_snapshot(&self, name: &str) -> Result<Option<Bytes>>;
}

/// Chain-level helpers over any [`Store`].
pub trait StoreExt: Store {
    /// Serialize `chain` and store it under `name`.
    fn save_chain(&self, name: &str, chain: &Blockchain) -> Result<()> {
        let bytes = chain.to_snapshot_bytes()?;
        self.save_snapshot(name, &bytes)?;
        debug!(name, blocks = chain.len(), bytes = bytes.len(), "saved chain snapshot");
        Ok(())
    }

    /// Load and validate the chain stored under `name`.
    fn load_chain(&self, name: &str, config: ChainConfig) -> Result<Option<Blockchain>> {
        match self.load_snapshot(name)? {
            Some(bytes) => Ok(Some(Blockchain::from_snapshot_bytes(config, &bytes)?)),
            None => Ok(None),
        }
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn get_slot(&self, key: &str) -> Result<Option<u64>> {
        (**self).get_slot(key)
    }

    fn put_slot(&self, key: &str, value: u64) -> Result<()> {
        (**self).put_slot(key, value)
    }

    fn save_snapshot(&self, name: &str, bytes: &[u8]) -> Result<()> {
        (**self).save_snapshot(name, bytes)
    }

    fn load_snapshot(&self, name: &str) -> Result<Option<Bytes>> {
        (**self).load_snapshot(name)
    }
}

//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

use crate::error::{Result, StoreError};
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    slots: HashMap<String, u64>,
    snapshots: HashMap<String, Bytes>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Store for MemoryStore {
    fn get_slot(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.read()?.slots.get(key).copied())
    }

    fn put_slot(&self, key: &str, value: u64) -> Result<()> {
        self.write()?.slots.insert(key.to_string(), value);
        Ok(())
    }

    fn save_snapshot(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.write()?
            .snapshots
            .insert(name.to_string(), Bytes::copy_from_slice(bytes));
        Ok(())
    }

    fn load_snapshot(&self, name: &str) -> Result<Option<Bytes>> {
        Ok(self.read()?.snapshots.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_slot("k").unwrap(), None);
        store.put_slot("k", 5).unwrap();
        assert_eq!(store.get_slot("k").unwrap(), Some(5));
        store.put_slot("k", 6).unwrap();
        assert_eq!(store.get_slot("k").unwrap(), Some(6));
        assert_eq!(store.get_slot("other").unwrap(), None);
    }

    #[test]
    fn test_snapshot_overwrite() {
        let store = MemoryStore::new();
        assert!(store.load_snapshot("main").unwrap().is_none());
        store.save_snapshot("main", b"one").unwrap();
        store.save_snapshot("main", b"two").unwrap();
        assert_eq!(store.load_snapshot("main").unwrap().unwrap().as_ref(), b"two");
    }
}

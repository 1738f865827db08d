//! Persisted sequence number allocation.
//!
//! The generator keeps the last value it handed out in a single store slot.
//! Each allocation is a read-modify-write of that slot.

use ledgerpost_core::{Minstd, SequenceNumber};
use tracing::{debug, error};

use crate::error::{Result, StoreError};
use crate::traits::Store;

/// Default slot holding the last allocated sequence number.
pub const SEQUENCE_SLOT: &str = "last-sequence";

/// Allocates unique sequence numbers, persisting the last one in a [`Store`].
pub struct SequenceGenerator<S> {
    store: S,
    slot: String,
    minstd: Minstd,
}

impl<S: Store> SequenceGenerator<S> {
    /// Generator using the standard parameters and the default slot.
    pub fn new(store: S) -> Self {
        Self::with_params(store, SEQUENCE_SLOT, Minstd::default())
    }

    pub fn with_params(store: S, slot: impl Into<String>, minstd: Minstd) -> Self {
        Self {
            store,
            slot: slot.into(),
            minstd,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// The last allocated value, if any.
    pub fn last(&self) -> Result<Option<SequenceNumber>> {
        Ok(self.store.get_slot(&self.slot)?.map(SequenceNumber))
    }

    /// Allocate the next sequence number.
    ///
    /// The first allocation on an empty slot returns the seed. Once the
    /// generator comes back around to the seed this fails with
    /// [`ledgerpost_core::SequenceError::Exhausted`] and the slot is left as it was.
    pub fn next(&self) -> Result<SequenceNumber> {
        let value = match self.last()? {
            None => self.minstd.seed(),
            Some(last) => self.minstd.next(last).map_err(|e| {
                error!(slot = %self.slot, last = %last, error = %e, "sequence allocation failed");
                StoreError::from(e)
            })?,
        };

        self.store.put_slot(&self.slot, value.value())?;
        debug!(slot = %self.slot, sequence = %value, "allocated sequence number");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::sqlite::SqliteStore;
    use ledgerpost_core::{SequenceError, MINSTD_SEED};
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_first_allocation_is_seed() {
        let gen = SequenceGenerator::new(MemoryStore::new());
        assert_eq!(gen.last().unwrap(), None);
        assert_eq!(gen.next().unwrap(), SequenceNumber(MINSTD_SEED));
        assert_eq!(gen.last().unwrap(), Some(SequenceNumber(MINSTD_SEED)));
        assert_eq!(gen.next().unwrap(), SequenceNumber(636679151));
        assert_eq!(gen.next().unwrap(), SequenceNumber(500825704));
    }

    #[test]
    fn test_exhaustion_leaves_slot_untouched() {
        let minstd = Minstd::with_params(3, 7, 1).unwrap();
        let gen = SequenceGenerator::with_params(MemoryStore::new(), "seq", minstd);

        let mut seen = HashSet::new();
        for _ in 0..6 {
            assert!(seen.insert(gen.next().unwrap()));
        }
        let before = gen.last().unwrap();

        let err = gen.next().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Sequence(SequenceError::Exhausted { seed: 1 })
        ));
        assert_eq!(gen.last().unwrap(), before);

        // Still exhausted on retry.
        assert!(gen.next().is_err());
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.db");

        let first = {
            let gen = SequenceGenerator::new(SqliteStore::open(&path).unwrap());
            gen.next().unwrap();
            gen.next().unwrap()
        };

        let gen = SequenceGenerator::new(SqliteStore::open(&path).unwrap());
        assert_eq!(gen.last().unwrap(), Some(first));
        assert_eq!(gen.next().unwrap(), SequenceNumber(500825704));
    }

    #[test]
    fn test_shared_store_uses_separate_slots() {
        let store = Arc::new(MemoryStore::new());
        let a = SequenceGenerator::with_params(store.clone(), "a", Minstd::default());
        let b = SequenceGenerator::with_params(store.clone(), "b", Minstd::default());
        assert_eq!(a.next().unwrap(), b.next().unwrap());
        a.next().unwrap();
        assert_ne!(a.last().unwrap(), b.last().unwrap());
    }

    #[test]
    fn test_corrupt_slot_reported() {
        let store = MemoryStore::new();
        store.put_slot(SEQUENCE_SLOT, 0).unwrap();
        let gen = SequenceGenerator::new(store);
        assert!(matches!(
            gen.next(),
            Err(StoreError::Sequence(SequenceError::OutOfRange { .. }))
        ));
    }
}

//! SQLite implementation of the Store trait.
//!
//! This is the durable storage backend. It uses rusqlite with bundled SQLite
//! behind a mutex; calls block the current thread.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use ledgerpost_core::now_millis;

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::Store;

/// SQLite-based store implementation.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Store for SqliteStore {
    fn get_slot(&self, key: &str) -> Result<Option<u64>> {
        let value: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|v| {
                u64::try_from(v).map_err(|_| {
                    StoreError::InvalidData(format!("slot {} holds negative value {}", key, v))
                })
            })
            .transpose()
    }

    fn put_slot(&self, key: &str, value: u64) -> Result<()> {
        let value = i64::try_from(value).map_err(|_| {
            StoreError::InvalidData(format!("slot value {} does not fit in SQLite INTEGER", value))
        })?;
        self.conn()?.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now_millis()],
        )?;
        Ok(())
    }

    fn save_snapshot(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO snapshots (name, bytes, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET bytes = excluded.bytes, saved_at = excluded.saved_at",
            params![name, bytes, now_millis()],
        )?;
        Ok(())
    }

    fn load_snapshot(&self, name: &str) -> Result<Option<Bytes>> {
        let bytes: Option<Vec<u8>> = self
            .conn()?
            .query_row(
                "SELECT bytes FROM snapshots WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(bytes.map(Bytes::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::StoreExt;
    use proptest::prelude::*;
    use ledgerpost_core::{Blockchain, ChainConfig, Payload};

    fn easy_config() -> ChainConfig {
        ChainConfig {
            difficulty: 1,
            ..ChainConfig::default()
        }
    }

    #[test]
    fn test_slot_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        assert_eq!(store.get_slot("last-sequence").unwrap(), None);
        store.put_slot("last-sequence", 36226479).unwrap();
        assert_eq!(store.get_slot("last-sequence").unwrap(), Some(36226479));
        store.put_slot("last-sequence", 636679151).unwrap();
        assert_eq!(store.get_slot("last-sequence").unwrap(), Some(636679151));
    }

    #[test]
    fn test_slot_value_too_large() {
        let store = SqliteStore::open_memory().unwrap();
        let err = store.put_slot("k", u64::MAX).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("party.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put_slot("last-sequence", 42).unwrap();
            store.save_snapshot("main", b"snapshot").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_slot("last-sequence").unwrap(), Some(42));
        assert_eq!(
            store.load_snapshot("main").unwrap().unwrap().as_ref(),
            b"snapshot"
        );
    }

    #[test]
    fn test_chain_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let mut chain = Blockchain::new(easy_config());
        chain.stage_transaction("A", "B", 1, Payload::marker("hi"));
        chain.mine("A");

        store.save_chain("main", &chain).unwrap();
        let loaded = store.load_chain("main", easy_config()).unwrap().unwrap();
        assert_eq!(loaded, chain);
        assert!(store.load_chain("missing", easy_config()).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_rejected() {
        let store = SqliteStore::open_memory().unwrap();
        store.save_snapshot("main", &[0xff, 0x00]).unwrap();
        let err = store.load_chain("main", easy_config()).unwrap_err();
        assert!(matches!(err, StoreError::Snapshot(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_sqlite_matches_memory(
            ops in prop::collection::vec(("[a-c]", 0u64..=i64::MAX as u64), 0..24),
        ) {
            let sqlite = SqliteStore::open_memory().unwrap();
            let memory = MemoryStore::new();
            for (key, value) in &ops {
                sqlite.put_slot(key, *value).unwrap();
                memory.put_slot(key, *value).unwrap();
            }
            for key in ["a", "b", "c"] {
                prop_assert_eq!(sqlite.get_slot(key).unwrap(), memory.get_slot(key).unwrap());
            }
        }
    }
}

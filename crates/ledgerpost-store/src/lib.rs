//! # Ledgerpost Store
//!
//! Durable storage for a Ledgerpost party: named integer slots (used by the
//! sequence number generator) and named chain snapshots.
//!
//! ## Key Types
//!
//! - [`Store`] - The storage trait
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`SequenceGenerator`] - Persisted sequence number allocation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ledgerpost_store::{SequenceGenerator, SqliteStore};
//!
//! let store = Arc::new(SqliteStore::open("party.db").unwrap());
//! let sequence = SequenceGenerator::new(store);
//! let first = sequence.next().unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Slots**: a slot holds one unsigned integer under a string key
//! - **Snapshots**: opaque bytes under a name; the last write wins

pub mod error;
pub mod memory;
pub mod migration;
pub mod sequence;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sequence::{SequenceGenerator, SEQUENCE_SLOT};
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreExt};

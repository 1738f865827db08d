//! # Ledgerpost
//!
//! Encrypted, signed messages carried in the transactions of a small
//! proof-of-work ledger.
//!
//! ## Overview
//!
//! A [`Party`] owns its identity keys, its copy of the ledger and a persisted
//! sequence number generator. It stages encrypted requests and replies as
//! transactions, mines them into blocks, and discovers messages addressed to
//! it by diffing its copy against a newer snapshot observed from a peer.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ledgerpost::{InfoRequest, Party, PartyConfig, SecretIdentity};
//! use ledgerpost::store::MemoryStore;
//!
//! let mut doctor = Party::open(
//!     "doctor",
//!     SecretIdentity::generate(),
//!     Arc::new(MemoryStore::new()),
//!     PartyConfig::default(),
//! )
//! .unwrap();
//! let mut specialist = Party::open(
//!     "specialist",
//!     SecretIdentity::generate(),
//!     Arc::new(MemoryStore::new()),
//!     PartyConfig::default(),
//! )
//! .unwrap();
//! doctor.add_contact(specialist.address().clone(), specialist.public_identity());
//! specialist.add_contact(doctor.address().clone(), doctor.public_identity());
//!
//! let request = InfoRequest {
//!     subject: "BloodTest".into(),
//!     patient_id: 1,
//!     practitioner_id: 2,
//!     reply_to: "10.0.0.1".into(),
//! };
//! doctor.send_request(specialist.address(), &request).unwrap();
//! doctor.mine().unwrap();
//!
//! let received = specialist.receive(doctor.snapshot()).unwrap();
//! assert_eq!(received.len(), 1);
//! ```
//!
//! ## Re-exports
//!
//! - `ledgerpost::core` - Ledger engine
//! - `ledgerpost::store` - Slot and snapshot storage
//! - `ledgerpost::codec` - Message codec
//! - `ledgerpost::sync` - Chain synchronizer

pub mod error;
pub mod miner;
pub mod party;

pub use ledgerpost_codec as codec;
pub use ledgerpost_core as core;
pub use ledgerpost_store as store;
pub use ledgerpost_sync as sync;

pub use error::{LedgerError, Result};
pub use miner::{mine_detached, DetachedMining};
pub use party::{
    Inbox, Party, PartyConfig, ReceivedMessage, RejectedMessage, DEFAULT_SNAPSHOT_NAME,
};

pub use ledgerpost_codec::{InfoRequest, KeyMaterial, PublicIdentity, SealedFile, SecretIdentity};
pub use ledgerpost_core::{
    Address, Block, Blockchain, CancelToken, ChainConfig, Payload, SequenceNumber, Transaction,
};

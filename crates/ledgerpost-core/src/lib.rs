//! # Ledgerpost Core
//!
//! The ledger engine: an append-only chain of blocks admitted by a
//! proof-of-work puzzle, plus the pure arithmetic behind sequence numbers.
//!
//! This crate performs no I/O. Persistence lives in `ledgerpost-store`,
//! message encryption in `ledgerpost-codec`, and snapshot diffing in
//! `ledgerpost-sync`.
//!
//! ## Key Types
//!
//! - [`Blockchain`] - A party's exclusively owned chain and pending buffer
//! - [`Block`] - A sealed batch of transactions linked by [`Sha256Hash`]
//! - [`Transaction`] - A transfer carrying a [`Payload`]
//! - [`Payload`] - Either a plain marker or a sequenced [`Envelope`]
//! - [`Minstd`] - The linear-congruential sequence number generator
//!
//! ## Canonicalization
//!
//! Block digests are computed over a versioned, deterministic CBOR encoding.
//! See the [`canonical`] module.
//!
//! ## Proof of work
//!
//! The puzzle hashes the decimal text of the previous block's nonce followed
//! by the candidate nonce. It is not bound to the new block's contents, so a
//! valid nonce can be found before the block's transactions are known. This
//! is a known weakness of the ledger format and is kept for compatibility
//! with existing chains.

pub mod block;
pub mod blockchain;
pub mod canonical;
pub mod error;
pub mod pow;
pub mod sequence;
pub mod transaction;
pub mod types;
pub mod validation;

pub use block::Block;
pub use blockchain::{now_millis, Blockchain, ChainConfig, MINING_MARKER, SYSTEM_SENDER};
pub use canonical::{canonical_block_bytes, canonical_transaction_bytes, BLOCK_DIGEST_DOMAIN};
pub use error::{CoreError, Result, SequenceError, ValidationError};
pub use pow::{
    proof_hash, solve, solve_cancellable, verify_proof, CancelToken, DEFAULT_DIFFICULTY,
    MAX_DIFFICULTY,
};
pub use sequence::{Minstd, MINSTD_MODULUS, MINSTD_MULTIPLIER, MINSTD_SEED};
pub use transaction::{Envelope, Payload, Transaction};
pub use types::{Address, SequenceNumber, Sha256Hash};
pub use validation::{check_validity, validate_chain};

//! Error types for the Ledgerpost core.

use thiserror::Error;

use crate::types::Sha256Hash;

/// Errors raised by the ledger engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The chain failed an integrity check.
    #[error("chain integrity error: {0}")]
    ChainIntegrity(#[from] ValidationError),

    /// A cancellable proof-of-work search was aborted before a nonce was found.
    #[error("mining of block {index} was aborted")]
    MiningAborted { index: u64 },

    #[error("invalid chain config: {0}")]
    InvalidConfig(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

/// Integrity failures between consecutive blocks, or in the chain's shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index} links to {got:?}, expected {expected:?}")]
    PreviousHashMismatch {
        index: u64,
        expected: Sha256Hash,
        got: Sha256Hash,
    },

    #[error("block {index} timestamp {current} is not after {previous}")]
    TimestampNotIncreasing {
        index: u64,
        previous: i64,
        current: i64,
    },

    #[error("block {index} nonce {nonce} does not solve the puzzle for previous nonce {last_nonce}")]
    InvalidProof {
        index: u64,
        last_nonce: u64,
        nonce: u64,
    },

    #[error("invalid block index: expected {expected}, got {got}")]
    IndexMismatch { expected: u64, got: u64 },

    #[error("chain has no genesis block")]
    EmptyChain,

    #[error("malformed genesis block: {0}")]
    MalformedGenesis(String),
}

/// Errors from sequence number arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The generator came back around to its seed: every value has been used.
    #[error("sequence space exhausted: generator returned to seed {seed}")]
    Exhausted { seed: u64 },

    /// A stored state is outside the generator's range `[1, modulus - 1]`.
    #[error("sequence state {state} is outside [1, {max}]")]
    OutOfRange { state: u64, max: u64 },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

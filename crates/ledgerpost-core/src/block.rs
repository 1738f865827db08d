//! Blocks: sealed batches of transactions.

use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_block_bytes, BLOCK_DIGEST_DOMAIN};
use crate::transaction::Transaction;
use crate::types::{Address, Sha256Hash};

/// A sealed block.
///
/// Blocks are immutable once appended to a chain. The fields are public so
/// that snapshots observed from elsewhere can be inspected, but a chain only
/// ever produces blocks through mining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub nonce: u64,
    pub previous_hash: Sha256Hash,
    pub data: Vec<Transaction>,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl Block {
    /// The genesis block: index 0, nonce 0, zero previous hash, no data.
    pub fn genesis(timestamp: i64) -> Self {
        Self {
            index: 0,
            nonce: 0,
            previous_hash: Sha256Hash::ZERO,
            data: Vec::new(),
            timestamp,
        }
    }

    /// Compute the block digest.
    ///
    /// `SHA-256(BLOCK_DIGEST_DOMAIN || canonical_block_bytes(self))`
    pub fn digest(&self) -> Sha256Hash {
        let mut input = BLOCK_DIGEST_DOMAIN.to_vec();
        input.extend_from_slice(&canonical_block_bytes(self));
        Sha256Hash::hash(&input)
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Transactions in this block addressed to `address`, in block order.
    pub fn transactions_for<'a>(
        &'a self,
        address: &'a Address,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.data
            .iter()
            .filter(move |tx| tx.is_addressed_to(address))
    }
}

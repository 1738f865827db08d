//! Chain integrity checks.
//!
//! Validation is pairwise: each block is checked against its predecessor.
//! The head block's own contents are not anchored until a successor links
//! to its digest.

use crate::block::Block;
use crate::error::ValidationError;
use crate::pow::verify_proof;

/// Check that `curr` is a valid successor of `prev`.
///
/// Rules are checked in this order: previous hash, timestamp, proof, index.
/// The first violated rule is reported.
pub fn check_validity(prev: &Block, curr: &Block, difficulty: u32) -> Result<(), ValidationError> {
    let expected = prev.digest();
    if curr.previous_hash != expected {
        return Err(ValidationError::PreviousHashMismatch {
            index: curr.index,
            expected,
            got: curr.previous_hash,
        });
    }

    if curr.timestamp <= prev.timestamp {
        return Err(ValidationError::TimestampNotIncreasing {
            index: curr.index,
            previous: prev.timestamp,
            current: curr.timestamp,
        });
    }

    if !verify_proof(prev.nonce, curr.nonce, difficulty) {
        return Err(ValidationError::InvalidProof {
            index: curr.index,
            last_nonce: prev.nonce,
            nonce: curr.nonce,
        });
    }

    let expected_index = prev.index.wrapping_add(1);
    if curr.index != expected_index {
        return Err(ValidationError::IndexMismatch {
            expected: expected_index,
            got: curr.index,
        });
    }

    Ok(())
}

/// Check a whole chain, returning the first failure.
///
/// The genesis block must be at index 0. A chain of length 1 is valid.
pub fn validate_chain(blocks: &[Block], difficulty: u32) -> Result<(), ValidationError> {
    let genesis = blocks.first().ok_or(ValidationError::EmptyChain)?;
    check_genesis(genesis)?;

    for pair in blocks.windows(2) {
        check_validity(&pair[0], &pair[1], difficulty)?;
    }
    Ok(())
}

/// Structural checks on a chain's first block.
pub(crate) fn check_genesis(genesis: &Block) -> Result<(), ValidationError> {
    if genesis.index != 0 {
        return Err(ValidationError::MalformedGenesis(format!(
            "index is {}, expected 0",
            genesis.index
        )));
    }
    Ok(())
}

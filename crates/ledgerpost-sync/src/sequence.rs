//! Locating correlation identifiers on the chain.

use ledgerpost_core::{Blockchain, SequenceNumber};

use crate::error::{Result, SyncError};

/// The sequence number of the most recent record payload on the chain.
///
/// Blocks are scanned newest first, and transactions within a block newest
/// first. Marker payloads are skipped.
pub fn find_last_sequence_number(chain: &Blockchain) -> Result<SequenceNumber> {
    chain
        .blocks()
        .iter()
        .rev()
        .flat_map(|block| block.data.iter().rev())
        .find_map(|tx| tx.message.sequence_number())
        .ok_or(SyncError::SequenceNotFound)
}

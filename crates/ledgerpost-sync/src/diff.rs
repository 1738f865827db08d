//! Snapshot diffing.

use ledgerpost_core::{Address, Block, Blockchain, Sha256Hash, Transaction};
use tracing::{debug, warn};

use crate::error::{Result, SyncError};

/// Result of comparing a local snapshot with an observed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// The observed blocks and pending buffer under the local config.
    /// Becomes the caller's new local copy.
    pub snapshot: Blockchain,
    /// Number of blocks the observed chain has beyond the local one.
    pub delta: usize,
    /// Transactions addressed to the party: newest block first, block order
    /// within each block.
    pub transactions: Vec<Transaction>,
}

/// Find transactions addressed to `address` that `observed` added over `local`.
///
/// `observed` is validated under `local`'s config, whatever config it
/// carries. Unless `local` holds only its genesis block, `observed` must
/// contain the local head at the same position.
///
/// When `observed` is longer by `delta` blocks, the last `delta` blocks are
/// scanned. When both have the same length only the head block is scanned.
pub fn sync(local: &Blockchain, observed: Blockchain, address: &Address) -> Result<SyncOutcome> {
    let observed = observed.reconfigured(local.config().clone());
    check_observed(&observed)?;

    let local_len = local.len();
    let observed_len = observed.len();
    if local_len > observed_len {
        warn!(local = local_len, observed = observed_len, "local chain is ahead of observed");
        return Err(SyncError::LocalAhead {
            local: local_len,
            observed: observed_len,
        });
    }
    ensure_extends(local, &observed)?;

    let delta = observed_len - local_len;
    let scan = delta.max(1);
    let transactions = collect_for(&observed.blocks()[observed_len - scan..], address);

    debug!(
        delta,
        scanned = scan,
        found = transactions.len(),
        address = %address,
        "synchronized by length"
    );
    Ok(SyncOutcome {
        snapshot: observed,
        delta,
        transactions,
    })
}

/// Find transactions addressed to `address` in every block after `cursor`.
///
/// `cursor` is the digest of the last block the party has already scanned.
/// `observed` is validated under its own config; rebuild it with
/// [`Blockchain::reconfigured`] first to apply local parameters.
pub fn sync_since(
    cursor: &Sha256Hash,
    observed: Blockchain,
    address: &Address,
) -> Result<SyncOutcome> {
    check_observed(&observed)?;

    let (position, _) = observed
        .block_by_hash(cursor)
        .ok_or(SyncError::UnknownCursor(*cursor))?;

    let after = &observed.blocks()[position + 1..];
    let delta = after.len();
    let transactions = collect_for(after, address);

    debug!(
        delta,
        found = transactions.len(),
        address = %address,
        "synchronized from cursor"
    );
    Ok(SyncOutcome {
        snapshot: observed,
        delta,
        transactions,
    })
}

fn check_observed(observed: &Blockchain) -> Result<()> {
    observed.validate_chain().map_err(|e| {
        warn!(error = %e, "rejecting observed chain");
        SyncError::InvalidObserved(e)
    })
}

/// Check that adopting `observed` keeps every block of `local`.
///
/// A genesis-only local chain holds nothing to lose and may be replaced by
/// any chain. Otherwise the local head must sit at the same position in
/// `observed`. Fails with [`SyncError::LocalAhead`] when `observed` is shorter.
pub fn ensure_extends(local: &Blockchain, observed: &Blockchain) -> Result<()> {
    let position = local.len() - 1;
    if position == 0 {
        return Ok(());
    }
    if observed.len() < local.len() {
        return Err(SyncError::LocalAhead {
            local: local.len(),
            observed: observed.len(),
        });
    }
    if observed.blocks()[position].digest() != local.head_hash() {
        warn!(index = position, "observed chain diverges from local chain");
        return Err(SyncError::Diverged {
            index: position as u64,
        });
    }
    Ok(())
}

/// Addressed transactions in `blocks`, newest block first and in block
/// order within each block.
fn collect_for(blocks: &[Block], address: &Address) -> Vec<Transaction> {
    blocks
        .iter()
        .rev()
        .flat_map(|block| block.transactions_for(address))
        .cloned()
        .collect()
}

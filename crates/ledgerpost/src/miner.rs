//! Mining off the caller's thread.

use tokio::task;
use tracing::debug;

use ledgerpost_core::{Address, Block, Blockchain, CancelToken, CoreError};

use crate::error::{LedgerError, Result};

/// A chain handed back from the blocking pool with the mining outcome.
#[derive(Debug)]
pub struct DetachedMining {
    pub chain: Blockchain,
    /// The sealed block, or [`CoreError::MiningAborted`] if `cancel` fired.
    /// On abort `chain` is exactly the chain that was passed in.
    pub outcome: std::result::Result<Block, CoreError>,
}

/// Run [`Blockchain::mine_cancellable`] on tokio's blocking pool.
///
/// The chain is moved onto the pool and returned in the result. Fails with
/// [`LedgerError::Task`] only if the blocking task itself panics, in which
/// case the chain is lost.
pub async fn mine_detached(
    mut chain: Blockchain,
    miner: Address,
    cancel: CancelToken,
) -> Result<DetachedMining> {
    debug!(miner = %miner, index = chain.len(), "starting detached mining");
    task::spawn_blocking(move || {
        let outcome = chain.mine_cancellable(miner, &cancel).cloned();
        DetachedMining { chain, outcome }
    })
    .await
    .map_err(|e| LedgerError::Task(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerpost_core::{ChainConfig, Payload};

    #[tokio::test]
    async fn test_mine_detached_seals_block() {
        let mut chain = Blockchain::new(ChainConfig {
            difficulty: 2,
            ..ChainConfig::default()
        });
        chain.stage_transaction("A", "B", 1, Payload::marker("hello"));

        let mined = mine_detached(chain, Address::from("A"), CancelToken::new())
            .await
            .unwrap();
        let block = mined.outcome.unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(block.data.len(), 2);
        assert_eq!(mined.chain.len(), 2);
        assert!(mined.chain.is_chain_valid());
    }

    #[tokio::test]
    async fn test_mine_detached_cancel() {
        let mut chain = Blockchain::new(ChainConfig {
            difficulty: 64,
            ..ChainConfig::default()
        });
        chain.stage_transaction("A", "B", 1, Payload::marker("kept"));
        let before = chain.clone();

        let cancel = CancelToken::new();
        let handle = tokio::spawn(mine_detached(chain, Address::from("A"), cancel.clone()));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        cancel.cancel();

        let mined = handle.await.unwrap().unwrap();
        assert!(matches!(
            mined.outcome,
            Err(CoreError::MiningAborted { index: 1 })
        ));
        assert_eq!(mined.chain, before);
    }
}

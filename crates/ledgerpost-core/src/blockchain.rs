//! The blockchain engine.
//!
//! A [`Blockchain`] is owned by exactly one party. It only grows through
//! [`Blockchain::mine`]; history is never rewritten.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::block::Block;
use crate::error::{CoreError, Result, ValidationError};
use crate::pow::{solve, solve_cancellable, CancelToken, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
use crate::transaction::{Payload, Transaction};
use crate::types::{Address, Sha256Hash};
use crate::validation::{check_genesis, check_validity, validate_chain};

/// Sender of the mining reward transaction.
pub const SYSTEM_SENDER: &str = "0";

/// Marker text carried by the mining reward transaction.
pub const MINING_MARKER: &str = "***Mining new block***";

/// Chain parameters, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Leading zero hex characters required of a proof digest, at most
    /// [`MAX_DIFFICULTY`].
    #[serde(deserialize_with = "deserialize_difficulty")]
    pub difficulty: u32,
    /// Quantity paid to the miner of each block.
    pub mining_reward: u64,
    pub system_sender: Address,
    pub mining_marker: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: 1,
            system_sender: Address::from(SYSTEM_SENDER),
            mining_marker: MINING_MARKER.to_string(),
        }
    }
}

impl ChainConfig {
    /// Reject parameters no chain could be mined under.
    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(CoreError::InvalidConfig(format!(
                "difficulty {} exceeds {}",
                self.difficulty, MAX_DIFFICULTY
            )));
        }
        Ok(())
    }
}

fn deserialize_difficulty<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let difficulty = u32::deserialize(deserializer)?;
    if difficulty > MAX_DIFFICULTY {
        return Err(serde::de::Error::custom(format!(
            "difficulty {} exceeds {}",
            difficulty, MAX_DIFFICULTY
        )));
    }
    Ok(difficulty)
}

/// Serialized form of a chain. Config is supplied again on load.
#[derive(Serialize, Deserialize)]
struct SnapshotRepr {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
}

/// An append-only chain of blocks plus a buffer of staged transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    config: ChainConfig,
}

impl Blockchain {
    /// Create a chain holding only a genesis block stamped with the current time.
    ///
    /// The config is trusted as given; mining never finishes above
    /// [`MAX_DIFFICULTY`]. Configs from outside should pass
    /// [`ChainConfig::validate`] first.
    pub fn new(config: ChainConfig) -> Self {
        Self::with_genesis(config, now_millis())
    }

    /// Create a chain whose genesis block has a fixed timestamp.
    pub fn with_genesis(config: ChainConfig, timestamp: i64) -> Self {
        Self {
            chain: vec![Block::genesis(timestamp)],
            pending: Vec::new(),
            config,
        }
    }

    /// Adopt a sequence of blocks obtained elsewhere.
    ///
    /// Only the shape is checked (non-empty, genesis at index 0). Call
    /// [`Blockchain::validate_chain`] before trusting the contents.
    pub fn from_blocks(config: ChainConfig, blocks: Vec<Block>) -> Result<Self> {
        config.validate()?;
        let genesis = blocks.first().ok_or(ValidationError::EmptyChain)?;
        check_genesis(genesis)?;
        Ok(Self {
            chain: blocks,
            pending: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// The same blocks and pending buffer under a different config.
    ///
    /// Used to judge a chain observed from a peer by local parameters
    /// rather than the ones it arrived with.
    pub fn reconfigured(self, config: ChainConfig) -> Self {
        Self { config, ..self }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false: a chain holds at least its genesis block.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn last_block(&self) -> &Block {
        // The constructors guarantee a genesis block.
        &self.chain[self.chain.len() - 1]
    }

    /// Digest of the most recent block.
    pub fn head_hash(&self) -> Sha256Hash {
        self.last_block().digest()
    }

    /// Position and block whose digest is `hash`, if any.
    pub fn block_by_hash(&self, hash: &Sha256Hash) -> Option<(usize, &Block)> {
        self.chain
            .iter()
            .enumerate()
            .find(|(_, block)| &block.digest() == hash)
    }

    /// Stage a transaction for the next block. Addressing is not validated.
    pub fn stage_transaction(
        &mut self,
        sender: impl Into<Address>,
        recipient: impl Into<Address>,
        quantity: u64,
        message: Payload,
    ) {
        let tx = Transaction::new(sender, recipient, quantity, message);
        debug!(
            sender = %tx.sender,
            recipient = %tx.recipient,
            pending = self.pending.len() + 1,
            "staged transaction"
        );
        self.pending.push(tx);
    }

    /// Solve the puzzle and seal the pending transactions into a new block.
    ///
    /// A reward transaction to `miner` is appended to the batch. Runs until
    /// a nonce is found.
    pub fn mine(&mut self, miner: impl Into<Address>) -> &Block {
        let nonce = solve(self.last_block().nonce, self.config.difficulty);
        self.seal(miner.into(), nonce)
    }

    /// Like [`Blockchain::mine`], but gives up when `cancel` is triggered.
    ///
    /// An aborted search leaves both the chain and the pending buffer as
    /// they were.
    pub fn mine_cancellable(
        &mut self,
        miner: impl Into<Address>,
        cancel: &CancelToken,
    ) -> Result<&Block> {
        let last_nonce = self.last_block().nonce;
        match solve_cancellable(last_nonce, self.config.difficulty, cancel) {
            Some(nonce) => Ok(self.seal(miner.into(), nonce)),
            None => {
                let index = self.chain.len() as u64;
                warn!(index, pending = self.pending.len(), "mining aborted");
                Err(CoreError::MiningAborted { index })
            }
        }
    }

    fn seal(&mut self, miner: Address, nonce: u64) -> &Block {
        let reward = Transaction::new(
            self.config.system_sender.clone(),
            miner,
            self.config.mining_reward,
            Payload::marker(self.config.mining_marker.clone()),
        );
        self.pending.push(reward);

        let previous_hash = self.head_hash();
        let timestamp = now_millis().max(self.last_block().timestamp + 1);
        let block = Block {
            index: self.chain.len() as u64,
            nonce,
            previous_hash,
            data: std::mem::take(&mut self.pending),
            timestamp,
        };

        info!(
            index = block.index,
            nonce = block.nonce,
            transactions = block.data.len(),
            "sealed block"
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Check that `curr` is a valid successor of `prev` under this chain's difficulty.
    pub fn check_validity(&self, prev: &Block, curr: &Block) -> bool {
        check_validity(prev, curr, self.config.difficulty).is_ok()
    }

    /// True when every consecutive pair of blocks is valid.
    pub fn is_chain_valid(&self) -> bool {
        self.validate_chain().is_ok()
    }

    /// Check every consecutive pair and report the first failure.
    pub fn validate_chain(&self) -> std::result::Result<(), ValidationError> {
        validate_chain(&self.chain, self.config.difficulty)
    }

    /// Serialize blocks and pending transactions with CBOR.
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>> {
        let repr = SnapshotRepr {
            blocks: self.chain.clone(),
            pending: self.pending.clone(),
        };
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&repr, &mut buf)
            .map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize and validate a snapshot.
    pub fn from_snapshot_bytes(config: ChainConfig, bytes: &[u8]) -> Result<Self> {
        let repr: SnapshotRepr =
            ciborium::de::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))?;
        let mut chain = Self::from_blocks(config, repr.blocks)?;
        chain.validate_chain()?;
        chain.pending = repr.pending;
        Ok(chain)
    }
}

/// Current time in Unix milliseconds. Clocks before the epoch read as 0.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

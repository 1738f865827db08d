//! Golden test vectors for deterministic verification.
//!
//! These pin the puzzle, the sequence generator and the block digest so
//! that any other implementation sharing a ledger can be checked against
//! them.

use ledgerpost_core::{
    proof_hash, solve, Block, Blockchain, ChainConfig, Minstd, Payload, Transaction,
    MINING_MARKER, SYSTEM_SENDER,
};

/// Genesis timestamp of [`golden_chain`] (2023-11-14T22:13:20Z).
pub const GOLDEN_GENESIS_TIMESTAMP: i64 = 1_700_000_000_000;

/// Hex digest of the genesis block stamped [`GOLDEN_GENESIS_TIMESTAMP`].
pub const GOLDEN_GENESIS_DIGEST: &str =
    "a22b35f250689310d14438aa1a112988519d70fbee97a1bce8017fab0a90b94b";

/// Hex digest of block 1 of [`golden_chain`].
pub const GOLDEN_BLOCK_1_DIGEST: &str =
    "bfaf2c5b989d9e5e9d333f4583de91e1c91ea30f1c14626bce9a00dd7356e48d";

/// A puzzle with its smallest solution.
#[derive(Debug, Clone)]
pub struct ProofVector {
    pub name: &'static str,
    pub last_nonce: u64,
    pub difficulty: u32,
    pub expected_nonce: u64,
    /// Hex of `SHA-256(decimal(last_nonce) ++ decimal(nonce))`, empty when not pinned.
    pub expected_hash: &'static str,
}

pub fn proof_vectors() -> Vec<ProofVector> {
    vec![
        ProofVector {
            name: "difficulty 0 accepts nonce 0",
            last_nonce: 99,
            difficulty: 0,
            expected_nonce: 0,
            expected_hash: "",
        },
        ProofVector {
            name: "difficulty 1 after genesis",
            last_nonce: 0,
            difficulty: 1,
            expected_nonce: 3,
            expected_hash: "",
        },
        ProofVector {
            name: "difficulty 2 after genesis",
            last_nonce: 0,
            difficulty: 2,
            expected_nonce: 563,
            expected_hash: "",
        },
        ProofVector {
            name: "difficulty 3 after genesis",
            last_nonce: 0,
            difficulty: 3,
            expected_nonce: 2832,
            expected_hash: "",
        },
        ProofVector {
            name: "first block at default difficulty",
            last_nonce: 0,
            difficulty: 4,
            expected_nonce: 69732,
            expected_hash: "0000e326186933fa83f0efd581d09409022ec07b73a10f549bbaa6472e8a1175",
        },
        ProofVector {
            name: "second block at default difficulty",
            last_nonce: 69732,
            difficulty: 4,
            expected_nonce: 23263,
            expected_hash: "0000ffc4b3bdbd6d46a4649d48944700b204fe59883f915fe1030f05c16a5492",
        },
    ]
}

/// First values drawn from a fresh default generator.
pub const SEQUENCE_PREFIX: [u64; 3] = [36226479, 636679151, 500825704];

/// A two-block chain with fixed timestamps: genesis, then a block holding
/// only the reward to `"doctor"` at nonce 69732.
pub fn golden_chain() -> Blockchain {
    let genesis = Block::genesis(GOLDEN_GENESIS_TIMESTAMP);
    let reward = Transaction::new(
        SYSTEM_SENDER,
        "doctor",
        ChainConfig::default().mining_reward,
        Payload::marker(MINING_MARKER),
    );
    let first = Block {
        index: 1,
        nonce: 69732,
        previous_hash: genesis.digest(),
        data: vec![reward],
        timestamp: GOLDEN_GENESIS_TIMESTAMP + 1000,
    };
    Blockchain::from_blocks(ChainConfig::default(), vec![genesis, first])
        .expect("golden genesis is well formed")
}

/// Check every vector, returning `(name, matches, computed)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results: Vec<(String, bool, String)> = proof_vectors()
        .iter()
        .map(|v| {
            let nonce = solve(v.last_nonce, v.difficulty);
            let hash = proof_hash(v.last_nonce, nonce).to_hex();
            let matches = nonce == v.expected_nonce
                && (v.expected_hash.is_empty() || hash == v.expected_hash);
            (v.name.to_string(), matches, format!("{} {}", nonce, hash))
        })
        .collect();

    let minstd = Minstd::default();
    let mut state = minstd.seed();
    let mut drawn = vec![state.value()];
    for _ in 1..SEQUENCE_PREFIX.len() {
        match minstd.next(state) {
            Ok(next) => {
                state = next;
                drawn.push(next.value());
            }
            Err(_) => break,
        }
    }
    results.push((
        "sequence prefix".to_string(),
        drawn == SEQUENCE_PREFIX,
        format!("{:?}", drawn),
    ));

    let chain = golden_chain();
    for (block, expected) in chain
        .blocks()
        .iter()
        .zip([GOLDEN_GENESIS_DIGEST, GOLDEN_BLOCK_1_DIGEST])
    {
        let digest = block.digest().to_hex();
        results.push((
            format!("block {} digest", block.index),
            digest == expected,
            digest,
        ));
    }

    results
}

//! The proof-of-work puzzle.
//!
//! A nonce `n` solves the puzzle for a previous nonce `p` when
//! `SHA-256(text(p) || text(n))` renders in hex with at least `difficulty`
//! leading `'0'` characters. `text` is the plain decimal rendering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::types::Sha256Hash;

/// Leading zero hex characters required by default.
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// A SHA-256 digest has 64 hex characters, so no higher difficulty can be met.
pub const MAX_DIFFICULTY: u32 = 64;

/// How many candidates the cancellable search tries between token polls.
const CANCEL_POLL_INTERVAL: u64 = 256;

/// Compute the puzzle digest for a candidate.
pub fn proof_hash(last_nonce: u64, nonce: u64) -> Sha256Hash {
    let guess = format!("{}{}", last_nonce, nonce);
    Sha256Hash::hash(guess.as_bytes())
}

/// Check whether `nonce` solves the puzzle for `last_nonce`.
pub fn verify_proof(last_nonce: u64, nonce: u64, difficulty: u32) -> bool {
    proof_hash(last_nonce, nonce).leading_zero_nibbles() >= difficulty
}

/// Find the smallest nonce that solves the puzzle for `last_nonce`.
pub fn solve(last_nonce: u64, difficulty: u32) -> u64 {
    let mut nonce = 0u64;
    while !verify_proof(last_nonce, nonce, difficulty) {
        nonce += 1;
    }
    nonce
}

/// Like [`solve`], but returns `None` once `cancel` has been triggered.
///
/// The token is checked before the first candidate and then every
/// `CANCEL_POLL_INTERVAL` candidates.
pub fn solve_cancellable(last_nonce: u64, difficulty: u32, cancel: &CancelToken) -> Option<u64> {
    let mut nonce = 0u64;
    loop {
        if nonce % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
            return None;
        }
        if verify_proof(last_nonce, nonce, difficulty) {
            return Some(nonce);
        }
        nonce += 1;
    }
}

/// A shareable flag used to abort an in-flight search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_solutions() {
        assert_eq!(solve(0, 1), 3);
        assert_eq!(solve(0, 2), 563);
        assert_eq!(solve(0, 3), 2832);
        assert_eq!(solve(0, 4), 69732);
        assert_eq!(solve(69732, 4), 23263);
    }

    #[test]
    fn test_solution_is_minimal() {
        let n = solve(0, 3);
        for candidate in 0..n {
            assert!(!verify_proof(0, candidate, 3));
        }
        assert!(verify_proof(0, n, 3));
    }

    #[test]
    fn test_proof_hash_concatenates_decimal_text() {
        assert_eq!(proof_hash(12, 34), Sha256Hash::hash(b"1234"));
        assert_eq!(proof_hash(1, 234), proof_hash(12, 34));
    }

    #[test]
    fn test_difficulty_zero_accepts_anything() {
        assert_eq!(solve(99, 0), 0);
    }

    #[test]
    fn test_cancelled_search_returns_none() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(solve_cancellable(0, 64, &token), None);
    }

    #[test]
    fn test_uncancelled_search_matches_solve() {
        let token = CancelToken::new();
        assert_eq!(solve_cancellable(0, 3, &token), Some(solve(0, 3)));
    }

    #[test]
    fn test_token_clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let token = CancelToken::new();
        let remote = token.clone();
        let handle = std::thread::spawn(move || solve_cancellable(0, 64, &remote));
        token.cancel();
        assert_eq!(handle.join().unwrap(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_solve_finds_smallest(last_nonce in any::<u64>(), difficulty in 0u32..=2) {
            let nonce = solve(last_nonce, difficulty);
            prop_assert!(verify_proof(last_nonce, nonce, difficulty));
            prop_assert!((0..nonce).all(|n| !verify_proof(last_nonce, n, difficulty)));
            prop_assert_eq!(
                solve_cancellable(last_nonce, difficulty, &CancelToken::new()),
                Some(nonce)
            );
        }
    }
}

//! # Ledgerpost Testkit
//!
//! Testing utilities for Ledgerpost.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known proofs, sequence values and block digests
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic parties wired up as each other's contacts
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ledgerpost_testkit::vectors::{golden_chain, verify_all_vectors};
//!
//! for (name, ok, got) in verify_all_vectors() {
//!     assert!(ok, "{}: {}", name, got);
//! }
//! assert!(golden_chain().is_chain_valid());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledgerpost_testkit::generators::{chain_from_shape, chain_shape};
//!
//! proptest! {
//!     #[test]
//!     fn mined_chains_validate(shape in chain_shape()) {
//!         prop_assert!(chain_from_shape(&shape).is_chain_valid());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ledgerpost_testkit::fixtures::connected_parties;
//!
//! let parties = connected_parties(&["doctor", "specialist"]);
//! assert_eq!(parties.len(), 2);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{connected_parties, fast_config, identity_for, PartyFixture};
pub use generators::{chain_from_shape, ChainShape};
pub use vectors::{golden_chain, verify_all_vectors, ProofVector, GOLDEN_GENESIS_TIMESTAMP};

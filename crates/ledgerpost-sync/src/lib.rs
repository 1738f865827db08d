//! # Ledgerpost Sync
//!
//! Read-only comparison of two independently held copies of the same
//! ledger. A party keeps the snapshot it last looked at; when it observes a
//! newer copy it asks which transactions addressed to it were added since.
//!
//! ## Strategies
//!
//! - [`sync`] compares chain lengths. It assumes a single writer and a
//!   ledger that never forks, and refuses an observed chain that does not
//!   contain the local head. When the lengths are equal it rescans the head
//!   block, so a caller may see the same transactions twice.
//! - [`sync_since`] resumes from the digest of the last block the party
//!   has seen. It does not depend on lengths.
//!
//! Neither strategy mutates the observed snapshot; it is handed back in the
//! [`SyncOutcome`] so the caller can keep it as its new local copy.

pub mod diff;
pub mod error;
pub mod sequence;

pub use diff::{ensure_extends, sync, sync_since, SyncOutcome};
pub use error::{Result, SyncError};
pub use sequence::find_last_sequence_number;

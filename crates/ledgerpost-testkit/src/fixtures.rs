//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use ledgerpost::{InfoRequest, Party, PartyConfig};
use ledgerpost_codec::SecretIdentity;
use ledgerpost_core::ChainConfig;
use ledgerpost_store::MemoryStore;

/// Party configuration with difficulty 1 so tests mine instantly.
pub fn fast_config() -> PartyConfig {
    PartyConfig {
        chain: ChainConfig {
            difficulty: 1,
            ..ChainConfig::default()
        },
        ..PartyConfig::default()
    }
}

/// A deterministic identity for the `index`-th party.
pub fn identity_for(index: u8) -> SecretIdentity {
    let mut signing = [0u8; 32];
    signing[0] = index;
    let mut encryption = [0xe0u8; 32];
    encryption[0] = index;
    SecretIdentity::from_seeds(&signing, encryption)
}

/// A party backed by an in-memory store.
pub struct PartyFixture {
    pub party: Party<MemoryStore>,
    pub store: Arc<MemoryStore>,
}

impl PartyFixture {
    pub fn new(address: &str, index: u8) -> Self {
        Self::with_config(address, index, fast_config())
    }

    pub fn with_config(address: &str, index: u8, config: PartyConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let party = Party::open(address, identity_for(index), store.clone(), config)
            .expect("empty memory store cannot fail to open");
        Self { party, store }
    }

    /// Make `self` and `other` each other's contacts.
    pub fn introduce(&mut self, other: &mut PartyFixture) {
        self.party
            .add_contact(other.party.address().clone(), other.party.public_identity());
        other
            .party
            .add_contact(self.party.address().clone(), self.party.public_identity());
    }
}

/// Parties with deterministic identities, every one a contact of every other.
pub fn connected_parties(addresses: &[&str]) -> Vec<Party<MemoryStore>> {
    let mut fixtures: Vec<PartyFixture> = addresses
        .iter()
        .enumerate()
        .map(|(i, address)| PartyFixture::new(address, i as u8))
        .collect();

    for i in 0..fixtures.len() {
        let (head, tail) = fixtures.split_at_mut(i + 1);
        for other in tail {
            head[i].introduce(other);
        }
    }

    fixtures.into_iter().map(|f| f.party).collect()
}

/// A blood test request from a fixed practitioner.
pub fn sample_request() -> InfoRequest {
    InfoRequest {
        subject: "BloodTest".to_string(),
        patient_id: 2147483647,
        practitioner_id: 48271,
        reply_to: "192.168.0.22".to_string(),
    }
}

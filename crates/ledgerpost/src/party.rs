//! A ledger participant.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ledgerpost_codec::{
    decode_key_exchange, decode_request, encode_key_exchange, encode_request, InfoRequest,
    KeyMaterial, PublicIdentity, SecretIdentity,
};
use ledgerpost_core::{
    Address, Block, Blockchain, ChainConfig, CoreError, Envelope, Payload, SequenceNumber,
};
use ledgerpost_store::{SequenceGenerator, Store, StoreExt, SEQUENCE_SLOT};
use ledgerpost_sync::{ensure_extends, find_last_sequence_number, sync};

use crate::error::{LedgerError, Result};

/// Name under which a party persists its copy of the ledger.
pub const DEFAULT_SNAPSHOT_NAME: &str = "ledger";

/// Configuration for a [`Party`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyConfig {
    pub chain: ChainConfig,
    /// Store slot holding the last allocated sequence number.
    pub sequence_slot: String,
    pub snapshot_name: String,
    /// Quantity attached to each message transaction.
    pub message_quantity: u64,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            sequence_slot: SEQUENCE_SLOT.to_string(),
            snapshot_name: DEFAULT_SNAPSHOT_NAME.to_string(),
            message_quantity: 1,
        }
    }
}

/// A decoded message addressed to this party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub sender: Address,
    pub sequence_number: SequenceNumber,
    pub fields: Vec<String>,
    envelope: Envelope,
}

impl ReceivedMessage {
    /// Interpret the fields as an information request.
    pub fn as_info_request(&self) -> Result<InfoRequest> {
        Ok(InfoRequest::from_fields(&self.fields)?)
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

/// A record addressed to this party that could not be opened.
#[derive(Debug)]
pub struct RejectedMessage {
    pub sender: Address,
    pub sequence_number: SequenceNumber,
    pub error: LedgerError,
}

/// Messages found by one call to [`Party::receive`].
#[derive(Debug, Default)]
pub struct Inbox {
    /// Newest block first, block order within each block.
    pub messages: Vec<ReceivedMessage>,
    /// Same order as `messages`.
    pub rejected: Vec<RejectedMessage>,
}

impl Inbox {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// A participant: identity keys, a copy of the ledger, and a sequence generator.
pub struct Party<S: Store> {
    address: Address,
    identity: SecretIdentity,
    chain: Blockchain,
    sequence: SequenceGenerator<Arc<S>>,
    store: Arc<S>,
    contacts: HashMap<Address, PublicIdentity>,
    config: PartyConfig,
}

impl<S: Store> Party<S> {
    /// Open a party, resuming its ledger copy from `store` if one was saved.
    pub fn open(
        address: impl Into<Address>,
        identity: SecretIdentity,
        store: Arc<S>,
        config: PartyConfig,
    ) -> Result<Self> {
        let address = address.into();
        config.chain.validate()?;
        let chain = match store.load_chain(&config.snapshot_name, config.chain.clone())? {
            Some(chain) => {
                info!(address = %address, blocks = chain.len(), "resumed ledger copy");
                chain
            }
            None => Blockchain::new(config.chain.clone()),
        };
        let sequence = SequenceGenerator::with_params(
            store.clone(),
            config.sequence_slot.clone(),
            Default::default(),
        );

        Ok(Self {
            address,
            identity,
            chain,
            sequence,
            store,
            contacts: HashMap::new(),
            config,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_identity(&self) -> PublicIdentity {
        self.identity.public()
    }

    pub fn chain(&self) -> &Blockchain {
        &self.chain
    }

    pub fn config(&self) -> &PartyConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register the public identity of a peer.
    pub fn add_contact(&mut self, address: Address, identity: PublicIdentity) {
        self.contacts.insert(address, identity);
    }

    fn contact(&self, address: &Address) -> Result<&PublicIdentity> {
        self.contacts
            .get(address)
            .ok_or_else(|| LedgerError::UnknownPeer(address.clone()))
    }

    /// Stage an encrypted information request to `recipient`.
    ///
    /// Allocates a fresh sequence number, which is returned.
    pub fn send_request(
        &mut self,
        recipient: &Address,
        request: &InfoRequest,
    ) -> Result<SequenceNumber> {
        let recipient_identity = *self.contact(recipient)?;
        let sequence_number = self.sequence.next()?;
        let payload = encode_request(
            sequence_number,
            &request.to_fields(),
            &recipient_identity,
            &self.identity,
        )?;
        self.chain.stage_transaction(
            self.address.clone(),
            recipient.clone(),
            self.config.message_quantity,
            payload,
        );
        info!(to = %recipient, sequence = %sequence_number, "staged request");
        Ok(sequence_number)
    }

    /// Stage the key material for a sealed file as a reply to `recipient`.
    ///
    /// The reply reuses the most recent sequence number on the ledger so the
    /// requester can correlate it with the request.
    pub fn send_key_exchange(
        &mut self,
        recipient: &Address,
        material: &KeyMaterial,
    ) -> Result<SequenceNumber> {
        let recipient_identity = *self.contact(recipient)?;
        let sequence_number = find_last_sequence_number(&self.chain)?;
        let payload = encode_key_exchange(
            sequence_number,
            &material.key,
            &material.tag,
            &material.nonce,
            &recipient_identity,
            &self.identity,
        )?;
        self.chain.stage_transaction(
            self.address.clone(),
            recipient.clone(),
            self.config.message_quantity,
            payload,
        );
        info!(to = %recipient, sequence = %sequence_number, "staged key exchange");
        Ok(sequence_number)
    }

    /// Seal staged transactions into a block and persist the ledger copy.
    pub fn mine(&mut self) -> Result<Block> {
        let block = self.chain.mine(self.address.clone()).clone();
        self.persist()?;
        Ok(block)
    }

    /// Replace the local copy, pending buffer included, with a chain mined
    /// from this party's snapshot, e.g. by [`crate::mine_detached`].
    ///
    /// The chain is judged by this party's config and must keep every
    /// local block.
    pub fn adopt(&mut self, chain: Blockchain) -> Result<()> {
        let chain = chain.reconfigured(self.config.chain.clone());
        chain.validate_chain().map_err(CoreError::from)?;
        ensure_extends(&self.chain, &chain)?;
        self.chain = chain;
        self.persist()
    }

    /// Find, decode and verify every message addressed to this party in
    /// `observed` that is newer than the local copy.
    ///
    /// An invalid or diverging `observed` is an error and leaves the local
    /// copy unchanged. Otherwise `observed` becomes the local copy, and each
    /// record that fails to open is reported in [`Inbox::rejected`] next to
    /// the ones that did.
    pub fn receive(&mut self, observed: Blockchain) -> Result<Inbox> {
        let outcome = sync(&self.chain, observed, &self.address)?;

        let mut inbox = Inbox::default();
        for tx in &outcome.transactions {
            let Payload::Record {
                sequence_number,
                data: envelope,
            } = &tx.message
            else {
                continue;
            };
            match self.open_record(&tx.sender, envelope) {
                Ok(fields) => inbox.messages.push(ReceivedMessage {
                    sender: tx.sender.clone(),
                    sequence_number: *sequence_number,
                    fields,
                    envelope: envelope.clone(),
                }),
                Err(error) => {
                    warn!(
                        from = %tx.sender,
                        sequence = %sequence_number,
                        error = %error,
                        "rejected message"
                    );
                    inbox.rejected.push(RejectedMessage {
                        sender: tx.sender.clone(),
                        sequence_number: *sequence_number,
                        error,
                    });
                }
            }
        }

        debug!(
            address = %self.address,
            delta = outcome.delta,
            messages = inbox.messages.len(),
            rejected = inbox.rejected.len(),
            "received messages"
        );
        self.replace_chain(outcome.snapshot);
        self.persist()?;
        Ok(inbox)
    }

    fn open_record(&self, sender: &Address, envelope: &Envelope) -> Result<Vec<String>> {
        let sender_identity = self.contact(sender)?;
        Ok(decode_request(envelope, sender_identity, &self.identity)?)
    }

    /// Decode a received key-exchange message into key material.
    pub fn open_key_exchange(&self, message: &ReceivedMessage) -> Result<KeyMaterial> {
        let sender_identity = self.contact(&message.sender)?;
        Ok(decode_key_exchange(
            &message.envelope,
            sender_identity,
            &self.identity,
        )?)
    }

    /// A copy of this party's ledger, as a peer would observe it.
    pub fn snapshot(&self) -> Blockchain {
        self.chain.clone()
    }

    fn replace_chain(&mut self, chain: Blockchain) {
        let pending = self.chain.pending().to_vec();
        self.chain = chain;
        for tx in pending {
            self.chain
                .stage_transaction(tx.sender, tx.recipient, tx.quantity, tx.message);
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save_chain(&self.config.snapshot_name, &self.chain)?;
        Ok(())
    }
}

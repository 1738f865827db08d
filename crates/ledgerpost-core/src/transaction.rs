//! Transactions and their payloads.
//!
//! The engine treats a payload as a tagged value and never looks inside an
//! envelope. Framing, signing and encryption belong to `ledgerpost-codec`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::{Address, SequenceNumber};

/// The opaque wire form of an encrypted, signed message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(pub Bytes);

impl Envelope {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Application content carried by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Plain annotation, e.g. the mining reward marker.
    Marker(String),

    /// A sequenced message produced by the codec.
    Record {
        sequence_number: SequenceNumber,
        data: Envelope,
    },
}

impl Payload {
    pub fn marker(text: impl Into<String>) -> Self {
        Payload::Marker(text.into())
    }

    pub fn record(sequence_number: SequenceNumber, data: Envelope) -> Self {
        Payload::Record {
            sequence_number,
            data,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Payload::Record { .. })
    }

    /// The sequence number, if this is a record.
    pub fn sequence_number(&self) -> Option<SequenceNumber> {
        match self {
            Payload::Record {
                sequence_number, ..
            } => Some(*sequence_number),
            Payload::Marker(_) => None,
        }
    }

    /// The envelope, if this is a record.
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Payload::Record { data, .. } => Some(data),
            Payload::Marker(_) => None,
        }
    }
}

/// A transfer between two addresses. Immutable once sealed into a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Address,
    pub recipient: Address,
    pub quantity: u64,
    pub message: Payload,
}

impl Transaction {
    pub fn new(
        sender: impl Into<Address>,
        recipient: impl Into<Address>,
        quantity: u64,
        message: Payload,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            quantity,
            message,
        }
    }

    /// Check whether this transaction is addressed to `address`.
    pub fn is_addressed_to(&self, address: &Address) -> bool {
        &self.recipient == address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_tags() {
        let marker = Payload::marker("hello");
        assert!(!marker.is_record());
        assert_eq!(marker.sequence_number(), None);
        assert!(marker.envelope().is_none());

        let record = Payload::record(SequenceNumber(42), Envelope::from_bytes(b"abc".to_vec()));
        assert!(record.is_record());
        assert_eq!(record.sequence_number(), Some(SequenceNumber(42)));
        assert_eq!(record.envelope().unwrap().as_bytes(), b"abc");
    }

    #[test]
    fn test_addressed_to() {
        let tx = Transaction::new("A", "B", 1, Payload::marker("x"));
        assert!(tx.is_addressed_to(&Address::from("B")));
        assert!(!tx.is_addressed_to(&Address::from("A")));
    }

    #[test]
    fn test_transaction_json_shape() {
        let tx = Transaction::new("A", "B", 3, Payload::marker("note"));
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["sender"], "A");
        assert_eq!(json["recipient"], "B");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["message"]["Marker"], "note");
    }
}

//! Canonical CBOR encoding for block digests.
//!
//! Implements the subset of RFC 8949 Core Deterministic Encoding the ledger
//! needs:
//! - Map keys are small unsigned integers, emitted in ascending order
//! - Integers use the smallest valid encoding
//! - Definite lengths only
//! - No floats (quantities are u64, timestamps are i64 milliseconds)
//!
//! The digest input is `BLOCK_DIGEST_DOMAIN || canonical_block_bytes(block)`.
//! Any change to the layout below must bump the version in the domain tag.

use crate::block::Block;
use crate::transaction::{Payload, Transaction};

/// Domain separation prefix for block digests.
pub const BLOCK_DIGEST_DOMAIN: &[u8] = b"ledgerpost/block/v1";

/// Block field keys.
mod block_keys {
    pub const INDEX: u64 = 0;
    pub const NONCE: u64 = 1;
    pub const PREVIOUS_HASH: u64 = 2;
    pub const DATA: u64 = 3;
    pub const TIMESTAMP: u64 = 4;
}

/// Transaction field keys.
mod tx_keys {
    pub const SENDER: u64 = 0;
    pub const RECIPIENT: u64 = 1;
    pub const QUANTITY: u64 = 2;
    pub const PAYLOAD: u64 = 3;
}

/// Payload field keys. Key 0 always carries the variant tag.
mod payload_keys {
    pub const TAG: u64 = 0;
    pub const MARKER_TEXT: u64 = 1;
    pub const RECORD_SEQUENCE: u64 = 1;
    pub const RECORD_ENVELOPE: u64 = 2;

    pub const TAG_MARKER: u64 = 0;
    pub const TAG_RECORD: u64 = 1;
}

/// The value shapes that can appear in a digest input.
///
/// Narrower than a general CBOR value: there is no float or tag variant, so
/// encoding is total.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CanonicalValue<'a> {
    Uint(u64),
    Int(i64),
    Bytes(&'a [u8]),
    Text(&'a str),
    Array(Vec<CanonicalValue<'a>>),
    Map(Vec<(u64, CanonicalValue<'a>)>),
}

/// Encode a block to canonical CBOR bytes (without the domain prefix).
pub fn canonical_block_bytes(block: &Block) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);
    encode_value_to(&mut buf, &block_to_value(block));
    buf
}

/// Encode a single transaction to canonical CBOR bytes.
pub fn canonical_transaction_bytes(tx: &Transaction) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    encode_value_to(&mut buf, &transaction_to_value(tx));
    buf
}

fn block_to_value(block: &Block) -> CanonicalValue<'_> {
    CanonicalValue::Map(vec![
        (block_keys::INDEX, CanonicalValue::Uint(block.index)),
        (block_keys::NONCE, CanonicalValue::Uint(block.nonce)),
        (
            block_keys::PREVIOUS_HASH,
            CanonicalValue::Bytes(block.previous_hash.as_bytes()),
        ),
        (
            block_keys::DATA,
            CanonicalValue::Array(block.data.iter().map(transaction_to_value).collect()),
        ),
        (block_keys::TIMESTAMP, CanonicalValue::Int(block.timestamp)),
    ])
}

fn transaction_to_value(tx: &Transaction) -> CanonicalValue<'_> {
    CanonicalValue::Map(vec![
        (tx_keys::SENDER, CanonicalValue::Text(tx.sender.as_str())),
        (tx_keys::RECIPIENT, CanonicalValue::Text(tx.recipient.as_str())),
        (tx_keys::QUANTITY, CanonicalValue::Uint(tx.quantity)),
        (tx_keys::PAYLOAD, payload_to_value(&tx.message)),
    ])
}

fn payload_to_value(payload: &Payload) -> CanonicalValue<'_> {
    match payload {
        Payload::Marker(text) => CanonicalValue::Map(vec![
            (payload_keys::TAG, CanonicalValue::Uint(payload_keys::TAG_MARKER)),
            (payload_keys::MARKER_TEXT, CanonicalValue::Text(text)),
        ]),
        Payload::Record {
            sequence_number,
            data,
        } => CanonicalValue::Map(vec![
            (payload_keys::TAG, CanonicalValue::Uint(payload_keys::TAG_RECORD)),
            (
                payload_keys::RECORD_SEQUENCE,
                CanonicalValue::Uint(sequence_number.value()),
            ),
            (
                payload_keys::RECORD_ENVELOPE,
                CanonicalValue::Bytes(data.as_bytes()),
            ),
        ]),
    }
}

/// Recursively encode a value.
fn encode_value_to(buf: &mut Vec<u8>, value: &CanonicalValue<'_>) {
    match value {
        CanonicalValue::Uint(n) => encode_uint(buf, 0, *n),
        CanonicalValue::Int(n) => encode_int(buf, *n),
        CanonicalValue::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        CanonicalValue::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        CanonicalValue::Array(items) => {
            encode_uint(buf, 4, items.len() as u64);
            for item in items {
                encode_value_to(buf, item);
            }
        }
        CanonicalValue::Map(entries) => encode_map_canonical(buf, entries),
    }
}

/// Encode a map with its keys in ascending order.
///
/// For unsigned keys the deterministic byte order and numeric order agree:
/// a shorter head always sorts first and equal-length heads are big-endian.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(u64, CanonicalValue<'_>)]) {
    let mut sorted: Vec<&(u64, CanonicalValue<'_>)> = entries.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    encode_uint(buf, 5, sorted.len() as u64);
    for (key, value) in sorted {
        encode_uint(buf, 0, *key);
        encode_value_to(buf, value);
    }
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Envelope;
    use crate::types::{SequenceNumber, Sha256Hash};
    use ciborium::value::Value;

    fn genesis() -> Block {
        Block {
            index: 0,
            nonce: 0,
            previous_hash: Sha256Hash::ZERO,
            data: Vec::new(),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_encode_uint_smallest_form() {
        let cases: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (23, &[0x17]),
            (24, &[0x18, 0x18]),
            (255, &[0x18, 0xff]),
            (256, &[0x19, 0x01, 0x00]),
            (65536, &[0x1a, 0x00, 0x01, 0x00, 0x00]),
            (1 << 32, &[0x1b, 0, 0, 0, 1, 0, 0, 0, 0]),
        ];
        for (n, expected) in cases {
            let mut buf = Vec::new();
            encode_uint(&mut buf, 0, *n);
            assert_eq!(&buf, expected, "encoding of {}", n);
        }
    }

    #[test]
    fn test_encode_negative_int() {
        let mut buf = Vec::new();
        encode_int(&mut buf, -1);
        assert_eq!(buf, vec![0x20]);

        let mut buf = Vec::new();
        encode_int(&mut buf, -500);
        assert_eq!(buf, vec![0x39, 0x01, 0xf3]);
    }

    #[test]
    fn test_map_keys_sorted_regardless_of_input_order() {
        let a = CanonicalValue::Map(vec![
            (1, CanonicalValue::Uint(1)),
            (0, CanonicalValue::Uint(0)),
        ]);
        let b = CanonicalValue::Map(vec![
            (0, CanonicalValue::Uint(0)),
            (1, CanonicalValue::Uint(1)),
        ]);
        let mut ba = Vec::new();
        let mut bb = Vec::new();
        encode_value_to(&mut ba, &a);
        encode_value_to(&mut bb, &b);
        assert_eq!(ba, bb);
        assert_eq!(ba, vec![0xa2, 0x00, 0x00, 0x01, 0x01]);
    }

    #[test]
    fn test_block_bytes_are_valid_cbor() {
        let mut block = genesis();
        block.data.push(Transaction::new(
            "A",
            "B",
            1,
            Payload::record(SequenceNumber(36226479), Envelope::from_bytes(vec![1, 2, 3])),
        ));
        let bytes = canonical_block_bytes(&block);

        let value: Value = ciborium::de::from_reader(bytes.as_slice()).unwrap();
        let entries = value.as_map().unwrap();
        assert_eq!(entries.len(), 5);

        let prev = entries[2].1.as_bytes().unwrap();
        assert_eq!(prev.as_slice(), &[0u8; 32]);

        let data = entries[3].1.as_array().unwrap();
        assert_eq!(data.len(), 1);
        let tx = data[0].as_map().unwrap();
        assert_eq!(tx[0].1.as_text(), Some("A"));
        assert_eq!(tx[1].1.as_text(), Some("B"));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let block = genesis();
        assert_eq!(canonical_block_bytes(&block), canonical_block_bytes(&block));
    }

    #[test]
    fn test_every_field_affects_encoding() {
        let base = canonical_block_bytes(&genesis());

        let mut b = genesis();
        b.index = 1;
        assert_ne!(canonical_block_bytes(&b), base);

        let mut b = genesis();
        b.nonce = 7;
        assert_ne!(canonical_block_bytes(&b), base);

        let mut b = genesis();
        b.previous_hash = Sha256Hash::from_bytes([1u8; 32]);
        assert_ne!(canonical_block_bytes(&b), base);

        let mut b = genesis();
        b.timestamp += 1;
        assert_ne!(canonical_block_bytes(&b), base);

        let mut b = genesis();
        b.data.push(Transaction::new("0", "A", 1, Payload::marker("m")));
        assert_ne!(canonical_block_bytes(&b), base);
    }

    #[test]
    fn test_marker_and_record_payloads_differ() {
        let marker = Transaction::new("A", "B", 1, Payload::marker(""));
        let record = Transaction::new(
            "A",
            "B",
            1,
            Payload::record(SequenceNumber(0), Envelope::from_bytes(Vec::new())),
        );
        assert_ne!(
            canonical_transaction_bytes(&marker),
            canonical_transaction_bytes(&record)
        );
    }
}

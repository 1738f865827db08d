//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ledgerpost_codec::{InfoRequest, SecretIdentity};
use ledgerpost_core::{Blockchain, ChainConfig, Envelope, Payload, SequenceNumber};

/// Addresses used by generated chains, indexed by [`ChainShape`] entries.
pub const ADDRESSES: [&str; 3] = ["alice", "bob", "carol"];

/// Generate a deterministic identity from random seeds.
pub fn identity() -> impl Strategy<Value = SecretIdentity> {
    (any::<[u8; 32]>(), any::<[u8; 32]>())
        .prop_map(|(signing, encryption)| SecretIdentity::from_seeds(&signing, encryption))
}

/// A message field. Never contains `*`, so no separator can appear in it.
pub fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .:/_-]{0,24}".prop_map(String::from)
}

/// A field drawn mostly from separator characters.
pub fn starry_field() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => field(),
        1 => "[*DELSP]{0,7}".prop_map(String::from),
        1 => "[a-z]{0,3}\\*(DEL|SEP)?\\*?[a-z]{0,3}".prop_map(String::from),
    ]
}

/// Between zero and six message fields, some of them full of `*`.
pub fn fields() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(starry_field(), 0..=6)
}

pub fn info_request() -> impl Strategy<Value = InfoRequest> {
    (field(), any::<u64>(), any::<u64>(), field()).prop_map(
        |(subject, patient_id, practitioner_id, reply_to)| InfoRequest {
            subject,
            patient_id,
            practitioner_id,
            reply_to,
        },
    )
}

/// Envelope bytes of at most `max_len` bytes.
pub fn envelope(max_len: usize) -> impl Strategy<Value = Envelope> {
    prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(Envelope::from_bytes)
}

/// Transaction payload: a marker or a record.
pub fn payload() -> impl Strategy<Value = Payload> {
    prop_oneof![
        field().prop_map(Payload::marker),
        (any::<u64>(), envelope(64))
            .prop_map(|(n, data)| Payload::record(SequenceNumber(n), data)),
    ]
}

/// One staged transaction: sender index, recipient index, payload.
pub type TransactionShape = (usize, usize, Payload);

/// Blocks to mine, each a list of staged transactions.
pub type ChainShape = Vec<Vec<TransactionShape>>;

pub fn chain_shape() -> impl Strategy<Value = ChainShape> {
    let tx = (0..ADDRESSES.len(), 0..ADDRESSES.len(), payload());
    prop::collection::vec(prop::collection::vec(tx, 0..4), 1..5)
}

/// Mine a chain at difficulty 1, one block per shape entry, alternating miners.
pub fn chain_from_shape(shape: &ChainShape) -> Blockchain {
    let mut chain = Blockchain::new(ChainConfig {
        difficulty: 1,
        ..ChainConfig::default()
    });
    for (i, block) in shape.iter().enumerate() {
        for (sender, recipient, payload) in block {
            chain.stage_transaction(ADDRESSES[*sender], ADDRESSES[*recipient], 1, payload.clone());
        }
        chain.mine(ADDRESSES[i % ADDRESSES.len()]);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerpost_codec::{decode_request, encode_request, CodecError};
    use ledgerpost_core::{Address, ValidationError};
    use ledgerpost_sync::sync;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_request_roundtrip(
            sender in identity(),
            recipient in identity(),
            seq in any::<u64>(),
            fields in fields(),
        ) {
            match encode_request(SequenceNumber(seq), &fields, &recipient.public(), &sender) {
                Ok(payload) => {
                    prop_assert_eq!(payload.sequence_number(), Some(SequenceNumber(seq)));
                    let envelope = payload.envelope().unwrap();
                    let decoded = decode_request(envelope, &sender.public(), &recipient).unwrap();
                    prop_assert_eq!(decoded, fields);
                }
                Err(CodecError::InvalidField { index }) => {
                    prop_assert!(fields[index].contains('*'));
                }
                Err(CodecError::Framing(_)) => prop_assert!(fields.is_empty()),
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        #[test]
        fn test_request_rejects_foreign_recipient(
            sender in identity(),
            recipient in identity(),
            intruder in identity(),
            fields in prop::collection::vec(field(), 1..=6),
        ) {
            prop_assume!(intruder.public() != recipient.public());
            let payload = encode_request(SequenceNumber(1), &fields, &recipient.public(), &sender)
                .unwrap();
            let envelope = payload.envelope().unwrap();
            let err = decode_request(envelope, &sender.public(), &intruder).unwrap_err();
            prop_assert!(matches!(err, CodecError::Decryption(_)));
        }

        #[test]
        fn test_info_request_fields_roundtrip(request in info_request()) {
            prop_assert_eq!(InfoRequest::from_fields(&request.to_fields()).unwrap(), request);
        }

        #[test]
        fn test_mined_chains_validate(shape in chain_shape()) {
            let chain = chain_from_shape(&shape);
            prop_assert_eq!(chain.len(), shape.len() + 1);
            prop_assert!(chain.is_chain_valid());
        }

        #[test]
        fn test_snapshot_bytes_roundtrip(shape in chain_shape()) {
            let chain = chain_from_shape(&shape);
            let bytes = chain.to_snapshot_bytes().unwrap();
            let restored = Blockchain::from_snapshot_bytes(chain.config().clone(), &bytes).unwrap();
            prop_assert_eq!(restored, chain);
        }

        #[test]
        fn test_tampering_below_head_is_detected(
            shape in chain_shape(),
            target in any::<prop::sample::Index>(),
        ) {
            prop_assume!(shape.len() >= 2);
            let chain = chain_from_shape(&shape);
            let mut blocks = chain.blocks().to_vec();
            // Any block that has a successor, genesis excluded.
            let index = 1 + target.index(blocks.len() - 2);
            blocks[index].nonce ^= 1 << 40;

            let forged = Blockchain::from_blocks(chain.config().clone(), blocks).unwrap();
            let err = forged.validate_chain().unwrap_err();
            prop_assert!(
                matches!(err, ValidationError::PreviousHashMismatch { index: i, .. } if i == index as u64 + 1)
                    || matches!(err, ValidationError::InvalidProof { .. }),
                "unexpected error {:?}",
                err
            );
        }

        #[test]
        fn test_sync_finds_every_new_delivery(shape in chain_shape(), seen in 1usize..5) {
            let chain = chain_from_shape(&shape);
            let seen = seen.min(chain.len());
            let local = Blockchain::from_blocks(
                chain.config().clone(),
                chain.blocks()[..seen].to_vec(),
            )
            .unwrap();

            let bob = Address::from(ADDRESSES[1]);
            let outcome = sync(&local, chain.clone(), &bob).unwrap();
            let scanned = (chain.len() - seen).max(1);
            let expected = chain.blocks()[chain.len() - scanned..]
                .iter()
                .flat_map(|b| &b.data)
                .filter(|tx| tx.recipient == bob)
                .count();
            prop_assert_eq!(outcome.transactions.len(), expected);
        }
    }
}

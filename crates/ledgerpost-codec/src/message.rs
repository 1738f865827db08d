//! Request and key-exchange messages.

use ledgerpost_core::{Envelope, Payload, SequenceNumber};
use tracing::debug;

use crate::crypto::{
    seal, Ed25519Signature, EncryptionKey, EncryptionNonce, PublicIdentity, SecretIdentity,
};
use crate::error::{CodecError, Result};
use crate::framing::{frame, join_fields, split_fields, unframe};
use crate::sealed_file::{AuthTag, KeyMaterial};

/// First field of a key-exchange message.
pub const KEY_EXCHANGE_MARKER: &str = "retour";

/// Sign, encrypt and frame `fields` into a record payload.
///
/// Fields may not contain either separator token, nor form one across a
/// field boundary. At least one field is required.
pub fn encode_request<S: AsRef<str>>(
    sequence_number: SequenceNumber,
    fields: &[S],
    recipient: &PublicIdentity,
    sender: &SecretIdentity,
) -> Result<Payload> {
    let joined = join_fields(fields)?;
    let signature = sender.sign(joined.as_bytes());
    let cipher = seal(joined.as_bytes(), &recipient.encryption)?;
    let framed = frame(&cipher, &signature);

    debug!(
        sequence = %sequence_number,
        fields = fields.len(),
        bytes = framed.len(),
        "encoded message"
    );
    Ok(Payload::record(sequence_number, Envelope::from_bytes(framed)))
}

/// Unframe, decrypt and verify an envelope, returning its fields.
pub fn decode_request(
    envelope: &Envelope,
    sender: &PublicIdentity,
    recipient: &SecretIdentity,
) -> Result<Vec<String>> {
    let (cipher, signature) = unframe(envelope.as_bytes())?;
    let plaintext = recipient.open(&cipher)?;

    let signature = Ed25519Signature::from_slice(&signature)?;
    sender.signing.verify(&plaintext, &signature)?;

    let joined = String::from_utf8(plaintext)
        .map_err(|_| CodecError::Framing("message is not valid UTF-8".to_string()))?;
    Ok(split_fields(&joined))
}

/// Encode the key material for a sealed file as a reply message.
///
/// Fields: `[KEY_EXCHANGE_MARKER, hex(key), hex(tag), hex(nonce)]`.
pub fn encode_key_exchange(
    sequence_number: SequenceNumber,
    key: &EncryptionKey,
    tag: &AuthTag,
    nonce: &EncryptionNonce,
    recipient: &PublicIdentity,
    sender: &SecretIdentity,
) -> Result<Payload> {
    let fields = [
        KEY_EXCHANGE_MARKER.to_string(),
        hex::encode(key.as_bytes()),
        hex::encode(tag.as_bytes()),
        hex::encode(nonce.as_bytes()),
    ];
    encode_request(sequence_number, &fields, recipient, sender)
}

/// Decode a key-exchange message back into key material.
pub fn decode_key_exchange(
    envelope: &Envelope,
    sender: &PublicIdentity,
    recipient: &SecretIdentity,
) -> Result<KeyMaterial> {
    let fields = decode_request(envelope, sender, recipient)?;
    let [marker, key, tag, nonce]: [String; 4] = fields.try_into().map_err(|f: Vec<String>| {
        CodecError::Framing(format!("key exchange has {} fields, expected 4", f.len()))
    })?;

    if marker != KEY_EXCHANGE_MARKER {
        return Err(CodecError::Framing(format!(
            "expected key exchange marker, got {:?}",
            marker
        )));
    }

    Ok(KeyMaterial {
        key: EncryptionKey::from_bytes(decode_hex_array("key", &key)?),
        tag: AuthTag(decode_hex_array("tag", &tag)?),
        nonce: EncryptionNonce::from_bytes(decode_hex_array("nonce", &nonce)?),
    })
}

fn decode_hex_array<const N: usize>(name: &str, text: &str) -> Result<[u8; N]> {
    let bytes =
        hex::decode(text).map_err(|e| CodecError::Framing(format!("{} is not hex: {}", name, e)))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        CodecError::Framing(format!("{} has {} bytes, expected {}", name, b.len(), N))
    })
}

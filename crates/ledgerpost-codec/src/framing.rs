//! Field and record framing.
//!
//! Fields are joined with [`FIELD_SEPARATOR`] before signing and encryption.
//! The cipher and signature are hex-encoded and joined with
//! [`RECORD_SEPARATOR`]; hex output can never contain either token.

use crate::crypto::Ed25519Signature;
use crate::error::{CodecError, Result};

pub const FIELD_SEPARATOR: &str = "*DEL*";
pub const RECORD_SEPARATOR: &str = "*SEP*";

/// Join fields so that [`split_fields`] gives them back unchanged.
///
/// A field is rejected when it contains a separator token, or when it
/// would run into a neighbour to form one (`"a*DEL"` followed by `"b"`).
/// An empty slice is rejected: it would come back as one empty field.
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> Result<String> {
    if fields.is_empty() {
        return Err(CodecError::Framing("a message needs at least one field".to_string()));
    }
    for (index, field) in fields.iter().enumerate() {
        let field = field.as_ref();
        if field.contains(FIELD_SEPARATOR) || field.contains(RECORD_SEPARATOR) {
            return Err(CodecError::InvalidField { index });
        }
    }

    let joined = fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(FIELD_SEPARATOR);

    let mut split = joined.split(FIELD_SEPARATOR);
    for (index, field) in fields.iter().enumerate() {
        if split.next() != Some(field.as_ref()) {
            return Err(CodecError::InvalidField { index });
        }
    }
    if split.next().is_some() {
        return Err(CodecError::InvalidField {
            index: fields.len() - 1,
        });
    }
    Ok(joined)
}

pub fn split_fields(joined: &str) -> Vec<String> {
    joined.split(FIELD_SEPARATOR).map(str::to_string).collect()
}

/// `hex(cipher) ++ RECORD_SEPARATOR ++ hex(signature)`
pub fn frame(cipher: &[u8], signature: &Ed25519Signature) -> Vec<u8> {
    let mut out = hex::encode(cipher);
    out.push_str(RECORD_SEPARATOR);
    out.push_str(&signature.to_hex());
    out.into_bytes()
}

/// Split a framed envelope into cipher and signature bytes.
pub fn unframe(envelope: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let text = std::str::from_utf8(envelope)
        .map_err(|_| CodecError::Framing("envelope is not valid UTF-8".to_string()))?;

    let mut parts = text.split(RECORD_SEPARATOR);
    let (cipher_hex, signature_hex) = match (parts.next(), parts.next(), parts.next()) {
        (Some(cipher), Some(signature), None) => (cipher, signature),
        _ => {
            return Err(CodecError::Framing(
                "expected exactly one record separator".to_string(),
            ))
        }
    };

    let cipher = hex::decode(cipher_hex)
        .map_err(|e| CodecError::Framing(format!("cipher is not hex: {}", e)))?;
    let signature = hex::decode(signature_hex)
        .map_err(|e| CodecError::Framing(format!("signature is not hex: {}", e)))?;
    Ok((cipher, signature))
}

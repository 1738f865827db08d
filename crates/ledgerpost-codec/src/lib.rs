//! # Ledgerpost Codec
//!
//! Builds and opens the payloads carried by ledger transactions.
//!
//! A message is a list of text fields. Encoding joins the fields with
//! [`FIELD_SEPARATOR`], signs the joined text with the sender's Ed25519 key,
//! encrypts it to the recipient's X25519 key, and frames the result as
//! `hex(cipher) ++ RECORD_SEPARATOR ++ hex(signature)`.
//!
//! ## Key Types
//!
//! - [`SecretIdentity`] / [`PublicIdentity`] - A party's signing and encryption keys
//! - [`KeyMaterial`] - Symmetric key, tag and nonce needed to open a [`SealedFile`]
//! - [`InfoRequest`] - Typed view of a request message
//!
//! ## Usage
//!
//! ```rust
//! use ledgerpost_codec::{decode_request, encode_request, SecretIdentity};
//! use ledgerpost_core::SequenceNumber;
//!
//! let doctor = SecretIdentity::generate();
//! let specialist = SecretIdentity::generate();
//!
//! let payload = encode_request(
//!     SequenceNumber(36226479),
//!     &["BloodTest", "42"],
//!     &specialist.public(),
//!     &doctor,
//! )
//! .unwrap();
//!
//! let envelope = payload.envelope().unwrap();
//! let fields = decode_request(envelope, &doctor.public(), &specialist).unwrap();
//! assert_eq!(fields, vec!["BloodTest", "42"]);
//! ```

pub mod crypto;
pub mod error;
pub mod framing;
pub mod info_request;
pub mod message;
pub mod sealed_file;

pub use crypto::{
    Ed25519PublicKey, Ed25519Signature, EncryptionKey, EncryptionNonce, Keypair, PublicIdentity,
    SecretIdentity, X25519PublicKey, X25519StaticSecret,
};
pub use error::{CodecError, Result};
pub use framing::{FIELD_SEPARATOR, RECORD_SEPARATOR};
pub use info_request::InfoRequest;
pub use message::{
    decode_key_exchange, decode_request, encode_key_exchange, encode_request, KEY_EXCHANGE_MARKER,
};
pub use sealed_file::{AuthTag, KeyMaterial, SealedFile};

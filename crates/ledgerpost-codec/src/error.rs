//! Error types for the codec.

use thiserror::Error;

/// Errors raised while building or opening a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The envelope or its decrypted contents are not laid out as expected.
    #[error("framing error: {0}")]
    Framing(String),

    /// A field value contains a separator token, or forms one with a neighbour.
    #[error("field {index} contains or forms a reserved separator token")]
    InvalidField { index: usize },

    /// Wrong key or corrupted ciphertext.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The signature does not verify against the claimed sender.
    #[error("signature verification failed: {0}")]
    Signature(String),

    #[error("encryption failed: {0}")]
    Encryption(String),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

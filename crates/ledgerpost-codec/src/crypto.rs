//! Cryptographic primitives for the codec.
//!
//! Ed25519 for signatures, and a sealed-box construction for asymmetric
//! encryption: an ephemeral X25519 key agreement, a Blake3-derived key, then
//! ChaCha20-Poly1305.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

use crate::error::{CodecError, Result};

/// Blake3 key-derivation context for sealed boxes.
const SEALED_BOX_CONTEXT: &str = "ledgerpost-v1-sealed-box";

const X25519_PUBLIC_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<()> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CodecError::Signature(format!("invalid public key: {}", e)))?;
        let sig = Signature::from_bytes(&signature.0);
        verifying_key
            .verify(message, &sig)
            .map_err(|e| CodecError::Signature(e.to_string()))
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Parse from a byte slice of exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 64] = bytes.try_into().map_err(|_| {
            CodecError::Signature(format!("expected 64 signature bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

/// A signing keypair. Wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

/// An X25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn to_dalek(self) -> PublicKey {
        PublicKey::from(self.0)
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Pub({})", &hex::encode(self.0)[..16])
    }
}

/// An X25519 static secret, used only for key agreement.
#[derive(Clone)]
pub struct X25519StaticSecret(StaticSecret);

impl X25519StaticSecret {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(StaticSecret::from(bytes))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(PublicKey::from(&self.0))
    }

    /// Open a sealed box addressed to this key.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < X25519_PUBLIC_LEN + NONCE_LEN {
            return Err(CodecError::Decryption(format!(
                "sealed box too short: {} bytes",
                sealed.len()
            )));
        }
        let (ephemeral, rest) = sealed.split_at(X25519_PUBLIC_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let mut eph = [0u8; 32];
        eph.copy_from_slice(ephemeral);
        let ephemeral_public = X25519PublicKey(eph);

        let shared = self.0.diffie_hellman(&ephemeral_public.to_dalek());
        let key = derive_sealed_box_key(shared.as_bytes(), &ephemeral_public, &self.public_key());

        let cipher = ChaCha20Poly1305::new_from_slice(&key)
            .map_err(|e| CodecError::Decryption(e.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CodecError::Decryption("authentication failed".to_string()))
    }
}

impl fmt::Debug for X25519StaticSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Secret({:?})", self.public_key())
    }
}

/// Encrypt `plaintext` so that only the holder of `recipient`'s secret can open it.
///
/// Layout: `ephemeral_public (32) || nonce (12) || ciphertext`.
pub fn seal(plaintext: &[u8], recipient: &X25519PublicKey) -> Result<Vec<u8>> {
    let ephemeral = EphemeralSecret::random_from_rng(rand::thread_rng());
    let ephemeral_public = X25519PublicKey::from(PublicKey::from(&ephemeral));
    let shared = ephemeral.diffie_hellman(&recipient.to_dalek());
    let key = derive_sealed_box_key(shared.as_bytes(), &ephemeral_public, recipient);

    let nonce = EncryptionNonce::generate();
    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| CodecError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CodecError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(X25519_PUBLIC_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(ephemeral_public.as_bytes());
    out.extend_from_slice(nonce.as_bytes());
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Binds the derived key to both public keys of the exchange.
fn derive_sealed_box_key(
    shared: &[u8; 32],
    ephemeral: &X25519PublicKey,
    recipient: &X25519PublicKey,
) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(SEALED_BOX_CONTEXT);
    hasher.update(shared);
    hasher.update(ephemeral.as_bytes());
    hasher.update(recipient.as_bytes());
    *hasher.finalize().as_bytes()
}

/// A 256-bit symmetric key for ChaCha20-Poly1305.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// A 96-bit nonce for ChaCha20-Poly1305.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionNonce(pub [u8; 12]);

impl EncryptionNonce {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

/// The public half of a party's identity, as published in a key directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub signing: Ed25519PublicKey,
    pub encryption: X25519PublicKey,
}

/// A party's secret keys: one for signing, one for receiving sealed boxes.
#[derive(Clone)]
pub struct SecretIdentity {
    signing: Keypair,
    encryption: X25519StaticSecret,
}

impl SecretIdentity {
    pub fn generate() -> Self {
        Self {
            signing: Keypair::generate(),
            encryption: X25519StaticSecret::generate(),
        }
    }

    /// Deterministic identity from two seeds. Intended for fixtures.
    pub fn from_seeds(signing_seed: &[u8; 32], encryption_seed: [u8; 32]) -> Self {
        Self {
            signing: Keypair::from_seed(signing_seed),
            encryption: X25519StaticSecret::from_bytes(encryption_seed),
        }
    }

    pub fn public(&self) -> PublicIdentity {
        PublicIdentity {
            signing: self.signing.public_key(),
            encryption: self.encryption.public_key(),
        }
    }

    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.signing.sign(message)
    }

    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        self.encryption.open(sealed)
    }
}

impl fmt::Debug for SecretIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretIdentity({:?})", self.public())
    }
}

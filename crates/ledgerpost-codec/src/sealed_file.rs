//! Symmetric sealing of files shared out of band.
//!
//! A file is encrypted under a fresh ChaCha20-Poly1305 key with a detached
//! authentication tag. The key, tag and nonce travel to the recipient inside
//! a key-exchange message; the ciphertext travels separately.

use chacha20poly1305::{
    aead::{AeadInPlace, KeyInit},
    ChaCha20Poly1305, Nonce, Tag,
};
use std::fmt;

use crate::crypto::{EncryptionKey, EncryptionNonce};
use crate::error::{CodecError, Result};

/// A 16-byte Poly1305 authentication tag.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AuthTag(pub [u8; 16]);

impl AuthTag {
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Debug for AuthTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthTag({})", hex::encode(self.0))
    }
}

/// Everything needed to open a sealed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    pub key: EncryptionKey,
    pub tag: AuthTag,
    pub nonce: EncryptionNonce,
}

/// An encrypted file and the key material that opens it.
#[derive(Debug, Clone)]
pub struct SealedFile {
    pub ciphertext: Vec<u8>,
    pub material: KeyMaterial,
}

impl SealedFile {
    /// Encrypt `plaintext` under a freshly generated key and nonce.
    pub fn seal(plaintext: &[u8]) -> Result<Self> {
        let key = EncryptionKey::generate();
        let nonce = EncryptionNonce::generate();
        let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
            .map_err(|e| CodecError::Encryption(e.to_string()))?;

        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(nonce.as_bytes()), b"", &mut buffer)
            .map_err(|e| CodecError::Encryption(e.to_string()))?;

        let mut tag_bytes = [0u8; 16];
        tag_bytes.copy_from_slice(tag.as_slice());

        Ok(Self {
            ciphertext: buffer,
            material: KeyMaterial {
                key,
                tag: AuthTag(tag_bytes),
                nonce,
            },
        })
    }

    /// Decrypt this file with its own key material.
    pub fn open(&self) -> Result<Vec<u8>> {
        Self::open_with(&self.ciphertext, &self.material)
    }

    /// Decrypt `ciphertext` with key material received from a peer.
    pub fn open_with(ciphertext: &[u8], material: &KeyMaterial) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new_from_slice(material.key.as_bytes())
            .map_err(|e| CodecError::Decryption(e.to_string()))?;

        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(material.nonce.as_bytes()),
                b"",
                &mut buffer,
                Tag::from_slice(material.tag.as_bytes()),
            )
            .map_err(|_| CodecError::Decryption("file authentication failed".to_string()))?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open() {
        let sealed = SealedFile::seal(b"blood test results").unwrap();
        assert_eq!(sealed.ciphertext.len(), b"blood test results".len());
        assert_ne!(sealed.ciphertext, b"blood test results");
        assert_eq!(sealed.open().unwrap(), b"blood test results");
    }

    #[test]
    fn test_open_with_received_material() {
        let sealed = SealedFile::seal(b"scan").unwrap();
        let material = sealed.material.clone();
        assert_eq!(SealedFile::open_with(&sealed.ciphertext, &material).unwrap(), b"scan");
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut sealed = SealedFile::seal(b"report").unwrap();
        sealed.ciphertext[0] ^= 0xff;
        assert!(matches!(sealed.open(), Err(CodecError::Decryption(_))));
    }

    #[test]
    fn test_wrong_tag_fails() {
        let mut sealed = SealedFile::seal(b"report").unwrap();
        sealed.material.tag.0[0] ^= 0x01;
        assert!(matches!(sealed.open(), Err(CodecError::Decryption(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = SealedFile::seal(b"report").unwrap();
        let other = SealedFile::seal(b"other").unwrap();
        let material = KeyMaterial {
            key: other.material.key,
            ..sealed.material.clone()
        };
        assert!(SealedFile::open_with(&sealed.ciphertext, &material).is_err());
    }

    #[test]
    fn test_empty_file() {
        let sealed = SealedFile::seal(b"").unwrap();
        assert!(sealed.open().unwrap().is_empty());
    }
}

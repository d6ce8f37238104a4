//! Symmetric encryption of byte payloads.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use gatehouse_error::{CryptoError, CryptoErrorKind, GatehouseResult};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Nonce length for ChaCha20-Poly1305.
const NONCE_LEN: usize = 12;

/// Authenticated symmetric cipher under a single process-wide key.
///
/// The 256-bit cipher key is SHA-256 of the supplied key material, so any
/// length of key string works and the same material always derives the
/// same key. Blobs are laid out as `nonce (12 bytes) || ciphertext+tag`
/// with a fresh random nonce per encryption.
///
/// Pure transform: no side effects beyond drawing OS randomness.
///
/// # Examples
///
/// ```
/// use gatehouse_vault::SecretCipher;
///
/// let cipher = SecretCipher::new(b"correct horse battery staple");
/// let blob = cipher.encrypt(b"api-key-123").unwrap();
/// assert_eq!(cipher.decrypt(&blob).unwrap(), b"api-key-123");
///
/// let other = SecretCipher::new(b"wrong key");
/// assert!(other.decrypt(&blob).is_err());
/// ```
pub struct SecretCipher {
    cipher: ChaCha20Poly1305,
}

impl SecretCipher {
    /// Create a cipher from arbitrary key material.
    pub fn new(key_material: &[u8]) -> Self {
        let digest = Sha256::digest(key_material);
        let key = Key::from_slice(&digest);
        Self {
            cipher: ChaCha20Poly1305::new(key),
        }
    }

    /// Encrypt a payload, returning `nonce || ciphertext+tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> GatehouseResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::new(CryptoErrorKind::Encryption))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt a `nonce || ciphertext+tag` blob.
    ///
    /// A blob shorter than the nonce is `Truncated`; an authentication
    /// failure (wrong key or tampered data) is a generic `Decryption`
    /// error with no further detail.
    pub fn decrypt(&self, blob: &[u8]) -> GatehouseResult<Vec<u8>> {
        if blob.len() < NONCE_LEN {
            return Err(CryptoError::new(CryptoErrorKind::Truncated(blob.len())).into());
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::new(CryptoErrorKind::Decryption))?;
        Ok(plaintext)
    }
}

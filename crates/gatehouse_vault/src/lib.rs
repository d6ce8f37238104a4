//! Encrypted secrets storage for Gatehouse.
//!
//! Sensitive configuration values (provider API keys, the webhook secret,
//! the admin passcode) live in a single structured document, encrypted at
//! rest under a process-wide key:
//!
//! - [`SecretCipher`] - authenticated encryption (ChaCha20-Poly1305) of
//!   byte payloads, key derived by hashing the supplied key material
//! - [`SecretsDocument`] - the typed secrets document
//! - [`SecretVault`] - loads, mutates, and atomically persists the
//!   encrypted document
//!
//! Decrypting with the wrong key or a tampered blob fails deterministically;
//! there is no mode in which corruption silently yields garbage plaintext.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cipher;
mod document;
mod vault;

pub use cipher::SecretCipher;
pub use document::{Provider, ProviderKeys, SecretsDocument};
pub use vault::SecretVault;

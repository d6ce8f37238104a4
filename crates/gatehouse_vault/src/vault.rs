//! Encrypted, persistent secrets store.

use crate::{Provider, SecretCipher, SecretsDocument};
use gatehouse_error::{
    ConfigError, GatehouseErrorKind, GatehouseResult, StorageError, StorageErrorKind,
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Encrypted secrets store backed by a single file.
///
/// The whole [`SecretsDocument`] is held in memory behind an async mutex;
/// every mutation rewrites the encrypted file before releasing the lock,
/// so the on-disk blob never lags a completed `set_*` call. Reads never
/// touch the disk.
///
/// The file layout is the [`SecretCipher`] blob of the JSON-serialized
/// document. A wrong key or corrupt file surfaces as a deterministic
/// decryption error at open time, never as garbage secrets later.
pub struct SecretVault {
    cipher: SecretCipher,
    path: PathBuf,
    state: Mutex<SecretsDocument>,
}

// Manual impl: never prints the cipher key or the document contents.
impl std::fmt::Debug for SecretVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretVault")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SecretVault {
    /// Open the vault at `path` under a key derived from `key_material`.
    ///
    /// A missing file is not an error: a default (empty) document is
    /// encrypted and written, parent directories included. A file that is
    /// present but fails to decrypt or parse is an error; see
    /// [`SecretVault::open_or_default`] for the lenient variant.
    #[instrument(skip(path, key_material), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>, key_material: &[u8]) -> GatehouseResult<Self> {
        let path = path.as_ref().to_path_buf();
        let cipher = SecretCipher::new(key_material);

        let state = match tokio::fs::read(&path).await {
            Ok(blob) => {
                let plaintext = cipher.decrypt(&blob)?;
                let document: SecretsDocument =
                    serde_json::from_slice(&plaintext).map_err(|e| {
                        ConfigError::new(format!(
                            "Malformed secrets document {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                debug!("Secrets document loaded");
                document
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Secrets document not found, writing empty defaults");
                let document = SecretsDocument::default();
                persist(&cipher, &path, &document).await?;
                document
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        Ok(Self {
            cipher,
            path,
            state: Mutex::new(state),
        })
    }

    /// Open the vault, falling back to an empty in-memory document when the
    /// existing file cannot be decrypted or parsed.
    ///
    /// The fallback covers only crypto and parse failures; I/O errors still
    /// propagate, since a transiently unreadable file is not a corrupt one.
    /// The broken file is left untouched on disk until the first mutation
    /// overwrites it, so an operator who supplied the wrong key can still
    /// recover the original by restarting with the right one.
    #[instrument(skip(path, key_material), fields(path = %path.as_ref().display()))]
    pub async fn open_or_default(path: impl AsRef<Path>, key_material: &[u8]) -> GatehouseResult<Self> {
        let path = path.as_ref();
        match Self::open(path, key_material).await {
            Ok(vault) => Ok(vault),
            Err(e) if matches!(e.kind(), GatehouseErrorKind::Storage(_)) => Err(e),
            Err(e) => {
                warn!(error = %e, "Secrets document unreadable, starting from empty defaults");
                Ok(Self {
                    cipher: SecretCipher::new(key_material),
                    path: path.to_path_buf(),
                    state: Mutex::new(SecretsDocument::default()),
                })
            }
        }
    }

    /// API key for a provider, empty string when not configured.
    pub async fn api_key(&self, provider: Provider) -> String {
        self.state.lock().await.api_keys.get(provider).to_string()
    }

    /// Store an API key for a provider and persist immediately.
    #[instrument(skip(self, key))]
    pub async fn set_api_key(
        &self,
        provider: Provider,
        key: impl Into<String>,
    ) -> GatehouseResult<()> {
        let mut state = self.state.lock().await;
        state.api_keys.set(provider, key);
        persist(&self.cipher, &self.path, &state).await
    }

    /// Webhook signing secret, empty string when not configured.
    pub async fn webhook_secret(&self) -> String {
        self.state.lock().await.webhook_secret.clone()
    }

    /// Store the webhook signing secret and persist immediately.
    #[instrument(skip(self, secret))]
    pub async fn set_webhook_secret(&self, secret: impl Into<String>) -> GatehouseResult<()> {
        let mut state = self.state.lock().await;
        state.webhook_secret = secret.into();
        persist(&self.cipher, &self.path, &state).await
    }

    /// Check a candidate passcode against the stored admin passcode.
    ///
    /// Compares SHA-256 digests rather than the strings themselves. An
    /// unset (empty) stored passcode never verifies: a fresh vault admits
    /// nobody rather than everybody.
    pub async fn verify_admin_passcode(&self, candidate: &str) -> bool {
        let state = self.state.lock().await;
        if state.admin_passcode.is_empty() {
            return false;
        }
        Sha256::digest(candidate.as_bytes()) == Sha256::digest(state.admin_passcode.as_bytes())
    }

    /// Store the admin passcode and persist immediately.
    #[instrument(skip(self, passcode))]
    pub async fn set_admin_passcode(&self, passcode: impl Into<String>) -> GatehouseResult<()> {
        let mut state = self.state.lock().await;
        state.admin_passcode = passcode.into();
        persist(&self.cipher, &self.path, &state).await
    }

    /// Legacy entry preserved under its original dotted path, if any.
    pub async fn extra(&self, path: &str) -> Option<String> {
        self.state.lock().await.extras.get(path).cloned()
    }

    /// Store a free-form entry under a dotted path and persist immediately.
    #[instrument(skip_all)]
    pub async fn set_extra(
        &self,
        path: impl Into<String>,
        value: impl Into<String>,
    ) -> GatehouseResult<()> {
        let mut state = self.state.lock().await;
        state.extras.insert(path.into(), value.into());
        persist(&self.cipher, &self.path, &state).await
    }

    /// Fold a legacy flat secrets store into the document and persist.
    ///
    /// See [`SecretsDocument::merge_legacy`] for the path mapping.
    #[instrument(skip(self, legacy))]
    pub async fn merge_legacy(&self, legacy: &serde_json::Value) -> GatehouseResult<()> {
        let mut state = self.state.lock().await;
        state.merge_legacy(legacy);
        info!("Legacy secrets imported");
        persist(&self.cipher, &self.path, &state).await
    }

    /// Clone of the current document, for diagnostics and tests.
    pub async fn snapshot(&self) -> SecretsDocument {
        self.state.lock().await.clone()
    }
}

/// Serialize, encrypt, and atomically write the document.
async fn persist(
    cipher: &SecretCipher,
    path: &Path,
    document: &SecretsDocument,
) -> GatehouseResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let json = serde_json::to_vec(document)
        .map_err(|e| ConfigError::new(format!("Failed to serialize secrets document: {}", e)))?;
    let blob = cipher.encrypt(&json)?;

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, &blob).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })?;

    debug!("Secrets document saved");
    Ok(())
}

//! Persistence for the plaintext security document.

use crate::{MembershipRoster, SecuritySettings};
use gatehouse_error::{ConfigError, GatehouseResult, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// The on-disk security document: membership lists plus tuning parameters.
///
/// Stored as pretty JSON, unencrypted by design - none of its contents are
/// secret, and operators edit it by hand. Secrets live in the encrypted
/// vault document instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityDocument {
    /// Blocked / admin / authorized principal lists
    #[serde(default)]
    pub roster: MembershipRoster,
    /// Enforcement tuning parameters
    #[serde(default)]
    pub settings: SecuritySettings,
}

impl SecurityDocument {
    /// Load the document from `path`.
    ///
    /// A missing file is not an error: the default document is written to
    /// `path` (creating parent directories) and returned. A present but
    /// malformed file is a `ConfigError`.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> GatehouseResult<Self> {
        let path = path.as_ref();
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let document: SecurityDocument = serde_json::from_slice(&bytes).map_err(|e| {
                    ConfigError::new(format!(
                        "Malformed security document {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                debug!("Security document loaded");
                Ok(document)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Security document not found, writing defaults");
                let document = SecurityDocument::default();
                document.save(path).await?;
                Ok(document)
            }
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    /// Write the document to `path`, replacing any previous content.
    ///
    /// Parent directories are created as needed. The write goes to a temp
    /// file first and is renamed into place, so a crash mid-write leaves
    /// the previous file intact.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn save(&self, path: impl AsRef<Path>) -> GatehouseResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| {
            ConfigError::new(format!("Failed to serialize security document: {}", e))
        })?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, json.as_bytes())
            .await
            .map_err(|e| {
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

        debug!("Security document saved");
        Ok(())
    }
}

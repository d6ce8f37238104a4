//! Top-level error wrapper types.

use crate::{ConfigError, CryptoError, StorageError};

/// This is the foundation error enum for the Gatehouse workspace.
///
/// # Examples
///
/// ```
/// use gatehouse_error::{GatehouseError, ConfigError};
///
/// let config_err = ConfigError::new("Malformed secrets document");
/// let err: GatehouseError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GatehouseErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Cryptography error
    #[from(CryptoError)]
    Crypto(CryptoError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Gatehouse error with kind discrimination.
///
/// # Examples
///
/// ```
/// use gatehouse_error::{GatehouseResult, ConfigError};
///
/// fn might_fail() -> GatehouseResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Gatehouse Error: {}", _0)]
pub struct GatehouseError(Box<GatehouseErrorKind>);

impl GatehouseError {
    /// Create a new error from a kind.
    pub fn new(kind: GatehouseErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GatehouseErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to GatehouseErrorKind
impl<T> From<T> for GatehouseError
where
    T: Into<GatehouseErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Gatehouse operations.
///
/// # Examples
///
/// ```
/// use gatehouse_error::{GatehouseResult, CryptoError, CryptoErrorKind};
///
/// fn decrypt_blob() -> GatehouseResult<Vec<u8>> {
///     Err(CryptoError::new(CryptoErrorKind::Decryption))?
/// }
/// ```
pub type GatehouseResult<T> = std::result::Result<T, GatehouseError>;

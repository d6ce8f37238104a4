//! Cryptography error types.

/// Kinds of cryptographic failures.
///
/// `Decryption` deliberately carries no detail about whether the key was
/// wrong or the blob was tampered with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CryptoErrorKind {
    /// Blob too short to contain a nonce
    #[display("Encrypted blob truncated: {} bytes", _0)]
    Truncated(usize),
    /// Encryption failed
    #[display("Encryption failed")]
    Encryption,
    /// Decryption failed
    #[display("Decryption failed")]
    Decryption,
}

/// Cryptography error with location tracking.
///
/// # Examples
///
/// ```
/// use gatehouse_error::{CryptoError, CryptoErrorKind};
///
/// let err = CryptoError::new(CryptoErrorKind::Truncated(4));
/// assert!(format!("{}", err).contains("truncated"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Crypto Error: {} at line {} in {}", kind, line, file)]
pub struct CryptoError {
    /// The kind of error that occurred
    pub kind: CryptoErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CryptoError {
    /// Create a new crypto error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CryptoErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CryptoErrorKind {
        &self.kind
    }
}

//! Error types for the Gatehouse access-control library.
//!
//! This crate provides the foundation error types used throughout the Gatehouse
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use gatehouse_error::{GatehouseResult, ConfigError};
//!
//! fn parse_settings() -> GatehouseResult<()> {
//!     Err(ConfigError::new("missing lockout threshold"))?
//! }
//!
//! match parse_settings() {
//!     Ok(()) => println!("parsed"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod crypto;
mod error;
mod storage;

pub use config::ConfigError;
pub use crypto::{CryptoError, CryptoErrorKind};
pub use error::{GatehouseError, GatehouseErrorKind, GatehouseResult};
pub use storage::{StorageError, StorageErrorKind};

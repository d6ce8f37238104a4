//! Gatehouse - access control and encrypted secrets management.
//!
//! Gatehouse decides who may talk to a bot and protects the secrets the
//! bot runs on. Inbound identifiers are normalized to canonical
//! [`Principal`]s, checked against membership rosters, per-action rate
//! limits, and failure lockouts, and the resulting allow/deny decision is
//! returned as a value rather than an error. Secrets (provider API keys,
//! the webhook secret, the admin passcode) live in a single document
//! encrypted at rest.
//!
//! # Quick Start
//!
//! ```
//! use gatehouse::{now_millis, Action, BotMode, Gatekeeper, SecuritySettings};
//!
//! let gate = Gatekeeper::new(SecuritySettings::default().with_mode(BotMode::Private));
//! gate.authorize_principal("+1 (555) 867-5309");
//! assert!(gate.is_authorized("5558675309", Action::Message, now_millis()));
//! ```
//!
//! # Architecture
//!
//! Gatehouse is organized as a workspace with focused crates:
//!
//! - `gatehouse_core` - principal normalization, action classes, bot mode, clock
//! - `gatehouse_error` - error types
//! - `gatehouse_security` - rate limiting, lockouts, sessions, rosters, masking
//! - `gatehouse_vault` - encrypted secrets storage
//!
//! This crate (`gatehouse`) re-exports everything for convenience and owns
//! the observability bootstrap.

#![warn(missing_docs)]

pub use gatehouse_core::*;
pub use gatehouse_error::*;
pub use gatehouse_security::*;
pub use gatehouse_vault::*;

pub mod observability;

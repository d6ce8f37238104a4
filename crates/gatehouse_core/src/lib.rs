//! Core data types for the Gatehouse access-control library.
//!
//! This crate provides the vocabulary shared across all Gatehouse crates:
//! normalized principals, action classes, the deployment mode, and the
//! epoch-millisecond clock used by every expiry check.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod clock;
mod mode;
mod principal;

pub use action::Action;
pub use clock::{now_millis, EpochMillis};
pub use mode::BotMode;
pub use principal::Principal;

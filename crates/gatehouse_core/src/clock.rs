//! Epoch-millisecond clock helpers.
//!
//! Every expiry comparison in the workspace takes `now` as an explicit
//! `EpochMillis` argument, so tests can drive time without sleeping. This
//! module supplies the wall-clock value callers pass in production.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = u64;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> EpochMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

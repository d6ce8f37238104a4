//! Operator-facing counts of live enforcement state.

use derive_getters::Getters;
use serde::Serialize;

/// Sizes of each membership set and dynamic table.
///
/// Exposed to operators for visibility; denied principals never see these
/// numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct SecurityStats {
    /// Explicitly authorized principals
    authorized: usize,
    /// Blocked principals
    blocked: usize,
    /// Admin principals
    admins: usize,
    /// Live rate-limit windows
    active_windows: usize,
    /// Stored session tokens
    active_sessions: usize,
    /// Principals with live failure records
    tracked_failures: usize,
}

impl SecurityStats {
    pub(crate) fn new(
        authorized: usize,
        blocked: usize,
        admins: usize,
        active_windows: usize,
        active_sessions: usize,
        tracked_failures: usize,
    ) -> Self {
        Self {
            authorized,
            blocked,
            admins,
            active_windows,
            active_sessions,
            tracked_failures,
        }
    }
}

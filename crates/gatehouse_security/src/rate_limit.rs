//! Fixed-window rate limiting keyed by (principal, action).

use gatehouse_core::{Action, EpochMillis, Principal};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument};

/// One fixed-window counter.
#[derive(Debug, Clone)]
struct WindowRecord {
    count: u32,
    reset_at: EpochMillis,
}

/// Fixed-window request counters keyed by (principal, action).
///
/// Windows do not slide: a fresh record opens on the first request and all
/// requests until `reset_at` share its counter. This admits a burst of up to
/// `ceiling` requests immediately after a window boundary, which is an
/// accepted trade-off for the constant-space bookkeeping.
///
/// Denials never increment, so the stored count is bounded by the ceiling.
///
/// # Examples
///
/// ```
/// use gatehouse_core::{Action, Principal};
/// use gatehouse_security::RateLimiter;
///
/// let limiter = RateLimiter::new();
/// let p = Principal::normalize("5551234567");
/// assert!(limiter.allow(&p, Action::Message, 1, 60_000, 0));
/// assert!(!limiter.allow(&p, Action::Message, 1, 60_000, 1));
/// // Past the window boundary the counter re-arms.
/// assert!(limiter.allow(&p, Action::Message, 1, 60_000, 60_001));
/// ```
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<(Principal, Action), WindowRecord>>,
}

impl RateLimiter {
    /// Create an empty rate limiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a request is within its window's ceiling, counting it
    /// if so.
    ///
    /// Absent or stale records are replaced by a fresh window of one. A
    /// record at the ceiling denies without incrementing.
    #[instrument(skip(self, principal), fields(principal = %principal, action = %action))]
    pub fn allow(
        &self,
        principal: &Principal,
        action: Action,
        ceiling: u32,
        window_ms: u64,
        now: EpochMillis,
    ) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let key = (principal.clone(), action);
        match windows.get_mut(&key) {
            Some(record) if now <= record.reset_at => {
                if record.count >= ceiling {
                    debug!(count = record.count, ceiling, "Rate limit exceeded");
                    return false;
                }
                record.count = record.count.saturating_add(1);
                debug!(count = record.count, ceiling, "Rate limit check passed");
                true
            }
            _ => {
                windows.insert(
                    key,
                    WindowRecord {
                        count: 1,
                        reset_at: now + window_ms,
                    },
                );
                debug!(ceiling, "Opened fresh rate-limit window");
                true
            }
        }
    }

    /// Number of live window records.
    pub fn active_windows(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop records whose window has passed. Returns the number removed.
    pub fn purge_expired(&self, now: EpochMillis) -> usize {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, record| now <= record.reset_at);
        let removed = before - windows.len();
        if removed > 0 {
            debug!(removed, remaining = windows.len(), "Purged expired rate-limit windows");
        }
        removed
    }

    /// Drop all window records.
    pub fn clear(&self) {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal::normalize("5551234567")
    }

    #[test]
    fn allows_exactly_ceiling_requests_per_window() {
        let limiter = RateLimiter::new();
        let p = principal();

        for i in 0..10 {
            assert!(limiter.allow(&p, Action::Message, 10, 60_000, i), "request {i}");
        }
        assert!(!limiter.allow(&p, Action::Message, 10, 60_000, 11));
    }

    #[test]
    fn window_elapse_re_arms_counter() {
        let limiter = RateLimiter::new();
        let p = principal();

        assert!(limiter.allow(&p, Action::Message, 1, 60_000, 0));
        assert!(!limiter.allow(&p, Action::Message, 1, 60_000, 30_000));
        assert!(limiter.allow(&p, Action::Message, 1, 60_000, 60_001));
    }

    #[test]
    fn repeated_denials_do_not_grow_count() {
        let limiter = RateLimiter::new();
        let p = principal();

        assert!(limiter.allow(&p, Action::Message, 1, 60_000, 0));
        for now in 1..100 {
            assert!(!limiter.allow(&p, Action::Message, 1, 60_000, now));
        }
        // A fresh window still opens on schedule.
        assert!(limiter.allow(&p, Action::Message, 1, 60_000, 60_001));
    }

    #[test]
    fn actions_are_tracked_independently() {
        let limiter = RateLimiter::new();
        let p = principal();

        assert!(limiter.allow(&p, Action::Message, 1, 60_000, 0));
        assert!(!limiter.allow(&p, Action::Message, 1, 60_000, 1));
        assert!(limiter.allow(&p, Action::Command, 1, 60_000, 1));
    }

    #[test]
    fn principals_are_tracked_independently() {
        let limiter = RateLimiter::new();
        let other = Principal::normalize("5559876543");

        assert!(limiter.allow(&principal(), Action::Message, 1, 60_000, 0));
        assert!(limiter.allow(&other, Action::Message, 1, 60_000, 0));
    }

    #[test]
    fn purge_drops_only_stale_windows() {
        let limiter = RateLimiter::new();
        let other = Principal::normalize("5559876543");

        limiter.allow(&principal(), Action::Message, 10, 60_000, 0);
        limiter.allow(&other, Action::Message, 10, 60_000, 50_000);
        assert_eq!(limiter.active_windows(), 2);

        assert_eq!(limiter.purge_expired(90_000), 1);
        assert_eq!(limiter.active_windows(), 1);
    }
}

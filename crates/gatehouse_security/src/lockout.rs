//! Failed-attempt tracking with timed lockout.

use gatehouse_core::{EpochMillis, Principal};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument, warn};

/// Default number of failures that triggers a lockout.
pub(crate) const DEFAULT_THRESHOLD: u32 = 5;
/// Default lockout duration: 5 minutes.
pub(crate) const DEFAULT_LOCKOUT_MS: u64 = 300_000;

/// Per-principal failure bookkeeping.
///
/// `locked_until` is `None` while the principal is accumulating failures
/// and `Some(expiry)` once the threshold is reached.
#[derive(Debug, Clone)]
struct FailureRecord {
    count: u32,
    locked_until: Option<EpochMillis>,
}

/// Failed-attempt counters with timed lockout.
///
/// State machine per principal:
/// `Clean -> Accumulating (1..threshold-1) -> Locked (timer running) -> Clean`.
/// An expired lock is discarded on the next access, re-arming from a clean
/// slate rather than resuming the old count.
///
/// # Examples
///
/// ```
/// use gatehouse_core::Principal;
/// use gatehouse_security::LockoutTracker;
///
/// let tracker = LockoutTracker::new(5, 300_000);
/// let p = Principal::normalize("5551234567");
/// for _ in 0..5 {
///     tracker.record_failure(&p, 0);
/// }
/// assert!(tracker.is_locked_out(&p, 1_000));
/// assert!(!tracker.is_locked_out(&p, 300_001));
/// ```
#[derive(Debug)]
pub struct LockoutTracker {
    threshold: u32,
    lockout_ms: u64,
    failures: Mutex<HashMap<Principal, FailureRecord>>,
}

impl Default for LockoutTracker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_LOCKOUT_MS)
    }
}

impl LockoutTracker {
    /// Create a tracker that locks after `threshold` failures for
    /// `lockout_ms` milliseconds.
    pub fn new(threshold: u32, lockout_ms: u64) -> Self {
        Self {
            threshold,
            lockout_ms,
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Record one failed attempt for a principal.
    ///
    /// On reaching the threshold the lockout timer starts; further failures
    /// while locked extend the timer.
    #[instrument(skip(self, principal), fields(principal = %principal))]
    pub fn record_failure(&self, principal: &Principal, now: EpochMillis) {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // An expired lock re-arms before counting, so this failure starts
        // a fresh count of 1.
        if let Some(record) = failures.get(principal)
            && record.locked_until.is_some_and(|until| now > until)
        {
            failures.remove(principal);
        }

        let record = failures.entry(principal.clone()).or_insert(FailureRecord {
            count: 0,
            locked_until: None,
        });
        record.count = record.count.saturating_add(1);

        if record.count >= self.threshold {
            record.locked_until = Some(now + self.lockout_ms);
            warn!(count = record.count, "Principal locked out after repeated failures");
        } else {
            debug!(count = record.count, "Recorded failed attempt");
        }
    }

    /// Whether the principal is currently locked out.
    ///
    /// An expired lock is deleted here and reported as not locked.
    /// Accumulating records below the threshold are left untouched.
    pub fn is_locked_out(&self, principal: &Principal, now: EpochMillis) -> bool {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(record) = failures.get(principal) else {
            return false;
        };
        match record.locked_until {
            Some(until) if now > until => {
                failures.remove(principal);
                debug!(principal = %principal, "Lockout expired, record re-armed");
                false
            }
            Some(_) => record.count >= self.threshold,
            None => false,
        }
    }

    /// Forget all failures for a principal.
    ///
    /// Call after a verified-good action so unrelated transient failures do
    /// not accumulate into a lockout.
    pub fn clear(&self, principal: &Principal) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(principal);
    }

    /// Number of principals with live failure records.
    pub fn tracked(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop records whose lockout has expired. Returns the number removed.
    pub fn purge_expired(&self, now: EpochMillis) -> usize {
        let mut failures = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = failures.len();
        failures.retain(|_, record| !record.locked_until.is_some_and(|until| now > until));
        before - failures.len()
    }

    /// Drop all failure records.
    pub fn clear_all(&self) {
        self.failures
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
    fn locks_after_threshold_failures() {
        let tracker = LockoutTracker::default();
        let p = principal();

        for i in 0..4 {
            tracker.record_failure(&p, i);
            assert!(!tracker.is_locked_out(&p, i));
        }
        tracker.record_failure(&p, 4);
        assert!(tracker.is_locked_out(&p, 5));
    }

    #[test]
    fn lockout_expires_and_re_arms() {
        let tracker = LockoutTracker::new(5, 300_000);
        let p = principal();

        for _ in 0..5 {
            tracker.record_failure(&p, 0);
        }
        assert!(tracker.is_locked_out(&p, 300_000));
        assert!(!tracker.is_locked_out(&p, 300_001));
        // The record was deleted, not reset: one fresh failure is count 1.
        tracker.record_failure(&p, 300_002);
        assert!(!tracker.is_locked_out(&p, 300_003));
        assert_eq!(tracker.tracked(), 1);
    }

    #[test]
    fn failure_after_expiry_starts_fresh_count() {
        let tracker = LockoutTracker::new(5, 300_000);
        let p = principal();

        for _ in 0..5 {
            tracker.record_failure(&p, 0);
        }
        // No read between expiry and the next failure: record_failure must
        // discard the stale lock itself.
        tracker.record_failure(&p, 300_001);
        assert!(!tracker.is_locked_out(&p, 300_002));
    }

    #[test]
    fn reads_do_not_clear_accumulating_records() {
        let tracker = LockoutTracker::default();
        let p = principal();

        tracker.record_failure(&p, 0);
        tracker.record_failure(&p, 1);
        assert!(!tracker.is_locked_out(&p, 2));
        assert_eq!(tracker.tracked(), 1);

        for i in 0..3 {
            tracker.record_failure(&p, 3 + i);
        }
        assert!(tracker.is_locked_out(&p, 10));
    }

    #[test]
    fn clear_forgets_failures() {
        let tracker = LockoutTracker::default();
        let p = principal();

        for _ in 0..5 {
            tracker.record_failure(&p, 0);
        }
        tracker.clear(&p);
        assert!(!tracker.is_locked_out(&p, 1));
        assert_eq!(tracker.tracked(), 0);
    }

    #[test]
    fn failures_while_locked_extend_the_lock() {
        let tracker = LockoutTracker::new(5, 300_000);
        let p = principal();

        for _ in 0..5 {
            tracker.record_failure(&p, 0);
        }
        tracker.record_failure(&p, 200_000);
        // Original expiry would have been 300_000; the extra failure pushed
        // it to 500_000.
        assert!(tracker.is_locked_out(&p, 400_000));
        assert!(!tracker.is_locked_out(&p, 500_001));
    }

    #[test]
    fn purge_drops_only_expired_locks() {
        let tracker = LockoutTracker::new(5, 300_000);
        let locked = principal();
        let accumulating = Principal::normalize("5559876543");

        for _ in 0..5 {
            tracker.record_failure(&locked, 0);
        }
        tracker.record_failure(&accumulating, 0);

        assert_eq!(tracker.purge_expired(300_001), 1);
        assert_eq!(tracker.tracked(), 1);
    }
}

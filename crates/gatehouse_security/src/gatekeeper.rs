//! The authorization engine.

use crate::{
    LockoutTracker, MembershipRoster, RateLimiter, SecurityDocument, SecuritySettings,
    SecurityStats, SessionStore,
};
use gatehouse_core::{Action, BotMode, EpochMillis, Principal};
use std::sync::{PoisonError, RwLock};
use tracing::{info, instrument, warn};

/// Why an authorization succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Grant {
    /// Principal is in the admin set
    #[display("admin")]
    Admin,
    /// Principal is in the authorized set
    #[display("authorized")]
    Authorized,
    /// Public mode admits all non-blocked principals
    #[display("open access")]
    OpenAccess,
}

/// Why an authorization failed.
///
/// Reasons are for operator logs and stats only; denied principals receive
/// a generic rejection so the decision cannot be used as a fingerprinting
/// oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Denial {
    /// Principal is in the blocked set
    #[display("blocked")]
    Blocked,
    /// Rate-limit ceiling reached for this action class
    #[display("rate limited")]
    RateLimited,
    /// Principal is locked out after repeated failures
    #[display("locked out")]
    LockedOut,
    /// Private mode and the principal is not admitted
    #[display("not authorized in private mode")]
    PrivateMode,
}

/// Outcome of an authorization check. Denials are values, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum AccessDecision {
    /// Access granted
    #[display("allow ({})", _0)]
    Allow(Grant),
    /// Access denied
    #[display("deny ({})", _0)]
    Deny(Denial),
}

impl AccessDecision {
    /// Whether the decision admits the request.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }
}

/// Combines the membership roster, rate limiter, and lockout tracker into
/// a single allow/deny decision.
///
/// Decision order (short-circuit, first match wins):
/// 1. blocked principal -> deny
/// 2. rate limiter denies for (principal, action) -> deny
/// 3. locked out -> deny
/// 4. admin -> allow
/// 5. explicitly authorized -> allow
/// 6. public mode -> allow
/// 7. private mode -> deny
///
/// The engine owns its tables exclusively; administrative mutations take
/// the roster's write lock and are visible to the next `authorize` call
/// with no caching lag. Failure recording is a separate explicit call made
/// by the caller when a related operation (such as a passcode check)
/// fails - a deny here never records a failure by itself.
///
/// # Examples
///
/// ```
/// use gatehouse_core::{Action, BotMode};
/// use gatehouse_security::{Gatekeeper, SecuritySettings};
///
/// let gate = Gatekeeper::new(SecuritySettings::default().with_mode(BotMode::Public));
/// let decision = gate.authorize("+1 (555) 123-4567", Action::Message, 0);
/// assert!(decision.is_allowed());
///
/// gate.block("+1 (555) 123-4567");
/// assert!(!gate.is_authorized("5551234567", Action::Message, 1));
/// ```
#[derive(Debug)]
pub struct Gatekeeper {
    settings: SecuritySettings,
    roster: RwLock<MembershipRoster>,
    rate_limiter: RateLimiter,
    lockouts: LockoutTracker,
}

impl Gatekeeper {
    /// Create an engine with an empty roster.
    pub fn new(settings: SecuritySettings) -> Self {
        Self::with_roster(settings, MembershipRoster::new())
    }

    /// Create an engine seeded with an existing roster.
    pub fn with_roster(settings: SecuritySettings, roster: MembershipRoster) -> Self {
        let lockouts = LockoutTracker::new(*settings.max_failed_attempts(), *settings.lockout_ms());
        Self {
            settings,
            roster: RwLock::new(roster),
            rate_limiter: RateLimiter::new(),
            lockouts,
        }
    }

    /// Create an engine from a loaded security document.
    pub fn from_document(document: SecurityDocument) -> Self {
        Self::with_roster(document.settings, document.roster)
    }

    /// The engine's tuning parameters.
    pub fn settings(&self) -> &SecuritySettings {
        &self.settings
    }

    /// Decide whether `raw` may perform `action` at `now`.
    #[instrument(skip(self, raw), fields(action = %action))]
    pub fn authorize(&self, raw: &str, action: Action, now: EpochMillis) -> AccessDecision {
        let principal = Principal::normalize(raw);
        let decision = self.decide(&principal, action, now);
        match decision {
            AccessDecision::Allow(grant) => {
                info!(principal = %principal, %grant, "Access granted");
            }
            AccessDecision::Deny(denial) => {
                warn!(principal = %principal, %denial, "Access denied");
            }
        }
        decision
    }

    /// Boolean wrapper over [`Gatekeeper::authorize`] for collaborators that
    /// only surface a generic rejection.
    pub fn is_authorized(&self, raw: &str, action: Action, now: EpochMillis) -> bool {
        self.authorize(raw, action, now).is_allowed()
    }

    fn decide(&self, principal: &Principal, action: Action, now: EpochMillis) -> AccessDecision {
        let roster = self
            .roster
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if roster.is_blocked(principal) {
            return AccessDecision::Deny(Denial::Blocked);
        }

        let ceiling = self.settings.ceiling_for(action);
        if !self
            .rate_limiter
            .allow(principal, action, ceiling, *self.settings.window_ms(), now)
        {
            return AccessDecision::Deny(Denial::RateLimited);
        }

        if self.lockouts.is_locked_out(principal, now) {
            return AccessDecision::Deny(Denial::LockedOut);
        }

        if roster.is_admin(principal) {
            return AccessDecision::Allow(Grant::Admin);
        }

        if roster.is_authorized(principal) {
            return AccessDecision::Allow(Grant::Authorized);
        }

        match self.settings.mode() {
            BotMode::Public => AccessDecision::Allow(Grant::OpenAccess),
            BotMode::Private => AccessDecision::Deny(Denial::PrivateMode),
        }
    }

    /// Block a principal, evicting it from the authorized set.
    pub fn block(&self, raw: &str) -> bool {
        let principal = Principal::normalize(raw);
        self.roster
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .block(&principal)
    }

    /// Remove a principal from the blocked set.
    pub fn unblock(&self, raw: &str) -> bool {
        let principal = Principal::normalize(raw);
        self.roster
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .unblock(&principal)
    }

    /// Add a principal to the authorized set. Refused while blocked.
    pub fn authorize_principal(&self, raw: &str) -> bool {
        let principal = Principal::normalize(raw);
        self.roster
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .authorize(&principal)
    }

    /// Remove a principal from the authorized set.
    pub fn revoke_principal(&self, raw: &str) -> bool {
        let principal = Principal::normalize(raw);
        self.roster
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .revoke(&principal)
    }

    /// Add a principal to the admin set.
    pub fn add_admin(&self, raw: &str) -> bool {
        let principal = Principal::normalize(raw);
        self.roster
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add_admin(&principal)
    }

    /// Whether the principal is an admin.
    pub fn is_admin(&self, raw: &str) -> bool {
        let principal = Principal::normalize(raw);
        self.roster
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_admin(&principal)
    }

    /// Whether the principal is blocked.
    pub fn is_blocked(&self, raw: &str) -> bool {
        let principal = Principal::normalize(raw);
        self.roster
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_blocked(&principal)
    }

    /// Record one failed attempt (for example, a bad passcode) for a principal.
    pub fn record_failure(&self, raw: &str, now: EpochMillis) {
        let principal = Principal::normalize(raw);
        self.lockouts.record_failure(&principal, now);
    }

    /// Forget all failures for a principal after a verified-good action.
    pub fn clear_failures(&self, raw: &str) {
        let principal = Principal::normalize(raw);
        self.lockouts.clear(&principal);
    }

    /// Sizes of each set and table, with session counts from the given store.
    pub fn stats(&self, sessions: &SessionStore) -> SecurityStats {
        let roster = self
            .roster
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        SecurityStats::new(
            roster.authorized_len(),
            roster.blocked_len(),
            roster.admins_len(),
            self.rate_limiter.active_windows(),
            sessions.active(),
            self.lockouts.tracked(),
        )
    }

    /// Drop expired rate-limit windows and lockout records.
    pub fn purge_expired(&self, now: EpochMillis) {
        self.rate_limiter.purge_expired(now);
        self.lockouts.purge_expired(now);
    }

    /// Clear the roster and every dynamic table.
    ///
    /// In-memory only: rewriting the on-disk document stays with the caller.
    pub fn reset(&self) {
        self.roster
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.rate_limiter.clear();
        self.lockouts.clear_all();
        info!("Security state reset");
    }

    /// Snapshot the current roster and settings for persistence.
    pub fn snapshot(&self) -> SecurityDocument {
        SecurityDocument {
            roster: self
                .roster
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            settings: self.settings.clone(),
        }
    }
}

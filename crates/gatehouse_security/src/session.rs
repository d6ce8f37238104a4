//! Opaque time-limited session tokens.

use derive_getters::Getters;
use gatehouse_core::{EpochMillis, Principal};
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument};

/// Default session lifetime: 1 hour.
pub(crate) const DEFAULT_SESSION_TTL_MS: u64 = 3_600_000;

/// Bytes of entropy per token; hex-encoded to a 64-character string.
const TOKEN_BYTES: usize = 32;

/// Session bound to a principal.
#[derive(Debug, Clone, Getters)]
pub struct SessionRecord {
    /// Principal the token was issued to
    principal: Principal,
    /// Issue time
    created_at: EpochMillis,
    /// Expiry time; the record is purged on the first validate past this
    expires_at: EpochMillis,
}

/// Issues and validates opaque bearer tokens for privileged operations.
///
/// Tokens carry no structure: 32 bytes of OS randomness, hex-encoded.
/// Expiry is lazy - the first `validate` that observes `now > expires_at`
/// deletes the record and reports the token invalid. Validation never
/// extends expiry (no sliding renewal), and multiple concurrent sessions
/// per principal are allowed.
///
/// # Examples
///
/// ```
/// use gatehouse_core::Principal;
/// use gatehouse_security::SessionStore;
///
/// let sessions = SessionStore::new();
/// let p = Principal::normalize("5551234567");
/// let token = sessions.issue(&p, 0);
/// assert_eq!(sessions.validate(&token, 1_000), Some(p));
/// assert_eq!(sessions.validate(&token, 3_600_001), None);
/// ```
#[derive(Debug)]
pub struct SessionStore {
    ttl_ms: u64,
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store with the default 1-hour TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL_MS)
    }

    /// Create a store with a custom default TTL in milliseconds.
    pub fn with_ttl(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a token for a principal using the store's default TTL.
    #[instrument(skip(self, principal), fields(principal = %principal))]
    pub fn issue(&self, principal: &Principal, now: EpochMillis) -> String {
        self.issue_with_ttl(principal, now, self.ttl_ms)
    }

    /// Issue a token for a principal with an explicit TTL in milliseconds.
    pub fn issue_with_ttl(&self, principal: &Principal, now: EpochMillis, ttl_ms: u64) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let record = SessionRecord {
            principal: principal.clone(),
            created_at: now,
            expires_at: now + ttl_ms,
        };
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), record);

        debug!(expires_at = now + ttl_ms, "Issued session token");
        token
    }

    /// Resolve a token to its principal if the session is still live.
    ///
    /// Unknown tokens return `None`. An expired token is deleted and
    /// returns `None`; a second validate of the same token is identically
    /// `None` (the record is already gone).
    pub fn validate(&self, token: &str, now: EpochMillis) -> Option<Principal> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let record = sessions.get(token)?;
        if now > record.expires_at {
            sessions.remove(token);
            debug!("Session token expired, record purged");
            return None;
        }
        Some(record.principal.clone())
    }

    /// Delete a token outright (logout). Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }

    /// Number of stored sessions, including not-yet-observed expired ones.
    pub fn active(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop sessions past their expiry. Returns the number removed.
    pub fn purge_expired(&self, now: EpochMillis) -> usize {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, record| now <= record.expires_at);
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, remaining = sessions.len(), "Purged expired sessions");
        }
        removed
    }

    /// Drop all sessions.
    pub fn clear(&self) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

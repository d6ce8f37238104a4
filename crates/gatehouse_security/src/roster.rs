//! Membership sets for blocked, admin, and authorized principals.

use gatehouse_core::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// The three membership sets consulted by every authorization decision.
///
/// Invariant: `blocked` and `authorized` are disjoint. Blocking evicts the
/// principal from `authorized`; authorizing a blocked principal is refused
/// until it is unblocked.
///
/// `BTreeSet` keeps the persisted document output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRoster {
    /// Principals denied all access
    #[serde(default)]
    blocked: BTreeSet<Principal>,
    /// Principals with full access
    #[serde(default)]
    admins: BTreeSet<Principal>,
    /// Principals explicitly admitted in private mode
    #[serde(default)]
    authorized: BTreeSet<Principal>,
}

impl MembershipRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block a principal, evicting it from the authorized set.
    ///
    /// Idempotent. Returns whether the principal was newly blocked.
    pub fn block(&mut self, principal: &Principal) -> bool {
        let evicted = self.authorized.remove(principal);
        let newly = self.blocked.insert(principal.clone());
        if newly {
            info!(principal = %principal, evicted_from_authorized = evicted, "Principal blocked");
        }
        newly
    }

    /// Remove a principal from the blocked set. Returns whether it was blocked.
    pub fn unblock(&mut self, principal: &Principal) -> bool {
        let removed = self.blocked.remove(principal);
        if removed {
            info!(principal = %principal, "Principal unblocked");
        }
        removed
    }

    /// Add a principal to the authorized set.
    ///
    /// Refused while the principal is blocked; unblock first. Returns
    /// whether the principal is authorized afterwards.
    pub fn authorize(&mut self, principal: &Principal) -> bool {
        if self.blocked.contains(principal) {
            warn!(principal = %principal, "Refusing to authorize a blocked principal");
            return false;
        }
        self.authorized.insert(principal.clone());
        info!(principal = %principal, "Principal authorized");
        true
    }

    /// Remove a principal from the authorized set. Returns whether it was present.
    pub fn revoke(&mut self, principal: &Principal) -> bool {
        let removed = self.authorized.remove(principal);
        if removed {
            info!(principal = %principal, "Principal authorization revoked");
        }
        removed
    }

    /// Whether the principal is blocked.
    pub fn is_blocked(&self, principal: &Principal) -> bool {
        self.blocked.contains(principal)
    }

    /// Whether the principal is an admin.
    pub fn is_admin(&self, principal: &Principal) -> bool {
        self.admins.contains(principal)
    }

    /// Whether the principal is explicitly authorized.
    pub fn is_authorized(&self, principal: &Principal) -> bool {
        self.authorized.contains(principal)
    }

    /// Add a principal to the admin set.
    pub fn add_admin(&mut self, principal: &Principal) -> bool {
        let newly = self.admins.insert(principal.clone());
        if newly {
            info!(principal = %principal, "Principal granted admin");
        }
        newly
    }

    /// Remove a principal from the admin set.
    pub fn remove_admin(&mut self, principal: &Principal) -> bool {
        self.admins.remove(principal)
    }

    /// Number of blocked principals.
    pub fn blocked_len(&self) -> usize {
        self.blocked.len()
    }

    /// Number of admin principals.
    pub fn admins_len(&self) -> usize {
        self.admins.len()
    }

    /// Number of explicitly authorized principals.
    pub fn authorized_len(&self) -> usize {
        self.authorized.len()
    }

    /// Drop every membership.
    pub fn clear(&mut self) {
        self.blocked.clear();
        self.admins.clear();
        self.authorized.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal::normalize("5551234567")
    }

    #[test]
    fn block_evicts_from_authorized() {
        let mut roster = MembershipRoster::new();
        let p = principal();

        assert!(roster.authorize(&p));
        assert!(roster.block(&p));
        assert!(roster.is_blocked(&p));
        assert!(!roster.is_authorized(&p));
    }

    #[test]
    fn block_is_idempotent() {
        let mut roster = MembershipRoster::new();
        let p = principal();

        assert!(roster.block(&p));
        assert!(!roster.block(&p));
        assert_eq!(roster.blocked_len(), 1);
    }

    #[test]
    fn authorize_refused_while_blocked() {
        let mut roster = MembershipRoster::new();
        let p = principal();

        roster.block(&p);
        assert!(!roster.authorize(&p));
        assert!(!roster.is_authorized(&p));

        roster.unblock(&p);
        assert!(roster.authorize(&p));
        assert!(roster.is_authorized(&p));
    }

    #[test]
    fn serde_round_trip_is_stable() {
        let mut roster = MembershipRoster::new();
        roster.authorize(&Principal::normalize("5551230001"));
        roster.add_admin(&Principal::normalize("5551230002"));
        roster.block(&Principal::normalize("5551230003"));

        let json = serde_json::to_string(&roster).unwrap();
        let restored: MembershipRoster = serde_json::from_str(&json).unwrap();
        assert_eq!(roster, restored);
    }
}

//! In-memory access-control enforcement for Gatehouse.
//!
//! This crate decides, for every inbound principal, whether an action is
//! permitted. It composes the individual enforcement layers into a single
//! [`Gatekeeper`]:
//!
//! 1. **Membership roster** - blocked / admin / authorized principal sets
//! 2. **Rate limiting** - fixed-window counters per (principal, action)
//! 3. **Lockout tracking** - failed-attempt counters with timed lockout
//! 4. **Session tokens** - opaque time-limited credentials for the admin surface
//!
//! Denials are values, not errors: callers surface a generic rejection while
//! operators get the specific reason through [`AccessDecision`] logging and
//! [`SecurityStats`].
//!
//! All tables are guarded by their own lock, so every check-then-act sequence
//! is a single critical section under preemptive scheduling. Expiry is lazy:
//! records are discarded when an access observes that their time has passed,
//! with optional `purge_expired` sweeps to bound table growth under churn.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod document;
mod gatekeeper;
mod lockout;
mod masking;
mod rate_limit;
mod roster;
mod session;
mod settings;
mod stats;

pub use document::SecurityDocument;
pub use gatekeeper::{AccessDecision, Denial, Gatekeeper, Grant};
pub use lockout::LockoutTracker;
pub use masking::{DataMasker, MaskingConfig};
pub use rate_limit::RateLimiter;
pub use roster::MembershipRoster;
pub use session::{SessionRecord, SessionStore};
pub use settings::{SecuritySettings, SecuritySettingsBuilder};
pub use stats::SecurityStats;

//! Action classes for rate-limit accounting.

use serde::{Deserialize, Serialize};

/// Class of inbound action being authorized.
///
/// Each class carries its own rate-limit ceiling; the window records are
/// keyed by `(Principal, Action)` so a burst of messages never starves a
/// principal's administrative commands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Ordinary inbound message
    #[display("message")]
    Message,
    /// Administrative command
    #[display("command")]
    Command,
}

impl Action {
    /// Convert to string representation for document storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Message => "message",
            Action::Command => "command",
        }
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Action::Message),
            "command" => Ok(Action::Command),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn round_trips_through_str() {
        for action in Action::iter() {
            assert_eq!(Action::from_str(action.as_str()), Ok(action));
        }
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(Action::from_str("broadcast").is_err());
    }
}

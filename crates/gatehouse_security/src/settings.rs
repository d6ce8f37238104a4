//! Security tuning parameters.

use derive_getters::Getters;
use gatehouse_core::{Action, BotMode};
use serde::{Deserialize, Serialize};

/// Tuning knobs for the enforcement layers.
///
/// All fields have serde defaults so a partial document (or an empty one)
/// deserializes to the stock configuration. These values are stored in the
/// plaintext security document; none of them are secret.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct SecuritySettings {
    /// Failures before a principal is locked out
    #[serde(default = "default_max_failed_attempts")]
    #[builder(default = "default_max_failed_attempts()")]
    max_failed_attempts: u32,

    /// Lockout duration in milliseconds
    #[serde(default = "default_lockout_ms")]
    #[builder(default = "default_lockout_ms()")]
    lockout_ms: u64,

    /// Session token lifetime in milliseconds
    #[serde(default = "default_session_ttl_ms")]
    #[builder(default = "default_session_ttl_ms()")]
    session_ttl_ms: u64,

    /// Rate-limit ceiling for ordinary messages per window
    #[serde(default = "default_message_ceiling")]
    #[builder(default = "default_message_ceiling()")]
    message_ceiling: u32,

    /// Rate-limit ceiling for administrative commands per window
    #[serde(default = "default_command_ceiling")]
    #[builder(default = "default_command_ceiling()")]
    command_ceiling: u32,

    /// Rate-limit window length in milliseconds
    #[serde(default = "default_window_ms")]
    #[builder(default = "default_window_ms()")]
    window_ms: u64,

    /// Deployment addressing policy
    #[serde(default)]
    #[builder(default)]
    mode: BotMode,
}

fn default_max_failed_attempts() -> u32 {
    5
}

fn default_lockout_ms() -> u64 {
    300_000 // 5 minutes
}

fn default_session_ttl_ms() -> u64 {
    3_600_000 // 1 hour
}

fn default_message_ceiling() -> u32 {
    10
}

fn default_command_ceiling() -> u32 {
    20
}

fn default_window_ms() -> u64 {
    60_000 // 1 minute
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed_attempts(),
            lockout_ms: default_lockout_ms(),
            session_ttl_ms: default_session_ttl_ms(),
            message_ceiling: default_message_ceiling(),
            command_ceiling: default_command_ceiling(),
            window_ms: default_window_ms(),
            mode: BotMode::default(),
        }
    }
}

impl SecuritySettings {
    /// The rate-limit ceiling for an action class.
    pub fn ceiling_for(&self, action: Action) -> u32 {
        match action {
            Action::Message => self.message_ceiling,
            Action::Command => self.command_ceiling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_stock_settings() {
        let settings: SecuritySettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, SecuritySettings::default());
        assert_eq!(*settings.max_failed_attempts(), 5);
        assert_eq!(*settings.lockout_ms(), 300_000);
        assert_eq!(*settings.session_ttl_ms(), 3_600_000);
        assert_eq!(*settings.mode(), BotMode::Private);
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let settings: SecuritySettings =
            serde_json::from_str(r#"{"message_ceiling": 3, "mode": "public"}"#).unwrap();
        assert_eq!(*settings.message_ceiling(), 3);
        assert_eq!(*settings.mode(), BotMode::Public);
        assert_eq!(*settings.command_ceiling(), 20);
    }

    #[test]
    fn ceilings_follow_action_class() {
        let settings = SecuritySettings::default();
        assert_eq!(settings.ceiling_for(Action::Message), 10);
        assert_eq!(settings.ceiling_for(Action::Command), 20);
    }

    #[test]
    fn builder_fills_defaults() {
        let settings = SecuritySettingsBuilder::default()
            .mode(BotMode::Public)
            .build()
            .unwrap();
        assert_eq!(*settings.mode(), BotMode::Public);
        assert_eq!(*settings.window_ms(), 60_000);
    }
}

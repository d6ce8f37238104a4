//! The typed secrets document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// LLM providers with a dedicated API-key slot.
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
pub enum Provider {
    /// OpenAI
    #[display("openai")]
    OpenAi,
    /// Anthropic
    #[display("anthropic")]
    Anthropic,
    /// Google Gemini
    #[display("gemini")]
    Gemini,
    /// Mistral
    #[display("mistral")]
    Mistral,
}

impl Provider {
    /// Convert to string representation for document storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Mistral => "mistral",
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" => Ok(Provider::Anthropic),
            "gemini" => Ok(Provider::Gemini),
            "mistral" => Ok(Provider::Mistral),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// Per-provider API keys. Empty string means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderKeys {
    /// OpenAI API key
    #[serde(default)]
    pub openai: String,
    /// Anthropic API key
    #[serde(default)]
    pub anthropic: String,
    /// Google Gemini API key
    #[serde(default)]
    pub gemini: String,
    /// Mistral API key
    #[serde(default)]
    pub mistral: String,
}

impl ProviderKeys {
    /// Key slot for a provider.
    pub fn get(&self, provider: Provider) -> &str {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Gemini => &self.gemini,
            Provider::Mistral => &self.mistral,
        }
    }

    /// Set the key slot for a provider.
    pub fn set(&mut self, provider: Provider, key: impl Into<String>) {
        let slot = match provider {
            Provider::OpenAi => &mut self.openai,
            Provider::Anthropic => &mut self.anthropic,
            Provider::Gemini => &mut self.gemini,
            Provider::Mistral => &mut self.mistral,
        };
        *slot = key.into();
    }
}

/// Everything the vault protects, as one structured document.
///
/// The schema is fixed: every secret the system consumes has a named
/// field, so a typo in a lookup is a compile error rather than a silent
/// empty value. Values with no dedicated field survive in `extras` under
/// their original dotted names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsDocument {
    /// Per-provider API keys
    #[serde(default)]
    pub api_keys: ProviderKeys,
    /// Shared secret for validating inbound webhook signatures
    #[serde(default)]
    pub webhook_secret: String,
    /// Passcode gating the administrative web surface
    #[serde(default)]
    pub admin_passcode: String,
    /// Unrecognized legacy entries, keyed by their dotted path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl SecretsDocument {
    /// Fold a legacy flat store into the typed document.
    ///
    /// Older deployments kept secrets as a JSON object addressed by dotted
    /// paths (`apiKeys.openai`, `webhookSecret`, ...). Known paths land in
    /// their typed fields; anything unrecognized is preserved in `extras`
    /// rather than dropped. Nested objects are flattened with `.` before
    /// matching.
    pub fn merge_legacy(&mut self, legacy: &serde_json::Value) {
        let mut flat = BTreeMap::new();
        flatten_into("", legacy, &mut flat);

        for (path, value) in flat {
            match path.as_str() {
                "apiKeys.openai" => self.api_keys.openai = value,
                "apiKeys.anthropic" => self.api_keys.anthropic = value,
                "apiKeys.gemini" => self.api_keys.gemini = value,
                "apiKeys.mistral" => self.api_keys.mistral = value,
                "webhookSecret" => self.webhook_secret = value,
                "adminPasscode" => self.admin_passcode = value,
                _ => {
                    self.extras.insert(path, value);
                }
            }
        }
    }
}

/// Flatten a JSON tree into dotted-path string leaves.
fn flatten_into(prefix: &str, value: &serde_json::Value, out: &mut BTreeMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(&path, child, out);
            }
        }
        serde_json::Value::Null => {}
        serde_json::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn provider_round_trips_through_str() {
        for provider in Provider::iter() {
            assert_eq!(Provider::from_str(provider.as_str()), Ok(provider));
        }
    }

    #[test]
    fn merge_legacy_maps_known_paths() {
        let legacy = serde_json::json!({
            "apiKeys": { "openai": "sk-abc", "anthropic": "sk-ant" },
            "webhookSecret": "whsec",
            "adminPasscode": "1234",
        });

        let mut document = SecretsDocument::default();
        document.merge_legacy(&legacy);

        assert_eq!(document.api_keys.get(Provider::OpenAi), "sk-abc");
        assert_eq!(document.api_keys.get(Provider::Anthropic), "sk-ant");
        assert_eq!(document.api_keys.get(Provider::Gemini), "");
        assert_eq!(document.webhook_secret, "whsec");
        assert_eq!(document.admin_passcode, "1234");
        assert!(document.extras.is_empty());
    }

    #[test]
    fn merge_legacy_preserves_unknown_paths() {
        let legacy = serde_json::json!({
            "apiKeys": { "cohere": "sk-co" },
            "features": { "beta": true },
            "retired": null,
        });

        let mut document = SecretsDocument::default();
        document.merge_legacy(&legacy);

        assert_eq!(document.extras.get("apiKeys.cohere"), Some(&"sk-co".to_string()));
        assert_eq!(document.extras.get("features.beta"), Some(&"true".to_string()));
        assert!(!document.extras.contains_key("retired"));
    }

    #[test]
    fn serializes_with_legacy_field_names() {
        let mut document = SecretsDocument::default();
        document.api_keys.set(Provider::Gemini, "sk-gem");
        document.webhook_secret = "whsec".to_string();

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["apiKeys"]["gemini"], "sk-gem");
        assert_eq!(json["webhookSecret"], "whsec");
        assert!(json.get("extras").is_none());
    }
}

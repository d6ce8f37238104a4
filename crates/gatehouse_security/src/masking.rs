//! Sensitive-data masking for logged or echoed text.

use gatehouse_error::{ConfigError, GatehouseResult};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Masking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Mask 16-digit card numbers (with optional separators)
    #[serde(default = "default_true")]
    pub mask_card_numbers: bool,

    /// Mask social security numbers (###-##-####)
    #[serde(default = "default_true")]
    pub mask_ssns: bool,

    /// Mask email addresses
    #[serde(default = "default_true")]
    pub mask_emails: bool,

    /// Mask bare digit runs of 10-15 characters (phone-number shaped)
    #[serde(default = "default_true")]
    pub mask_digit_runs: bool,

    /// Replacement text for every masked match
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Additional regex patterns to mask
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_placeholder() -> String {
    "***MASKED***".to_string()
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            mask_card_numbers: true,
            mask_ssns: true,
            mask_emails: true,
            mask_digit_runs: true,
            placeholder: default_placeholder(),
            extra_patterns: vec![],
        }
    }
}

/// Replaces sensitive substrings in free text with a placeholder before the
/// text is logged or echoed back to a channel.
pub struct DataMasker {
    placeholder: String,
    patterns: Vec<Regex>,
}

impl DataMasker {
    /// Create a masker from configuration, compiling all patterns up front.
    ///
    /// An invalid user-supplied extra pattern is a `ConfigError`.
    pub fn new(config: MaskingConfig) -> GatehouseResult<Self> {
        let mut patterns = Vec::new();

        if config.mask_card_numbers {
            patterns.push(
                Regex::new(r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b")
                    .expect("Valid card number regex"),
            );
        }
        if config.mask_ssns {
            patterns.push(Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("Valid SSN regex"));
        }
        if config.mask_emails {
            patterns.push(
                Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                    .expect("Valid email regex"),
            );
        }
        if config.mask_digit_runs {
            patterns.push(Regex::new(r"\b\d{10,15}\b").expect("Valid digit run regex"));
        }

        for pattern in &config.extra_patterns {
            match Regex::new(pattern) {
                Ok(regex) => patterns.push(regex),
                Err(e) => {
                    return Err(ConfigError::new(format!(
                        "Invalid masking pattern '{}': {}",
                        pattern, e
                    ))
                    .into())
                }
            }
        }

        Ok(Self {
            placeholder: config.placeholder,
            patterns,
        })
    }

    /// Mask every sensitive match in `text`.
    pub fn mask(&self, text: &str) -> String {
        let mut masked = text.to_string();
        for pattern in &self.patterns {
            // NoExpand keeps a `$` in the placeholder literal rather than a
            // capture-group reference.
            masked = pattern
                .replace_all(&masked, NoExpand(&self.placeholder))
                .into_owned();
        }
        if masked != text {
            debug!("Masked sensitive data in text");
        }
        masked
    }
}

impl Default for DataMasker {
    fn default() -> Self {
        // Static patterns only; cannot fail.
        Self::new(MaskingConfig::default()).expect("Default masking config is valid")
    }
}

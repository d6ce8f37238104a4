//! Normalized caller identities.

use serde::{Deserialize, Serialize};

/// A normalized identity string representing the caller whose access is
/// being evaluated.
///
/// Raw identifiers arrive as phone-number-like strings in arbitrary
/// formats (`+1 (555) 123-4567`, `15551234567`, `555.123.4567`). All of
/// them normalize to the same key, which is used for every membership,
/// rate-limit, lockout, and session record.
///
/// # Examples
///
/// ```
/// use gatehouse_core::Principal;
///
/// let a = Principal::normalize("+1 (555) 123-4567");
/// let b = Principal::normalize("5551234567");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "5551234567");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Normalize a raw identity string into a stable key.
    ///
    /// Keeps ASCII digits only, then strips exactly one leading `'1'`
    /// (North-American country-code collapsing). Total and deterministic:
    /// input with no digits yields the empty principal, which is a valid
    /// key.
    pub fn normalize(raw: &str) -> Self {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let canonical = digits.strip_prefix('1').unwrap_or(&digits);
        Self(canonical.to_string())
    }

    /// The normalized identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization produced an empty key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_characters() {
        assert_eq!(Principal::normalize("+1 (555) 123-4567").as_str(), "5551234567");
        assert_eq!(Principal::normalize("555.123.4567").as_str(), "5551234567");
        assert_eq!(Principal::normalize("whatsapp:5551234567").as_str(), "5551234567");
    }

    #[test]
    fn strips_exactly_one_leading_one() {
        assert_eq!(Principal::normalize("15551234567").as_str(), "5551234567");
        // Only one country-code digit comes off, even if the rest starts with 1.
        assert_eq!(Principal::normalize("11234567").as_str(), "1234567");
    }

    #[test]
    fn no_leading_one_left_untouched() {
        assert_eq!(Principal::normalize("447911123456").as_str(), "447911123456");
    }

    #[test]
    fn empty_and_non_digit_input_normalize_to_empty() {
        assert!(Principal::normalize("").is_empty());
        assert!(Principal::normalize("not-a-number").is_empty());
        // A lone "1" is consumed entirely by the country-code strip.
        assert!(Principal::normalize("1").is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Principal::normalize("+1 (555) 123-4567");
        let twice = Principal::normalize(once.as_str());
        assert_eq!(once, twice);
    }
}

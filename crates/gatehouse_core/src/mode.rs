//! Deployment addressing policy.

use serde::{Deserialize, Serialize};

/// The deployment's addressing policy.
///
/// `Private` admits only admins and explicitly authorized principals;
/// `Public` admits every principal that is not blocked, rate-limited, or
/// locked out. There is no "unspecified" variant: the default is
/// `Private`, so an unconfigured deployment fails closed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum BotMode {
    /// Only admins and authorized principals are admitted
    #[default]
    #[display("private")]
    Private,
    /// All non-blocked principals are admitted
    #[display("public")]
    Public,
}

impl BotMode {
    /// Convert to string representation for document storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            BotMode::Private => "private",
            BotMode::Public => "public",
        }
    }
}

impl std::str::FromStr for BotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(BotMode::Private),
            "public" => Ok(BotMode::Public),
            _ => Err(format!("Unknown bot mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_private() {
        assert_eq!(BotMode::default(), BotMode::Private);
    }

    #[test]
    fn parses_known_modes() {
        assert_eq!("public".parse::<BotMode>(), Ok(BotMode::Public));
        assert!("open".parse::<BotMode>().is_err());
    }
}

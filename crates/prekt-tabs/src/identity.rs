//! Network identity state machine
//!
//! ```text
//! Direct <--swap_identity--> Anonymized
//! ```
//!
//! Both states are stable; nothing expires or transitions on its own. Every
//! slot starts out `Direct`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Identity {
    /// No proxy, full engine capabilities
    #[default]
    Direct,
    /// All traffic through the local SOCKS endpoint, reduced capabilities
    Anonymized,
}

impl Identity {
    /// A swap is only meaningful between different identities
    pub fn can_transition_to(&self, target: Identity) -> bool {
        *self != target
    }

    pub fn is_anonymized(&self) -> bool {
        matches!(self, Identity::Anonymized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Identity::Direct => "direct",
            Identity::Anonymized => "anonymized",
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Identity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Identity::Direct),
            "anonymized" | "tor" => Ok(Identity::Anonymized),
            _ => Err(format!("Unknown identity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(Identity::Direct.can_transition_to(Identity::Anonymized));
        assert!(Identity::Anonymized.can_transition_to(Identity::Direct));
        assert!(!Identity::Direct.can_transition_to(Identity::Direct));
        assert!(!Identity::Anonymized.can_transition_to(Identity::Anonymized));
    }

    #[test]
    fn test_default_is_direct() {
        assert_eq!(Identity::default(), Identity::Direct);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Tor".parse::<Identity>().unwrap(), Identity::Anonymized);
        assert_eq!("direct".parse::<Identity>().unwrap(), Identity::Direct);
        assert!("proxy".parse::<Identity>().is_err());
    }
}

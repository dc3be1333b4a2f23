//! Photo roles: the body view a photo was taken from.
//!
//! The declaration order of [`Role`] is the canonical iteration order
//! (front, side, back, foot). Anything keyed by `Role` in a `BTreeMap`
//! therefore iterates in that order regardless of insertion order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The body view a photo was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Front,
    Side,
    Back,
    Foot,
}

/// Every role, in canonical order.
pub const ALL_ROLES: [Role; 4] = [Role::Front, Role::Side, Role::Back, Role::Foot];

/// Roles that must be present before any remote call.
pub const REQUIRED_ROLES: [Role; 3] = [Role::Front, Role::Side, Role::Back];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Front => "front",
            Role::Side => "side",
            Role::Back => "back",
            Role::Foot => "foot",
        }
    }

    /// Human-readable label used in chips and advisories.
    pub fn label(self) -> &'static str {
        match self {
            Role::Front => "Front",
            Role::Side => "Side",
            Role::Back => "Back",
            Role::Foot => "Foot",
        }
    }

    pub fn is_required(self) -> bool {
        REQUIRED_ROLES.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Role::Front),
            "side" => Ok(Role::Side),
            "back" => Ok(Role::Back),
            "foot" => Ok(Role::Foot),
            other => Err(format!(
                "Unknown role: '{other}'. Valid roles: front, side, back, foot"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_canonical_order() {
        let mut shuffled = vec![Role::Foot, Role::Back, Role::Front, Role::Side];
        shuffled.sort();
        assert_eq!(shuffled, ALL_ROLES.to_vec());
    }

    #[test]
    fn foot_is_optional() {
        assert!(!Role::Foot.is_required());
        assert!(REQUIRED_ROLES.iter().all(|r| r.is_required()));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Front".parse::<Role>().unwrap(), Role::Front);
        assert_eq!(" side ".parse::<Role>().unwrap(), Role::Side);
        assert!("top".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Back).unwrap(), "\"back\"");
    }
}

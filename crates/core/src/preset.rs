//! Body preset (gender variant) selected by the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Gender variant forwarded to the service and used to pick the
/// measurement registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Male,
    #[default]
    Female,
}

impl Preset {
    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Male => "male",
            Preset::Female => "female",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Preset::Male),
            "female" => Ok(Preset::Female),
            other => Err(format!("Unknown preset: '{other}'. Valid presets: male, female")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for preset in [Preset::Male, Preset::Female] {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn rejects_unknown() {
        assert!("neutral".parse::<Preset>().is_err());
    }
}

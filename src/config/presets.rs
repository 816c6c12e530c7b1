//! Regulatory limit presets.
//!
//! - **FSSAI**: Food Safety and Standards Authority of India (default)
//! - **EU**: European Union national guidance
//! - **China**: GB 2716-2018
//! - **Codex**: Codex Alimentarius
//!
//! # Example
//!
//! ```rust
//! use foodoiliq::config::presets::RegulatoryStandard;
//!
//! let limits = RegulatoryStandard::China.limits();
//! assert_eq!(limits.tpc, 27.0);
//! ```

use crate::core::RegulatoryLimits;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RegulatoryStandard {
    #[default]
    Fssai,
    Eu,
    China,
    Codex,
}

impl RegulatoryStandard {
    pub const ALL: [RegulatoryStandard; 4] = [
        RegulatoryStandard::Fssai,
        RegulatoryStandard::Eu,
        RegulatoryStandard::China,
        RegulatoryStandard::Codex,
    ];

    pub fn limits(self) -> RegulatoryLimits {
        match self {
            RegulatoryStandard::Fssai | RegulatoryStandard::Eu | RegulatoryStandard::Codex => {
                RegulatoryLimits::new(0.3, 25.0, 10.0)
            }
            RegulatoryStandard::China => RegulatoryLimits::new(0.5, 27.0, 12.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RegulatoryStandard::Fssai => "FSSAI (India)",
            RegulatoryStandard::Eu => "EU Standards",
            RegulatoryStandard::China => "China (GB 2716-2018)",
            RegulatoryStandard::Codex => "Codex Alimentarius",
        }
    }

    /// Parse preset from string name (returns Option instead of Result).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fssai" | "india" => Some(RegulatoryStandard::Fssai),
            "eu" => Some(RegulatoryStandard::Eu),
            "china" | "gb2716" => Some(RegulatoryStandard::China),
            "codex" => Some(RegulatoryStandard::Codex),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegulatoryStandard::Fssai => "fssai",
            RegulatoryStandard::Eu => "eu",
            RegulatoryStandard::China => "china",
            RegulatoryStandard::Codex => "codex",
        }
    }
}

impl TryFrom<String> for RegulatoryStandard {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name).ok_or_else(|| {
            format!("unknown regulatory standard '{name}' (expected fssai, eu, china or codex)")
        })
    }
}

impl fmt::Display for RegulatoryStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fssai() {
        assert_eq!(RegulatoryStandard::default(), RegulatoryStandard::Fssai);
        assert_eq!(
            RegulatoryStandard::default().limits(),
            RegulatoryLimits::default()
        );
    }

    #[test]
    fn test_china_has_looser_limits() {
        let china = RegulatoryStandard::China.limits();
        assert_eq!(china, RegulatoryLimits::new(0.5, 27.0, 12.0));
    }

    #[test]
    fn test_parse_round_trips_names() {
        for standard in RegulatoryStandard::ALL {
            assert_eq!(RegulatoryStandard::parse(standard.as_str()), Some(standard));
        }
        assert_eq!(RegulatoryStandard::parse("CODEX"), Some(RegulatoryStandard::Codex));
        assert_eq!(RegulatoryStandard::parse("usda"), None);
    }

    #[test]
    fn test_deserialize_ignores_case() {
        let standard: RegulatoryStandard = serde_json::from_str("\"China\"").unwrap();
        assert_eq!(standard, RegulatoryStandard::China);
        assert_eq!(serde_json::to_string(&standard).unwrap(), "\"china\"");
        assert!(serde_json::from_str::<RegulatoryStandard>("\"usda\"").is_err());
    }

    #[test]
    fn test_every_preset_is_valid() {
        for standard in RegulatoryStandard::ALL {
            assert!(standard.limits().validate().is_ok(), "{standard}");
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compliance of a reading or a whole test against regulatory limits.
///
/// Variants are ordered by severity, so `Pass < Borderline < Reject`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Pass,
    Borderline,
    Reject,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Pass => "pass",
            ComplianceStatus::Borderline => "borderline",
            ComplianceStatus::Reject => "reject",
        }
    }

    /// Badge label printed on reports.
    pub fn badge_label(&self) -> &'static str {
        match self {
            ComplianceStatus::Pass => "PASSED",
            ComplianceStatus::Borderline => "BORDERLINE",
            ComplianceStatus::Reject => "REJECTED",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ComplianceStatus::Pass)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(ComplianceStatus::Pass < ComplianceStatus::Borderline);
        assert!(ComplianceStatus::Borderline < ComplianceStatus::Reject);
    }

    #[test]
    fn test_labels_and_wire_names() {
        assert_eq!(ComplianceStatus::Reject.badge_label(), "REJECTED");
        assert_eq!(ComplianceStatus::Borderline.to_string(), "borderline");
        assert_eq!(
            serde_json::to_string(&ComplianceStatus::Pass).unwrap(),
            "\"pass\""
        );
    }
}

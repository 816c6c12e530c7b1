use serde::{Deserialize, Serialize};

/// Reading levels above which an operator-facing recommendation is raised.
///
/// These are early-warning levels, set below the regulatory limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    pub ffa: f64,
    pub tpc: f64,
    pub pv: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            ffa: 0.2,
            tpc: 20.0,
            pv: 8.0,
        }
    }
}

pub const ALL_CLEAR: &str = "All parameters within optimal range";

/// Operator recommendations for a set of readings, most urgent marker first.
pub fn recommendations(
    ffa: f64,
    tpc: f64,
    pv: f64,
    thresholds: &RecommendationThresholds,
) -> Vec<String> {
    let checks = [
        (
            ffa > thresholds.ffa,
            "FFA levels elevated - consider oil replacement soon",
        ),
        (
            tpc > thresholds.tpc,
            "TPC approaching limits - increase monitoring frequency",
        ),
        (
            pv > thresholds.pv,
            "Peroxide value high - check storage conditions",
        ),
    ];

    let raised: Vec<String> = checks
        .iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, text)| (*text).to_string())
        .collect();

    if raised.is_empty() {
        vec![ALL_CLEAR.to_string()]
    } else {
        raised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_clear_when_nothing_elevated() {
        let recs = recommendations(0.1, 12.0, 4.0, &RecommendationThresholds::default());
        assert_eq!(recs, vec![ALL_CLEAR.to_string()]);
    }

    #[test]
    fn test_each_elevated_marker_raises_one_recommendation() {
        let recs = recommendations(0.25, 21.0, 9.0, &RecommendationThresholds::default());
        assert_eq!(recs.len(), 3);
        assert!(recs[0].starts_with("FFA"));
        assert!(recs[1].starts_with("TPC"));
        assert!(recs[2].starts_with("Peroxide"));
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let recs = recommendations(0.2, 20.0, 8.0, &RecommendationThresholds::default());
        assert_eq!(recs, vec![ALL_CLEAR.to_string()]);
    }
}

//! Oil-health score aggregation.
//!
//! Each parameter contributes `max(0, 100 - (value / limit) * 100)`; the
//! score is the rounded mean of the three contributions. The overall
//! classification comes from score bands, which are independent of the
//! per-parameter ratio rule in [`super::classifier`].

use crate::core::{ComplianceStatus, Parameter, RegulatoryLimits, ScoreResult};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score cut-offs for the overall classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBands {
    /// Minimum score (inclusive) for a pass
    pub pass: u8,
    /// Minimum score (inclusive) for borderline
    pub borderline: u8,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            pass: 75,
            borderline: 50,
        }
    }
}

impl ScoreBands {
    pub fn classify(&self, score: u8) -> ComplianceStatus {
        if score >= self.pass {
            ComplianceStatus::Pass
        } else if score >= self.borderline {
            ComplianceStatus::Borderline
        } else {
            ComplianceStatus::Reject
        }
    }
}

/// Contribution of one reading to the health score, in `[0, 100]`.
pub fn component_score(value: f64, limit: f64) -> f64 {
    (100.0 - (value / limit) * 100.0).max(0.0)
}

/// Aggregate three readings into a [`ScoreResult`] stamped with the current time.
pub fn aggregate(
    ffa: f64,
    tpc: f64,
    pv: f64,
    limits: &RegulatoryLimits,
    confidence: f64,
) -> Result<ScoreResult> {
    aggregate_at(ffa, tpc, pv, limits, confidence, Utc::now())
}

pub fn aggregate_at(
    ffa: f64,
    tpc: f64,
    pv: f64,
    limits: &RegulatoryLimits,
    confidence: f64,
    timestamp: DateTime<Utc>,
) -> Result<ScoreResult> {
    limits.validate()?;
    let values = [ffa, tpc, pv];
    for (parameter, value) in Parameter::ALL.into_iter().zip(values) {
        validate_reading(parameter, value)?;
    }

    let mut components: Vec<f64> = Parameter::ALL
        .into_iter()
        .zip(values)
        .map(|(p, v)| component_score(v, limits.get(p)))
        .collect();
    // Summing in a fixed order keeps the mean independent of argument order.
    components.sort_by(f64::total_cmp);
    let mean = components.iter().sum::<f64>() / components.len() as f64;
    let score = mean.round().clamp(0.0, 100.0) as u8;

    log::debug!(
        "aggregated ffa={ffa} tpc={tpc} pv={pv} into score {score} (components {components:?})"
    );

    Ok(ScoreResult {
        ffa,
        tpc,
        pv,
        score,
        classification: ScoreBands::default().classify(score),
        confidence: normalize_confidence(confidence),
        timestamp,
    })
}

fn validate_reading(parameter: Parameter, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidReading { parameter, value })
    }
}

fn normalize_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        log::warn!("confidence is NaN, recording 0%");
        return 0.0;
    }
    confidence.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> RegulatoryLimits {
        RegulatoryLimits::default()
    }

    #[test]
    fn test_component_score_floors_at_zero() {
        assert_eq!(component_score(0.0, 10.0), 100.0);
        assert_eq!(component_score(5.0, 10.0), 50.0);
        assert_eq!(component_score(15.0, 10.0), 0.0);
    }

    #[test]
    fn test_fresh_oil_scores_pass() {
        let result = aggregate(0.06, 5.0, 2.0, &limits(), 92.0).unwrap();
        assert_eq!(result.score, 80);
        assert_eq!(result.classification, ComplianceStatus::Pass);
        assert_eq!(result.confidence, 92.0);
    }

    #[test]
    fn test_sample_readings_follow_the_formula() {
        // components: 40, 26, 18 -> mean 28
        let result = aggregate(0.18, 18.5, 8.2, &limits(), 90.0).unwrap();
        assert_eq!(result.score, 28);
        assert_eq!(result.classification, ComplianceStatus::Reject);
    }

    #[test]
    fn test_score_bands() {
        let bands = ScoreBands::default();
        assert_eq!(bands.classify(100), ComplianceStatus::Pass);
        assert_eq!(bands.classify(75), ComplianceStatus::Pass);
        assert_eq!(bands.classify(74), ComplianceStatus::Borderline);
        assert_eq!(bands.classify(50), ComplianceStatus::Borderline);
        assert_eq!(bands.classify(49), ComplianceStatus::Reject);
        assert_eq!(bands.classify(0), ComplianceStatus::Reject);
    }

    #[test]
    fn test_readings_over_limit_score_zero() {
        let result = aggregate(0.6, 50.0, 20.0, &limits(), 88.0).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.classification, ComplianceStatus::Reject);
    }

    #[test]
    fn test_invalid_readings_are_rejected() {
        let err = aggregate(f64::NAN, 10.0, 5.0, &limits(), 90.0).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidReading {
                parameter: Parameter::Ffa,
                ..
            }
        ));

        let err = aggregate(0.1, 10.0, -1.0, &limits(), 90.0).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidReading {
                parameter: Parameter::Pv,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_limits_are_rejected() {
        let bad = RegulatoryLimits::new(0.3, 0.0, 10.0);
        assert!(matches!(
            aggregate(0.1, 10.0, 5.0, &bad, 90.0),
            Err(Error::InvalidLimit { .. })
        ));
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(
            aggregate(0.1, 10.0, 5.0, &limits(), 140.0).unwrap().confidence,
            100.0
        );
        assert_eq!(
            aggregate(0.1, 10.0, 5.0, &limits(), f64::NAN)
                .unwrap()
                .confidence,
            0.0
        );
    }

    #[test]
    fn test_timestamp_is_carried_through() {
        let at = DateTime::parse_from_rfc3339("2024-01-15T14:32:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = aggregate_at(0.1, 10.0, 5.0, &limits(), 90.0, at).unwrap();
        assert_eq!(result.timestamp, at);
    }
}

//! Full assessment of one test: aggregate score plus per-parameter detail.

use super::{aggregate_at, classify_reading, recommendations, RecommendationThresholds};
use crate::core::{ComplianceStatus, ParameterReading, RegulatoryLimits, ScoreResult};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parameter judged by both the ratio rule and the plain limit check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterAssessment {
    pub reading: ParameterReading,
    pub status: ComplianceStatus,
    pub within_limit: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub result: ScoreResult,
    pub limits: RegulatoryLimits,
    pub parameters: Vec<ParameterAssessment>,
    pub recommendations: Vec<String>,
}

impl Assessment {
    /// Most severe per-parameter status.
    pub fn worst_parameter_status(&self) -> ComplianceStatus {
        self.parameters
            .iter()
            .map(|p| p.status)
            .max()
            .unwrap_or(ComplianceStatus::Pass)
    }
}

/// Assess a score result that has already been aggregated.
pub fn assess_result(
    result: ScoreResult,
    limits: &RegulatoryLimits,
    thresholds: &RecommendationThresholds,
) -> Result<Assessment> {
    let parameters = result
        .readings(limits)
        .iter()
        .map(|reading| {
            Ok(ParameterAssessment {
                reading: *reading,
                status: classify_reading(reading)?,
                within_limit: reading.within_limit(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Assessment {
        recommendations: recommendations(result.ffa, result.tpc, result.pv, thresholds),
        result,
        limits: *limits,
        parameters,
    })
}

pub fn assess(
    ffa: f64,
    tpc: f64,
    pv: f64,
    limits: &RegulatoryLimits,
    confidence: f64,
    thresholds: &RecommendationThresholds,
    at: DateTime<Utc>,
) -> Result<Assessment> {
    let result = aggregate_at(ffa, tpc, pv, limits, confidence, at)?;
    assess_result(result, limits, thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parameter;

    #[test]
    fn test_rules_are_applied_per_call_site() {
        // TPC at 24 is borderline by ratio but still within the limit;
        // the aggregate score lands in the reject band.
        let assessment = assess(
            0.25,
            24.0,
            9.0,
            &RegulatoryLimits::default(),
            90.0,
            &RecommendationThresholds::default(),
            Utc::now(),
        )
        .unwrap();

        let tpc = &assessment.parameters[1];
        assert_eq!(tpc.reading.parameter, Parameter::Tpc);
        assert_eq!(tpc.status, ComplianceStatus::Borderline);
        assert!(tpc.within_limit);
        assert_eq!(assessment.result.classification, ComplianceStatus::Reject);
        assert_eq!(
            assessment.worst_parameter_status(),
            ComplianceStatus::Borderline
        );
        assert_eq!(assessment.recommendations.len(), 3);
    }
}

//! Per-parameter compliance classification.
//!
//! A reading is judged by its ratio to the regulatory limit. Readings up to
//! 70% of the limit pass, readings up to the limit itself are borderline,
//! and anything above the limit is rejected. Both cut-offs belong to the
//! lower band.

use crate::core::{validate_limit, ComplianceStatus, ParameterReading};
use crate::errors::Result;

/// Upper bound (inclusive) of the `value / limit` ratio for a pass.
pub const PASS_RATIO: f64 = 0.7;

/// Upper bound (inclusive) of the `value / limit` ratio for borderline.
pub const BORDERLINE_RATIO: f64 = 1.0;

// Absorbs representation error, e.g. 0.21 / 0.3 == 0.7000000000000001.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Classify a measured value against its regulatory limit.
///
/// `value` is not validated: zero and negative readings pass through and
/// classify as `Pass`.
pub fn classify(value: f64, limit: f64) -> Result<ComplianceStatus> {
    validate_limit(limit)?;
    Ok(classify_ratio(value / limit))
}

pub fn classify_reading(reading: &ParameterReading) -> Result<ComplianceStatus> {
    classify(reading.value, reading.limit)
}

fn classify_ratio(ratio: f64) -> ComplianceStatus {
    if ratio <= PASS_RATIO + RATIO_TOLERANCE {
        ComplianceStatus::Pass
    } else if ratio <= BORDERLINE_RATIO + RATIO_TOLERANCE {
        ComplianceStatus::Borderline
    } else {
        ComplianceStatus::Reject
    }
}

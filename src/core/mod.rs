//! Data model shared by scoring, reporting and the repositories.

pub mod parameter;
pub mod status;

pub use parameter::{Parameter, ParameterReading};
pub use status::ComplianceStatus;

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum permitted value for each measured parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryLimits {
    pub ffa: f64,
    pub tpc: f64,
    pub pv: f64,
}

impl Default for RegulatoryLimits {
    fn default() -> Self {
        Self {
            ffa: 0.3,
            tpc: 25.0,
            pv: 10.0,
        }
    }
}

impl RegulatoryLimits {
    pub fn new(ffa: f64, tpc: f64, pv: f64) -> Self {
        Self { ffa, tpc, pv }
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ffa => self.ffa,
            Parameter::Tpc => self.tpc,
            Parameter::Pv => self.pv,
        }
    }

    /// Fails with `InvalidLimit` on the first limit that is not finite and positive.
    pub fn validate(&self) -> Result<()> {
        Parameter::ALL
            .iter()
            .map(|&p| self.get(p))
            .try_for_each(validate_limit)
    }
}

/// A limit is usable when it is finite and strictly positive.
pub fn validate_limit(limit: f64) -> Result<()> {
    if limit.is_finite() && limit > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidLimit { limit })
    }
}

/// Outcome of one oil test: the three readings, the aggregate health score
/// and the overall classification derived from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub ffa: f64,
    pub tpc: f64,
    pub pv: f64,
    pub score: u8,
    pub classification: ComplianceStatus,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl ScoreResult {
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Ffa => self.ffa,
            Parameter::Tpc => self.tpc,
            Parameter::Pv => self.pv,
        }
    }

    /// Readings paired with the limits they were judged against.
    pub fn readings(&self, limits: &RegulatoryLimits) -> [ParameterReading; 3] {
        Parameter::ALL.map(|p| ParameterReading::new(p, self.value(p), limits.get(p)))
    }
}

//! Configuration loaded from `.foodoiliq.toml`.

pub mod loader;
pub mod presets;

pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from, parse_and_validate_config,
};
pub use presets::RegulatoryStandard;

use crate::core::RegulatoryLimits;
use crate::errors::Result;
use crate::scoring::RecommendationThresholds;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".foodoiliq.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodOilConfig {
    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub recommendations: RecommendationThresholds,
}

/// Regulatory limits: a preset, optionally overridden per parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub standard: Option<RegulatoryStandard>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffa: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpc: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv: Option<f64>,
}

impl LimitsConfig {
    pub fn standard(&self) -> RegulatoryStandard {
        self.standard.unwrap_or_default()
    }

    /// Preset limits with explicit values layered on top, validated.
    pub fn resolve(&self) -> Result<RegulatoryLimits> {
        let base = self.standard().limits();
        let limits = RegulatoryLimits {
            ffa: self.ffa.unwrap_or(base.ffa),
            tpc: self.tpc.unwrap_or(base.tpc),
            pv: self.pv.unwrap_or(base.pv),
        };
        limits.validate()?;
        Ok(limits)
    }
}

/// Optional display fields stamped onto generated reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
}

impl FoodOilConfig {
    pub fn limits(&self) -> Result<RegulatoryLimits> {
        self.limits.resolve()
    }
}

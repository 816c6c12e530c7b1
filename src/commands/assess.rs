use crate::config::{FoodOilConfig, RegulatoryStandard};
use crate::io::output::OutputWriter;
use crate::scoring::assess;
use anyhow::Result;
use chrono::Utc;

#[derive(Debug, Clone, Copy)]
pub struct AssessArgs {
    pub ffa: f64,
    pub tpc: f64,
    pub pv: f64,
    pub confidence: f64,
    pub standard: Option<RegulatoryStandard>,
}

/// An explicit standard replaces the configured limits entirely.
pub fn assess_readings(
    args: AssessArgs,
    config: &FoodOilConfig,
    writer: &mut dyn OutputWriter,
) -> Result<()> {
    let (limits, standard) = match args.standard {
        Some(standard) => (standard.limits(), Some(standard)),
        None => (config.limits()?, config.limits.standard),
    };

    let assessment = assess(
        args.ffa,
        args.tpc,
        args.pv,
        &limits,
        args.confidence,
        &config.recommendations,
        Utc::now(),
    )?;
    writer.write_assessment(&assessment, standard)
}

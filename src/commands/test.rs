use crate::config::FoodOilConfig;
use crate::io::output::OutputWriter;
use crate::prediction::{FallbackPredictor, LocalSimulator, Predictor, UnavailablePredictor};
use crate::progress::{ProgressConfig, TestProgress};
use crate::report::compose;
use crate::session::{PhaseObserver, TestPhase, TestSession};
use crate::store::{AlertRepository, BatchRepository};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;

/// Inference endpoint the dashboard talks to when online.
pub const DEFAULT_API_URL: &str = "/api";

#[derive(Debug, Clone, Default)]
pub struct TestArgs {
    pub batch: String,
    pub seed: Option<u64>,
    pub report_dir: Option<PathBuf>,
    pub offline_api: bool,
}

pub fn build_predictor(
    config: &FoodOilConfig,
    seed: Option<u64>,
    offline_api: bool,
) -> Result<Box<dyn Predictor>> {
    let limits = config.limits()?;
    let simulator = match seed {
        Some(seed) => LocalSimulator::with_seed(seed, limits),
        None => LocalSimulator::new(limits),
    }
    .with_thresholds(config.recommendations);

    Ok(if offline_api {
        Box::new(FallbackPredictor::new(
            UnavailablePredictor::new(DEFAULT_API_URL),
            simulator,
        ))
    } else {
        Box::new(simulator)
    })
}

pub fn run_test(
    args: &TestArgs,
    config: &FoodOilConfig,
    batches: &dyn BatchRepository,
    alerts: &dyn AlertRepository,
    progress: &ProgressConfig,
    writer: &mut dyn OutputWriter,
) -> Result<()> {
    let predictor = build_predictor(config, args.seed, args.offline_api)?;
    let bar = TestProgress::new(progress);

    let mut session = TestSession::new(batches, alerts, predictor.as_ref())
        .with_observer(|phase: TestPhase, percent: u8| bar.on_phase(phase, percent));
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }
    if let Some(operator) = &config.report.operator_name {
        session = session.with_operator(operator.clone());
    }

    let outcome = session.run(&args.batch);
    drop(session);
    bar.finish();
    let outcome = outcome.with_context(|| format!("Test of batch {} failed", args.batch))?;

    let summary = match &args.report_dir {
        Some(dir) => {
            let data = outcome.report_data(config)?;
            let document = compose(&data, Utc::now())?;
            Some(super::report::write_document(&document, Some(dir.as_path()))?)
        }
        None => None,
    };

    writer.write_test_outcome(&outcome, summary.as_ref())
}

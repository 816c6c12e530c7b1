//! One oil test from sensor capture to stored result.
//!
//! A [`TestSession`] walks the phases `Preparing -> Scanning -> Analyzing ->
//! Complete`, records the outcome in the batch repository and raises an
//! alert for anything that did not pass. Any failure leaves the session in
//! [`TestPhase::Error`].

use crate::config::FoodOilConfig;
use crate::errors::{Error, Result};
use crate::prediction::{Prediction, Predictor, SensorData};
use crate::report::{ReportData, ReportResults};
use crate::store::{Alert, AlertRepository, Batch, BatchRepository, NewTestRecord, TestRecord};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress reported once the scan itself has been captured.
const SCAN_CAPTURED_PROGRESS: u8 = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPhase {
    #[default]
    Idle,
    Preparing,
    Scanning,
    Analyzing,
    Complete,
    Error,
}

impl TestPhase {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "Ready to scan",
            Self::Preparing => "Preparing sensor...",
            Self::Scanning => "Scanning oil sample...",
            Self::Analyzing => "AI analyzing results...",
            Self::Complete => "Test complete!",
            Self::Error => "Test failed",
        }
    }

    /// Progress percentage on entering the phase; `None` keeps the current value.
    pub fn progress(&self) -> Option<u8> {
        match self {
            Self::Idle => Some(0),
            Self::Preparing => Some(10),
            Self::Scanning => Some(30),
            Self::Analyzing => Some(75),
            Self::Complete => Some(100),
            Self::Error => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Preparing | Self::Scanning | Self::Analyzing)
    }
}

impl fmt::Display for TestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives every phase change together with the progress percentage.
pub trait PhaseObserver {
    fn on_phase(&self, phase: TestPhase, progress: u8);
}

impl<F: Fn(TestPhase, u8)> PhaseObserver for F {
    fn on_phase(&self, phase: TestPhase, progress: u8) {
        self(phase, progress)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub prediction: Prediction,
    pub record: TestRecord,
    pub alert: Option<Alert>,
    /// The batch as updated by this test.
    pub batch: Batch,
}

impl TestOutcome {
    /// Snapshot for the report composer, stamped with the configured
    /// company and operator details.
    pub fn report_data(&self, config: &FoodOilConfig) -> Result<ReportData> {
        Ok(ReportData {
            batch_id: Some(self.batch.id.clone()),
            test_date: Some(self.prediction.result.timestamp),
            station_name: Some(self.batch.station_name.clone()),
            location: Some(self.batch.location.clone()),
            equipment: Some(self.batch.equipment.clone()),
            oil_type: Some(self.batch.oil_type.clone()),
            operator_name: config.report.operator_name.clone(),
            company_name: config.report.company_name.clone(),
            company_address: config.report.company_address.clone(),
            results: ReportResults::from(&self.prediction.result),
            limits: config.limits()?,
        })
    }
}

pub struct TestSession<'a> {
    batches: &'a dyn BatchRepository,
    alerts: &'a dyn AlertRepository,
    predictor: &'a dyn Predictor,
    observer: Option<Box<dyn PhaseObserver + 'a>>,
    operator_id: Option<String>,
    rng: StdRng,
    phase: TestPhase,
    progress: u8,
}

impl<'a> TestSession<'a> {
    pub fn new(
        batches: &'a dyn BatchRepository,
        alerts: &'a dyn AlertRepository,
        predictor: &'a dyn Predictor,
    ) -> Self {
        Self {
            batches,
            alerts,
            predictor,
            observer: None,
            operator_id: None,
            rng: StdRng::from_os_rng(),
            phase: TestPhase::Idle,
            progress: 0,
        }
    }

    /// Seed the sensor capture for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_observer(mut self, observer: impl PhaseObserver + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn with_operator(mut self, operator_id: impl Into<String>) -> Self {
        self.operator_id = Some(operator_id.into());
        self
    }

    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn run(&mut self, batch_id: &str) -> Result<TestOutcome> {
        let outcome = self.execute(batch_id);
        if let Err(err) = &outcome {
            log::warn!("Test of batch {} failed: {}", batch_id, err);
            self.enter(TestPhase::Error);
        }
        outcome
    }

    fn execute(&mut self, batch_id: &str) -> Result<TestOutcome> {
        let batch = self
            .batches
            .batch(batch_id)
            .ok_or_else(|| Error::not_found("batch", batch_id))?;

        self.enter(TestPhase::Preparing);

        self.enter(TestPhase::Scanning);
        let data = SensorData::simulate(&mut self.rng, Some(batch.id.clone()));
        self.report_progress(SCAN_CAPTURED_PROGRESS);

        self.enter(TestPhase::Analyzing);
        let prediction = self.predictor.predict(&data)?;
        let result = &prediction.result;

        let record = self.batches.add_test_record(NewTestRecord {
            batch_id: batch.id.clone(),
            result: result.clone(),
            operator_id: self.operator_id.clone(),
        });
        let batch =
            self.batches
                .update_batch_from_test(&batch.id, result.score, result.classification)?;
        let alert = self.alerts.create_test_result_alert(
            result.classification,
            result.score,
            &batch.id,
            Some(&batch.station_id),
        );

        self.enter(TestPhase::Complete);
        log::info!(
            "Test {} completed: {} (score {})",
            record.id,
            record.classification.badge_label(),
            record.score
        );

        Ok(TestOutcome {
            prediction,
            record,
            alert,
            batch,
        })
    }

    fn enter(&mut self, phase: TestPhase) {
        self.phase = phase;
        if let Some(progress) = phase.progress() {
            self.progress = progress;
        }
        log::info!("{}", phase.message());
        self.notify();
    }

    fn report_progress(&mut self, progress: u8) {
        self.progress = progress;
        self.notify();
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer.on_phase(self.phase, self.progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ComplianceStatus, RegulatoryLimits};
    use crate::prediction::{FallbackPredictor, LocalSimulator, UnavailablePredictor};
    use crate::store::{AlertFilter, InMemoryAlertRepository, InMemoryBatchRepository};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[test]
    fn test_phase_messages_and_progress() {
        assert_eq!(TestPhase::Idle.message(), "Ready to scan");
        assert_eq!(TestPhase::Analyzing.message(), "AI analyzing results...");
        assert_eq!(TestPhase::Error.message(), "Test failed");
        assert_eq!(TestPhase::Scanning.progress(), Some(30));
        assert_eq!(TestPhase::Error.progress(), None);
        assert!(TestPhase::Scanning.is_running());
        assert!(!TestPhase::Complete.is_running());
    }

    #[test]
    fn test_run_records_updates_and_reports_phases() {
        let batches = InMemoryBatchRepository::with_sample_data();
        let alerts = InMemoryAlertRepository::new();
        let predictor = LocalSimulator::with_seed(11, RegulatoryLimits::default());
        let seen = RefCell::new(Vec::new());

        let mut session = TestSession::new(&batches, &alerts, &predictor)
            .with_seed(5)
            .with_operator("op-1")
            .with_observer(|phase: TestPhase, progress: u8| seen.borrow_mut().push((phase, progress)));
        let outcome = session.run("BATCH-2024-0115-A").unwrap();

        assert_eq!(session.phase(), TestPhase::Complete);
        assert_eq!(session.progress(), 100);
        drop(session);
        assert_eq!(
            seen.into_inner(),
            vec![
                (TestPhase::Preparing, 10),
                (TestPhase::Scanning, 30),
                (TestPhase::Scanning, 60),
                (TestPhase::Analyzing, 75),
                (TestPhase::Complete, 100),
            ]
        );

        assert_eq!(outcome.batch.tests_count, 4);
        assert_eq!(outcome.batch.current_score, Some(outcome.record.score));
        assert_eq!(outcome.record.operator_id.as_deref(), Some("op-1"));
        assert_eq!(batches.test_records(Some("BATCH-2024-0115-A")).len(), 1);

        let raised = alerts.alerts(&AlertFilter::default()).len();
        match outcome.prediction.result.classification {
            ComplianceStatus::Pass => {
                assert!(outcome.alert.is_none());
                assert_eq!(raised, 0);
            }
            _ => {
                let alert = outcome.alert.as_ref().unwrap();
                assert_eq!(alert.station_id.as_deref(), Some("STATION-A1"));
                assert_eq!(raised, 1);
            }
        }
    }

    #[test]
    fn test_unknown_batch_ends_in_error() {
        let batches = InMemoryBatchRepository::with_sample_data();
        let alerts = InMemoryAlertRepository::new();
        let predictor = LocalSimulator::with_seed(1, RegulatoryLimits::default());

        let mut session = TestSession::new(&batches, &alerts, &predictor);
        let err = session.run("BATCH-NOPE").unwrap_err();

        assert!(matches!(err, Error::NotFound { kind: "batch", .. }));
        assert_eq!(session.phase(), TestPhase::Error);
        assert!(batches.test_records(None).is_empty());
    }

    #[test]
    fn test_prediction_failure_keeps_progress() {
        let batches = InMemoryBatchRepository::with_sample_data();
        let alerts = InMemoryAlertRepository::new();
        let predictor = UnavailablePredictor::new("http://localhost:8000");

        let mut session = TestSession::new(&batches, &alerts, &predictor);
        assert!(matches!(
            session.run("BATCH-2024-0115-B"),
            Err(Error::Prediction(_))
        ));
        assert_eq!(session.phase(), TestPhase::Error);
        assert_eq!(session.progress(), 75);
        assert_eq!(
            batches.batch("BATCH-2024-0115-B").unwrap().tests_count,
            2
        );
    }

    #[test]
    fn test_report_data_from_outcome() {
        let batches = InMemoryBatchRepository::with_sample_data();
        let alerts = InMemoryAlertRepository::new();
        let predictor = FallbackPredictor::new(
            UnavailablePredictor::new("http://localhost:8000"),
            LocalSimulator::with_seed(3, RegulatoryLimits::default()),
        );
        let outcome = TestSession::new(&batches, &alerts, &predictor)
            .run("BATCH-2024-0115-C")
            .unwrap();

        let mut config = FoodOilConfig::default();
        config.report.operator_name = Some("Priya".into());
        let data = outcome.report_data(&config).unwrap();

        assert_eq!(data.batch_id.as_deref(), Some("BATCH-2024-0115-C"));
        assert_eq!(data.station_name.as_deref(), Some("Fryer A3"));
        assert_eq!(data.oil_type.as_deref(), Some("Refined Sunflower Oil"));
        assert_eq!(data.operator_name.as_deref(), Some("Priya"));
        assert_eq!(data.results.score, outcome.record.score);
        assert_eq!(data.limits, RegulatoryLimits::default());
        assert!(crate::report::compose(&data, outcome.record.timestamp).is_ok());
    }
}

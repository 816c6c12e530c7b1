use super::{HealthStatus, Prediction, Predictor, PredictorHealth, SensorData};
use crate::core::RegulatoryLimits;
use crate::errors::Result;
use crate::scoring::{aggregate, recommendations, RecommendationThresholds};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const LOCAL_MODEL_VERSION: &str = "local-v1.0.0";

/// Produces plausible readings from a random generator instead of a model.
pub struct LocalSimulator {
    rng: Mutex<StdRng>,
    limits: RegulatoryLimits,
    thresholds: RecommendationThresholds,
}

impl LocalSimulator {
    pub fn new(limits: RegulatoryLimits) -> Self {
        Self::from_rng(StdRng::from_os_rng(), limits)
    }

    /// Deterministic simulator for reproducible runs.
    pub fn with_seed(seed: u64, limits: RegulatoryLimits) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), limits)
    }

    fn from_rng(rng: StdRng, limits: RegulatoryLimits) -> Self {
        Self {
            rng: Mutex::new(rng),
            limits,
            thresholds: RecommendationThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: RecommendationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sensor capture drawn from this simulator's generator.
    pub fn capture(&self, sample_id: Option<String>) -> SensorData {
        SensorData::simulate(&mut *self.rng.lock(), sample_id)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl Predictor for LocalSimulator {
    fn predict(&self, data: &SensorData) -> Result<Prediction> {
        let (ffa, tpc, pv, confidence) = {
            let mut rng = self.rng.lock();
            (
                round_to(rng.random_range(0.10..0.35), 2),
                round_to(rng.random_range(10.0..28.0), 1),
                round_to(rng.random_range(3.0..12.0), 1),
                rng.random_range(85.0..97.0),
            )
        };
        log::debug!(
            "Simulated prediction for {}: ffa={} tpc={} pv={}",
            data.sample_id.as_deref().unwrap_or("unnamed sample"),
            ffa,
            tpc,
            pv
        );

        let result = aggregate(ffa, tpc, pv, &self.limits, confidence)?;
        Ok(Prediction {
            recommendations: recommendations(ffa, tpc, pv, &self.thresholds),
            result,
            model_version: LOCAL_MODEL_VERSION.to_string(),
        })
    }

    fn health(&self) -> PredictorHealth {
        PredictorHealth {
            status: HealthStatus::Healthy,
            version: LOCAL_MODEL_VERSION.to_string(),
        }
    }
}

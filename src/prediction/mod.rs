//! Oil-quality prediction behind a [`Predictor`] trait.
//!
//! The production inference service is out of process; this crate ships
//! a seeded [`LocalSimulator`] and a [`FallbackPredictor`] that degrades
//! to it when the primary predictor fails.

pub mod fallback;
pub mod simulator;

pub use fallback::{FallbackPredictor, UnavailablePredictor};
pub use simulator::{LocalSimulator, LOCAL_MODEL_VERSION};

use crate::core::ScoreResult;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const SPECTRAL_FEATURE_COUNT: usize = 10;

/// Raw sensor capture for one oil sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    pub spectral_features: Vec<f64>,
    /// Sample temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl SensorData {
    /// Simulated capture: ten spectral features, 22-25 °C, 45-60 % RH.
    pub fn simulate<R: Rng + ?Sized>(rng: &mut R, sample_id: Option<String>) -> Self {
        Self {
            spectral_features: (0..SPECTRAL_FEATURE_COUNT)
                .map(|_| rng.random::<f64>())
                .collect(),
            temperature: rng.random_range(22.0..25.0),
            humidity: rng.random_range(45.0..60.0),
            sample_id,
            captured_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub result: ScoreResult,
    pub recommendations: Vec<String>,
    pub model_version: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorHealth {
    pub status: HealthStatus,
    pub version: String,
}

pub trait Predictor: Send + Sync {
    fn predict(&self, data: &SensorData) -> Result<Prediction>;

    fn health(&self) -> PredictorHealth;
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, data: &SensorData) -> Result<Prediction> {
        (**self).predict(data)
    }

    fn health(&self) -> PredictorHealth {
        (**self).health()
    }
}

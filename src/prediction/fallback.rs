use super::{HealthStatus, Prediction, Predictor, PredictorHealth, SensorData};
use crate::errors::{Error, Result};

/// Tries `primary` first and answers from `fallback` when it fails.
pub struct FallbackPredictor<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Predictor, F: Predictor> FallbackPredictor<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Predictor, F: Predictor> Predictor for FallbackPredictor<P, F> {
    fn predict(&self, data: &SensorData) -> Result<Prediction> {
        match self.primary.predict(data) {
            Ok(prediction) => Ok(prediction),
            Err(err) => {
                log::warn!("Primary predictor failed ({}), using local fallback", err);
                self.fallback.predict(data)
            }
        }
    }

    fn health(&self) -> PredictorHealth {
        let primary = self.primary.health();
        if primary.status == HealthStatus::Healthy {
            return primary;
        }
        let fallback = self.fallback.health();
        PredictorHealth {
            status: match fallback.status {
                HealthStatus::Unavailable => HealthStatus::Unavailable,
                _ => HealthStatus::Degraded,
            },
            version: fallback.version,
        }
    }
}

/// A remote predictor that cannot be reached.
#[derive(Debug, Clone)]
pub struct UnavailablePredictor {
    endpoint: String,
}

impl UnavailablePredictor {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Predictor for UnavailablePredictor {
    fn predict(&self, _data: &SensorData) -> Result<Prediction> {
        Err(Error::Prediction(format!(
            "inference service at {} is unreachable",
            self.endpoint
        )))
    }

    fn health(&self) -> PredictorHealth {
        PredictorHealth {
            status: HealthStatus::Unavailable,
            version: "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RegulatoryLimits;
    use crate::prediction::{LocalSimulator, LOCAL_MODEL_VERSION};

    #[test]
    fn test_falls_back_when_primary_fails() {
        let sim = LocalSimulator::with_seed(1, RegulatoryLimits::default());
        let data = sim.capture(None);
        let predictor =
            FallbackPredictor::new(UnavailablePredictor::new("http://localhost:8000"), sim);

        let prediction = predictor.predict(&data).unwrap();
        assert_eq!(prediction.model_version, LOCAL_MODEL_VERSION);

        let health = predictor.health();
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(health.version, LOCAL_MODEL_VERSION);
    }

    #[test]
    fn test_fallback_error_propagates() {
        let sim = LocalSimulator::with_seed(1, RegulatoryLimits::default());
        let data = sim.capture(None);
        let predictor = FallbackPredictor::new(
            UnavailablePredictor::new("http://a"),
            UnavailablePredictor::new("http://b"),
        );

        let err = predictor.predict(&data).unwrap_err();
        assert!(err.to_string().contains("http://b"));
        assert_eq!(predictor.health().status, HealthStatus::Unavailable);
    }
}

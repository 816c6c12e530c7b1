//! Scoring and compliance classification.
//!
//! Three comparison rules coexist and are applied per call site:
//! - [`classify`]: ratio to limit, for individual parameter readings
//! - [`ScoreBands`]: aggregate score bands, for the overall test result
//! - [`ParameterReading::within_limit`](crate::core::ParameterReading::within_limit):
//!   plain `value <= limit`, for the report's parameter table

pub mod aggregator;
pub mod assessment;
pub mod classifier;
pub mod recommendations;

pub use aggregator::{aggregate, aggregate_at, component_score, ScoreBands};
pub use assessment::{assess, assess_result, Assessment, ParameterAssessment};
pub use classifier::{classify, classify_reading, BORDERLINE_RATIO, PASS_RATIO};
pub use recommendations::{recommendations, RecommendationThresholds};

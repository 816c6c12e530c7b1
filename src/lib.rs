// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod prediction;
pub mod progress;
pub mod report;
pub mod scoring;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    ComplianceStatus, Parameter, ParameterReading, RegulatoryLimits, ScoreResult,
};

pub use crate::config::{FoodOilConfig, RegulatoryStandard};

pub use crate::errors::{Error, Result};

pub use crate::scoring::{
    aggregate, assess, classify, recommendations, Assessment, RecommendationThresholds,
};

pub use crate::report::{compose, ReportData, ReportDocument, ReportResults};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::prediction::{LocalSimulator, Prediction, Predictor, SensorData};

pub use crate::session::{TestOutcome, TestPhase, TestSession};

//! Error types for foodoiliq operations.
//!
//! Scoring and report composition are pure, so their failures are always
//! caused by the input: a non-positive limit, a reading that is not a usable
//! number, or a report missing compliance metadata. These surface to the
//! immediate caller and are never swallowed.
//!
//! # Error Codes
//!
//! Each variant carries a stable code for programmatic handling:
//! - E001-E009: I/O and filesystem errors
//! - E010-E019: Input validation errors (limits, readings, report fields)
//! - E020-E029: Configuration errors
//! - E030-E039: Lookup and collaborator errors
//!
//! # Example
//!
//! ```rust
//! use foodoiliq::errors::Error;
//! use foodoiliq::scoring::classify;
//!
//! let err = classify(0.2, 0.0).unwrap_err();
//! assert!(matches!(err, Error::InvalidLimit { .. }));
//! assert_eq!(err.code(), "E010");
//! assert!(err.is_user_fixable());
//! ```

use crate::core::Parameter;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for foodoiliq operations
#[derive(Debug, Error)]
pub enum Error {
    /// A regulatory limit was zero, negative or not finite
    #[error("invalid limit {limit}: limits must be finite and greater than zero")]
    InvalidLimit { limit: f64 },

    /// A measured reading was NaN, infinite or negative
    #[error("invalid {parameter} reading {value}: readings must be finite and non-negative")]
    InvalidReading { parameter: Parameter, value: f64 },

    /// A required report field was absent or blank
    #[error("missing required report field `{field}`")]
    MissingField { field: &'static str },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// A referenced station, batch or alert does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The prediction collaborator failed
    #[error("prediction unavailable: {0}")]
    Prediction(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error without a file context
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error tied to a file
    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable error code for documentation lookup.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E001",
            Self::InvalidLimit { .. } => "E010",
            Self::InvalidReading { .. } => "E011",
            Self::MissingField { .. } => "E012",
            Self::Json(_) => "E013",
            Self::Config { .. } => "E020",
            Self::Toml(_) => "E021",
            Self::NotFound { .. } => "E030",
            Self::Prediction(_) => "E031",
        }
    }

    /// Whether the user can fix this error by changing their input.
    pub fn is_user_fixable(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Prediction(_))
    }

    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Prediction(_))
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for Canopy

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanopyError {
    // Caller input errors
    #[error("Invalid geographic bounds: {reason}")]
    InvalidBounds { reason: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Project start date {project_start} must be before analysis date {analysis_date}")]
    InvalidAnalysisPeriod {
        project_start: NaiveDate,
        analysis_date: NaiveDate,
    },

    #[error("Unknown vegetation index: {name}")]
    UnknownIndex { name: String },

    #[error("{index} value {value} is outside the valid range [-1, 1]")]
    InvalidIndexValue { index: String, value: f64 },

    #[error("Provider {provider} does not support the {index} index")]
    UnsupportedIndex { provider: String, index: String },

    // Provider errors
    #[error("Provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("No imagery available from {provider} between {start} and {end}")]
    NoImageryAvailable {
        provider: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Provider {provider} timed out during {operation}")]
    Timeout { provider: String, operation: String },

    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CanopyError {
    /// Errors caused by the caller's request rather than by a provider.
    ///
    /// These are always propagated and never retried or masked by fallback.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CanopyError::InvalidBounds { .. }
                | CanopyError::InvalidDateRange { .. }
                | CanopyError::InvalidAnalysisPeriod { .. }
                | CanopyError::UnknownIndex { .. }
                | CanopyError::InvalidIndexValue { .. }
                | CanopyError::UnsupportedIndex { .. }
        )
    }

    /// Errors a live provider strategy may recover from by switching to synthetic data
    pub fn is_recoverable_by_fallback(&self) -> bool {
        matches!(self, CanopyError::ProviderUnavailable { .. } | CanopyError::Timeout { .. })
    }
}

impl From<serde_json::Error> for CanopyError {
    fn from(err: serde_json::Error) -> Self {
        CanopyError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CanopyError>;

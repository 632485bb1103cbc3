//! Error types for sentiview
//!
//! This module provides error handling using thiserror for structured
//! error definitions and anyhow for error propagation at the edges.

use thiserror::Error;

/// Main error type for sentiview operations
#[derive(Error, Debug)]
pub enum SentiviewError {
    /// Feedback text rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure, non-2xx response or malformed response body
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// A durable record could not be decoded
    #[error("Corrupt stored record '{key}': {reason}")]
    StorageCorrupt { key: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for sentiview operations
pub type Result<T> = std::result::Result<T, SentiviewError>;

/// Convert anyhow::Error to SentiviewError
impl From<anyhow::Error> for SentiviewError {
    fn from(err: anyhow::Error) -> Self {
        SentiviewError::Other(err.to_string())
    }
}

/// Any reqwest failure is a failed prediction from the caller's point of view
impl From<reqwest::Error> for SentiviewError {
    fn from(err: reqwest::Error) -> Self {
        SentiviewError::PredictionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SentiviewError::PredictionFailed("timeout".to_string());
        assert_eq!(err.to_string(), "Prediction failed: timeout");

        let err = SentiviewError::StorageCorrupt {
            key: "sentimentCounts".to_string(),
            reason: "EOF while parsing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt stored record 'sentimentCounts': EOF while parsing"
        );
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<Vec<u64>>("[1, 2").unwrap_err();
        let err: SentiviewError = json_err.into();
        assert!(matches!(err, SentiviewError::Serialization(_)));

        let err: SentiviewError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, SentiviewError::Other(ref m) if m == "boom"));
    }
}

//! Error types for heatmap rendering.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap operations.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Input Errors ===
    #[error("Locations and weights differ in length: {locations} locations, {weights} weights")]
    InputMismatch { locations: usize, weights: usize },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid view rectangle: {0}")]
    InvalidRect(String),

    #[error("Invalid weight at index {index}: {value}")]
    InvalidWeight { index: usize, value: f64 },

    // === Output Errors ===
    #[error("Requested raster {width}x{height} exceeds the limit of {limit} pixels")]
    OversizedOutput {
        width: usize,
        height: usize,
        limit: usize,
    },

    #[error("Invalid color ramp: {0}")]
    InvalidColorRamp(String),

    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl HeatmapError {
    /// Stable identifier for this error kind, suitable for logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            HeatmapError::InputMismatch { .. } => "InputMismatch",
            HeatmapError::InvalidParameter { .. } => "InvalidParameter",
            HeatmapError::InvalidRect(_) => "InvalidRect",
            HeatmapError::InvalidWeight { .. } => "InvalidWeight",
            HeatmapError::OversizedOutput { .. } => "OversizedOutput",
            HeatmapError::InvalidColorRamp(_) => "InvalidColorRamp",
            HeatmapError::EncodeError(_) => "EncodeError",
            HeatmapError::ConfigError(_) => "ConfigError",
            HeatmapError::Io(_) => "Io",
        }
    }

    /// Whether the error was caused by caller-supplied input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HeatmapError::InputMismatch { .. }
                | HeatmapError::InvalidParameter { .. }
                | HeatmapError::InvalidRect(_)
                | HeatmapError::InvalidWeight { .. }
                | HeatmapError::OversizedOutput { .. }
                | HeatmapError::InvalidColorRamp(_)
        )
    }

    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid_parameter(param: &str, message: impl Into<String>) -> Self {
        HeatmapError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::ConfigError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = HeatmapError::InputMismatch {
            locations: 3,
            weights: 2,
        };
        assert_eq!(err.code(), "InputMismatch");
        assert!(err.is_input_error());

        let err = HeatmapError::EncodeError("zlib".to_string());
        assert_eq!(err.code(), "EncodeError");
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_display_mentions_lengths() {
        let err = HeatmapError::InputMismatch {
            locations: 10,
            weights: 7,
        };
        let message = err.to_string();
        assert!(message.contains("10"));
        assert!(message.contains("7"));
    }
}

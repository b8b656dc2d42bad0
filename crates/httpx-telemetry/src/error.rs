//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TelemetryError {
    /// Creates a logging initialization error.
    pub fn logging_init(msg: impl Into<String>) -> Self {
        Self::LoggingInit(msg.into())
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::logging_init("already set");
        assert_eq!(err.to_string(), "Failed to initialize logging: already set");

        let err = TelemetryError::invalid_config("unknown format 'xml'");
        assert_eq!(err.to_string(), "Invalid configuration: unknown format 'xml'");
    }
}

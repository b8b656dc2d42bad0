//! The root configuration type.

use httpx_core::{ErrorConfig, RespondConfig};
use httpx_server::ServerConfig;
use httpx_telemetry::{create_env_filter, LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, LoggingSettings, ServerSettings};

/// Complete httpx service configuration.
///
/// # Example
///
/// ```
/// use httpx_config::HttpxConfig;
///
/// let config = HttpxConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(!config.errors.show_internal_errors);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HttpxConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerSettings,

    /// Error rendering configuration.
    #[serde(default)]
    pub errors: ErrorConfig,

    /// Handler adapter configuration.
    #[serde(default)]
    pub respond: RespondConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl HttpxConfig {
    /// Create a development configuration preset.
    ///
    /// Internal error details are shown, bodies are pretty-printed and logs
    /// are human readable at debug level.
    #[must_use]
    pub fn development() -> Self {
        Self {
            errors: ErrorConfig::development(),
            respond: RespondConfig::default(),
            logging: LoggingSettings {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ..LoggingSettings::default()
            },
            ..Self::default()
        }
    }

    /// Create a production configuration preset.
    ///
    /// Internal error details are hidden, bodies are compact and logs are
    /// JSON at info level.
    #[must_use]
    pub fn production() -> Self {
        Self {
            errors: ErrorConfig::default(),
            respond: RespondConfig::production(),
            logging: LoggingSettings::default(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The server address is not a socket address
    /// - The log level is not a valid filter
    /// - The pretty-print indent contains anything but whitespace
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if let Err(e) = create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        if !self
            .respond
            .pretty_print_indent
            .chars()
            .all(char::is_whitespace)
        {
            return Err(ConfigError::invalid_value(
                "respond.pretty_print_indent",
                "must contain only whitespace",
            ));
        }

        Ok(())
    }

    /// Returns the server configuration.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.server.http_addr.clone())
            .shutdown_timeout(self.server.shutdown_timeout())
            .request_timeout(self.server.request_timeout())
            .keep_alive(self.server.keep_alive)
            .build()
    }

    /// Returns the logging configuration.
    pub fn log_config(&self) -> LogConfig {
        let base = match self.logging.format {
            LogFormat::Pretty => LogConfig::development(),
            LogFormat::Json | LogFormat::Compact => LogConfig::production(),
        };
        base.with_enabled(self.logging.enabled)
            .with_level(self.logging.level.clone())
            .with_format(self.logging.format)
    }
}

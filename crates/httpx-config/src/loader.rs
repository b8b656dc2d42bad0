//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: presets, files, and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use httpx_telemetry::LogFormat;
use serde_json::Value;

use crate::{ConfigError, HttpxConfig};

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values or a preset
/// 2. Configuration files and strings (TOML or JSON), in the order given
/// 3. Environment variables
///
/// A file only overrides the keys it sets; everything else keeps the value
/// of the previous layer.
///
/// # Example
///
/// ```no_run
/// use httpx_config::ConfigLoader;
///
/// # fn main() -> Result<(), httpx_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_production()
///     .with_optional_file("httpx.toml")?
///     .with_env_prefix("HTTPX")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: HttpxConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HttpxConfig::default(),
            env_prefix: None,
        }
    }

    /// Start over from default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = HttpxConfig::default();
        self
    }

    /// Start over from the development preset.
    ///
    /// ```
    /// use httpx_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert!(config.errors.show_internal_errors);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = HttpxConfig::development();
        self
    }

    /// Start over from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = HttpxConfig::production();
        self
    }

    /// Layer a configuration file on top.
    ///
    /// The format is chosen by extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist or cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| unsupported_file(path))?;
        if format != "toml" && format != "json" {
            return Err(unsupported_file(path));
        }

        self.with_string(&content, &format)
    }

    /// Layer a configuration file on top if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Layer configuration text on top.
    ///
    /// # Arguments
    ///
    /// * `content` - Configuration content
    /// * `format` - `"toml"` or `"json"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or a field is unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use httpx_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [errors]
    ///     show_internal_errors = true
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(config.errors.show_internal_errors);
    /// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let overlay: Value = match format.to_lowercase().as_str() {
            "toml" => {
                // Parsing into the typed config first reports unknown fields
                // and type errors with TOML positions.
                let _: HttpxConfig = toml::from_str(content)?;
                serde_json::to_value(toml::from_str::<toml::Table>(content)?)?
            }
            "json" => {
                let _: HttpxConfig = serde_json::from_str(content)?;
                serde_json::from_str(content)?
            }
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };

        let mut merged = serde_json::to_value(&self.config)?;
        merge_values(&mut merged, overlay);
        self.config = serde_json::from_value(merged)?;
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`.
    /// For example, with prefix "HTTPX":
    /// - `HTTPX__SERVER__HTTP_ADDR=0.0.0.0:9000`
    /// - `HTTPX__ERRORS__SHOW_INTERNAL_ERRORS=true`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load `.env` from the current directory or its parents, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a `.env` file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::dotenv_error(".env", e.to_string())),
        }
    }

    /// Load environment variables from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or cannot be parsed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        dotenvy::from_path(path).map_err(|e| ConfigError::dotenv_error(path, e.to_string()))?;
        Ok(self)
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation
    /// fails.
    pub fn load(mut self) -> Result<HttpxConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix, env::vars())?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> HttpxConfig {
        self.config
    }

    fn apply_env_overrides<I>(&mut self, prefix: &str, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let scope = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(path) = key.strip_prefix(&scope) {
                let path = path.to_string();
                self.apply_env_var(&key, &path, &value)?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, path: &str, value: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                config.server.request_timeout_ms = parse_int(key, value)?;
            }
            ["SERVER", "KEEP_ALIVE"] => config.server.keep_alive = parse_flag(key, value)?,

            ["ERRORS", "SHOW_INTERNAL_ERRORS"] => {
                config.errors.show_internal_errors = parse_flag(key, value)?;
            }
            ["ERRORS", "INTERNAL_ERROR_FORMAT"] => {
                config.errors.internal_error_format = value.to_string();
            }

            ["RESPOND", "CATCH_PANICS"] => config.respond.catch_panics = parse_flag(key, value)?,
            ["RESPOND", "PRETTY_PRINT"] => config.respond.pretty_print = parse_flag(key, value)?,
            ["RESPOND", "PRETTY_PRINT_INDENT"] => {
                config.respond.pretty_print_indent = value.to_string();
            }

            ["LOGGING", "ENABLED"] => config.logging.enabled = parse_flag(key, value)?,
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = value
                    .parse::<LogFormat>()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected 'json', 'pretty' or 'compact'"))?;
            }

            // Unknown keys are ignored
            _ => {}
        }

        Ok(())
    }
}

fn unsupported_file(path: &Path) -> ConfigError {
    ConfigError::validation_error(format!(
        "unsupported configuration file format: {}",
        path.display()
    ))
}

/// Recursively overlays `overlay` onto `base`; tables merge, values replace.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn parse_int(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

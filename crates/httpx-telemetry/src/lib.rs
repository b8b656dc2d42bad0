//! # httpx Telemetry
//!
//! Logging setup for httpx services.
//!
//! Every httpx crate logs through `tracing`; this crate installs the
//! subscriber that writes those events out, as JSON by default.
//!
//! ```rust,no_run
//! use httpx_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! ```

#![doc(html_root_url = "https://docs.rs/httpx-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

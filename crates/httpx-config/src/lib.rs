//! Layered configuration for httpx services.
//!
//! Configuration is read in layers (defaults or a preset, then TOML/JSON
//! files, then environment variables) into one [`HttpxConfig`]:
//!
//! - [`ServerSettings`] - Bind address and timeouts
//! - [`httpx_core::ErrorConfig`] - Whether 500 responses include error detail
//! - [`httpx_core::RespondConfig`] - Adapter panics and pretty printing
//! - [`LoggingSettings`] - Log level and format
//!
//! Unknown fields are rejected.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! keep_alive = true
//!
//! [errors]
//! show_internal_errors = false
//! internal_error_format = "\n{error:#}"
//!
//! [respond]
//! catch_panics = true
//! pretty_print = true
//! pretty_print_indent = "  "
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! With [`ConfigLoader::with_env_prefix`]`("HTTPX")`, any value can be
//! overridden as `HTTPX__SECTION__KEY`, e.g.
//! `HTTPX__ERRORS__SHOW_INTERNAL_ERRORS=true`.

#![doc(html_root_url = "https://docs.rs/httpx-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HttpxConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LoggingSettings, ServerSettings};

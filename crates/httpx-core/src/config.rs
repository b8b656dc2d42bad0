//! Error rendering and response encoding settings.
//!
//! These replace process-wide debug toggles with plain values owned by a
//! dispatcher or a handler adapter.
//!
//! # Example
//!
//! ```rust
//! use httpx_core::{ErrorConfig, RespondConfig};
//!
//! let errors = ErrorConfig::default().show_internal_errors(true);
//! assert!(errors.shows_internal_errors());
//!
//! let respond = RespondConfig::default().pretty_print(false);
//! assert!(!respond.pretty_prints());
//! ```

use serde::{Deserialize, Serialize};

/// Default template used to append error details to 500 responses.
pub const DEFAULT_INTERNAL_ERROR_FORMAT: &str = "\n{error:#}";

/// Default indentation for pretty-printed JSON and XML.
pub const DEFAULT_PRETTY_PRINT_INDENT: &str = "  ";

/// Settings for the opaque-error (500) rendering path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorConfig {
    /// Whether internal server errors include the error detail in the body.
    ///
    /// Must stay disabled in production.
    pub show_internal_errors: bool,

    /// Template for the detail suffix.
    ///
    /// Placeholders: `{error}` (outermost error), `{error:#}` (full cause
    /// chain joined with `": "`), `{error:?}` (debug representation).
    pub internal_error_format: String,
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            show_internal_errors: false,
            internal_error_format: DEFAULT_INTERNAL_ERROR_FORMAT.to_string(),
        }
    }
}

impl ErrorConfig {
    /// Creates a development configuration that exposes internal errors.
    #[must_use]
    pub fn development() -> Self {
        Self {
            show_internal_errors: true,
            ..Self::default()
        }
    }

    /// Sets whether to expose internal error details.
    ///
    /// **Warning**: Only enable this in development environments.
    #[must_use]
    pub fn show_internal_errors(mut self, show: bool) -> Self {
        self.show_internal_errors = show;
        self
    }

    /// Sets the template used for the internal error detail.
    #[must_use]
    pub fn internal_error_format(mut self, format: impl Into<String>) -> Self {
        self.internal_error_format = format.into();
        self
    }

    /// Returns whether internal error details are exposed.
    #[must_use]
    pub fn shows_internal_errors(&self) -> bool {
        self.show_internal_errors
    }
}

/// Settings for the typed handler adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RespondConfig {
    /// Whether panics inside handlers are caught and rendered as errors.
    pub catch_panics: bool,

    /// Whether JSON and XML bodies are indented.
    pub pretty_print: bool,

    /// Indentation used for each nesting level when pretty-printing.
    pub pretty_print_indent: String,
}

impl Default for RespondConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            pretty_print: true,
            pretty_print_indent: DEFAULT_PRETTY_PRINT_INDENT.to_string(),
        }
    }
}

impl RespondConfig {
    /// Creates a production configuration with compact bodies.
    #[must_use]
    pub fn production() -> Self {
        Self {
            pretty_print: false,
            ..Self::default()
        }
    }

    /// Sets whether panics are caught.
    ///
    /// Disable in tests to see the original panic.
    #[must_use]
    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }

    /// Sets whether bodies are pretty-printed.
    #[must_use]
    pub fn pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Sets the indentation string.
    #[must_use]
    pub fn pretty_print_indent(mut self, indent: impl Into<String>) -> Self {
        self.pretty_print_indent = indent.into();
        self
    }

    /// Returns whether panics are caught.
    #[must_use]
    pub fn catches_panics(&self) -> bool {
        self.catch_panics
    }

    /// Returns whether bodies are pretty-printed.
    #[must_use]
    pub fn pretty_prints(&self) -> bool {
        self.pretty_print
    }

    /// Returns the indentation if pretty printing is enabled.
    #[must_use]
    pub fn indent(&self) -> Option<&str> {
        self.pretty_print.then_some(self.pretty_print_indent.as_str())
    }
}

//! Errors that render themselves as HTTP responses.
//!
//! [`HttpError`] is the self-rendering error type. Return it from a handler
//! (directly, boxed, or wrapped in any number of other errors) and the
//! dispatcher writes the response it describes:
//!
//! | variant | response |
//! |---|---|
//! | `Status` | status with a plain text body |
//! | `Redirect` | 3xx status with a `Location` header |
//! | `Json` | status with a pretty-printed JSON body |
//! | `Custom` | whatever the wrapped renderer writes |
//!
//! # Example
//!
//! ```rust
//! use httpx_err::{HttpError, NOT_FOUND};
//! use http::StatusCode;
//!
//! assert_eq!(NOT_FOUND.to_string(), "Not Found");
//!
//! let err = HttpError::with_text(StatusCode::BAD_REQUEST, "missing field `name`");
//! assert_eq!(err.to_string(), "missing field `name`");
//!
//! let err = HttpError::temporary_redirect("/login");
//! assert_eq!(err.to_string(), "307 redirect to /login");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use http::header::{self, HeaderValue};
use http::StatusCode;
use httpx_core::{content_type, Render, RenderContext, ResponseWriter};
use serde::Serialize;
use thiserror::Error;

use crate::dispatch::write_internal_server_error;

/// An error that knows which HTTP response it stands for.
#[derive(Clone, Error)]
pub enum HttpError {
    /// A status code with optional text.
    #[error("{}", status_text(*status, text))]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response text; the canonical reason phrase is used when empty.
        text: Cow<'static, str>,
    },

    /// A redirect to another location.
    #[error("{} redirect to {location}", status.as_u16())]
    Redirect {
        /// Redirect status, usually 3xx.
        status: StatusCode,
        /// Target of the `Location` header.
        location: String,
    },

    /// A status code with a JSON body.
    #[error("{}", json_text(*status, body))]
    Json {
        /// Response status.
        status: StatusCode,
        /// The body converted to JSON, or why the conversion failed.
        body: Result<serde_json::Value, JsonBodyError>,
    },

    /// A message with an application supplied renderer.
    #[error("{message}")]
    Custom {
        /// Error text.
        message: Cow<'static, str>,
        /// Renderer writing the response.
        renderer: Arc<dyn Render>,
    },
}

/// Why a JSON error body could not be converted.
#[derive(Debug, Clone, Error)]
#[error("can't marshal error body of type {type_name} as JSON because: {cause}")]
pub struct JsonBodyError {
    type_name: &'static str,
    cause: Arc<serde_json::Error>,
}

impl JsonBodyError {
    /// Returns the Rust type name of the body that failed to convert.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// `400 Bad Request`
pub const BAD_REQUEST: HttpError = HttpError::new(StatusCode::BAD_REQUEST);
/// `401 Unauthorized`
pub const UNAUTHORIZED: HttpError = HttpError::new(StatusCode::UNAUTHORIZED);
/// `402 Payment Required`
pub const PAYMENT_REQUIRED: HttpError = HttpError::new(StatusCode::PAYMENT_REQUIRED);
/// `403 Forbidden`
pub const FORBIDDEN: HttpError = HttpError::new(StatusCode::FORBIDDEN);
/// `404 Not Found`
pub const NOT_FOUND: HttpError = HttpError::new(StatusCode::NOT_FOUND);
/// `405 Method Not Allowed`
pub const METHOD_NOT_ALLOWED: HttpError = HttpError::new(StatusCode::METHOD_NOT_ALLOWED);

/// Creates an [`HttpError::Status`] with formatted text.
///
/// ```rust
/// use http::StatusCode;
///
/// let id = 42;
/// let err = httpx_err::http_errorf!(StatusCode::NOT_FOUND, "item {id} does not exist");
/// assert_eq!(err.to_string(), "item 42 does not exist");
/// ```
#[macro_export]
macro_rules! http_errorf {
    ($status:expr, $($arg:tt)+) => {
        $crate::HttpError::with_text($status, ::std::format!($($arg)+))
    };
}

impl HttpError {
    /// Creates a status error without text.
    pub const fn new(status: StatusCode) -> Self {
        Self::Status {
            status,
            text: Cow::Borrowed(""),
        }
    }

    /// Creates a status error with text.
    pub fn with_text(status: StatusCode, text: impl Into<Cow<'static, str>>) -> Self {
        Self::Status {
            status,
            text: text.into(),
        }
    }

    /// Creates a status error whose text is `lines` joined with newlines.
    pub fn with_lines<I, S>(status: StatusCode, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self::with_text(status, text)
    }

    /// Creates a redirect error.
    pub fn redirect(status: StatusCode, location: impl Into<String>) -> Self {
        Self::Redirect {
            status,
            location: location.into(),
        }
    }

    /// Creates a `307 Temporary Redirect` error.
    pub fn temporary_redirect(location: impl Into<String>) -> Self {
        Self::redirect(StatusCode::TEMPORARY_REDIRECT, location)
    }

    /// Creates a `308 Permanent Redirect` error.
    pub fn permanent_redirect(location: impl Into<String>) -> Self {
        Self::redirect(StatusCode::PERMANENT_REDIRECT, location)
    }

    /// Creates an error with a JSON body.
    ///
    /// The body is converted immediately. A conversion failure is kept and
    /// rendered as an internal server error.
    pub fn json<T>(status: StatusCode, body: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|e| JsonBodyError {
            type_name: std::any::type_name::<T>(),
            cause: Arc::new(e),
        });
        Self::Json { status, body }
    }

    /// Creates an error rendered by `renderer`.
    pub fn custom(message: impl Into<Cow<'static, str>>, renderer: impl Render + 'static) -> Self {
        Self::Custom {
            message: message.into(),
            renderer: Arc::new(renderer),
        }
    }

    /// Returns the status this error responds with.
    ///
    /// `None` for custom errors, whose renderer decides.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Redirect { status, .. } | Self::Json { status, .. } => {
                Some(*status)
            }
            Self::Custom { .. } => None,
        }
    }

    /// Returns the redirect target for redirect errors.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location, .. } => Some(location),
            _ => None,
        }
    }
}

impl fmt::Debug for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, text } => f
                .debug_struct("Status")
                .field("status", status)
                .field("text", text)
                .finish(),
            Self::Redirect { status, location } => f
                .debug_struct("Redirect")
                .field("status", status)
                .field("location", location)
                .finish(),
            Self::Json { status, body } => f
                .debug_struct("Json")
                .field("status", status)
                .field("body", body)
                .finish(),
            Self::Custom { message, .. } => f
                .debug_struct("Custom")
                .field("message", message)
                .finish_non_exhaustive(),
        }
    }
}

impl Render for HttpError {
    fn render(&self, cx: &RenderContext<'_>, writer: &mut ResponseWriter) {
        match self {
            Self::Status { status, .. } => writer.error(&self.to_string(), *status),
            Self::Redirect { status, location } => writer.redirect(location, *status),
            Self::Json { status, body } => write_json_body(body, *status, cx, writer),
            Self::Custom { renderer, .. } => renderer.render(cx, writer),
        }
    }
}

fn write_json_body(
    body: &Result<serde_json::Value, JsonBodyError>,
    status: StatusCode,
    cx: &RenderContext<'_>,
    writer: &mut ResponseWriter,
) {
    let encoded = match body {
        Ok(value) => serde_json::to_vec_pretty(value).map_err(|e| JsonBodyError {
            type_name: std::any::type_name::<serde_json::Value>(),
            cause: Arc::new(e),
        }),
        Err(e) => Err(e.clone()),
    };
    match encoded {
        Ok(bytes) => {
            writer.set_content_type(content_type::JSON);
            writer
                .headers_mut()
                .insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
            writer.write_header(status);
            writer.write(&bytes);
        }
        Err(e) => write_internal_server_error(&e, cx.config(), writer),
    }
}

fn status_text(status: StatusCode, text: &str) -> &str {
    if text.is_empty() {
        status.canonical_reason().unwrap_or("")
    } else {
        text
    }
}

fn json_text(status: StatusCode, body: &Result<serde_json::Value, JsonBodyError>) -> String {
    match body {
        Ok(value) => match serde_json::to_string_pretty(value) {
            Ok(json) => format!("{}: {json}", status.as_u16()),
            Err(e) => format!("{}: {e}", status.as_u16()),
        },
        Err(e) => format!("{}: {e}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpx_core::{render_fn, ErrorConfig};
    use serde::ser::Error as _;
    use std::collections::HashMap;

    fn render(err: &HttpError, config: &ErrorConfig) -> ResponseWriter {
        let (parts, ()) = http::Request::new(()).into_parts();
        let mut writer = ResponseWriter::new();
        err.render(&RenderContext::new(&parts, config), &mut writer);
        writer
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("no way"))
        }
    }

    #[test]
    fn test_empty_text_uses_reason_phrase() {
        assert_eq!(BAD_REQUEST.to_string(), "Bad Request");
        assert_eq!(METHOD_NOT_ALLOWED.to_string(), "Method Not Allowed");
        assert_eq!(PAYMENT_REQUIRED.status(), Some(StatusCode::PAYMENT_REQUIRED));
    }

    #[test]
    fn test_with_lines_joins_with_newline() {
        let err = HttpError::with_lines(StatusCode::BAD_REQUEST, ["first", "second"]);
        assert_eq!(err.to_string(), "first\nsecond");
    }

    #[test]
    fn test_http_errorf() {
        let err = http_errorf!(StatusCode::CONFLICT, "user {} exists", "ada");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.to_string(), "user ada exists");
    }

    #[test]
    fn test_status_render() {
        let writer = render(&FORBIDDEN, &ErrorConfig::default());
        assert_eq!(writer.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(writer.body(), b"Forbidden\n");
        assert_eq!(
            writer.headers().get(header::CONTENT_TYPE).unwrap(),
            content_type::PLAIN_TEXT
        );
    }

    #[test]
    fn test_redirect_render() {
        let err = HttpError::temporary_redirect("/login");
        assert_eq!(err.location(), Some("/login"));

        let writer = render(&err, &ErrorConfig::default());
        assert_eq!(writer.status(), Some(StatusCode::TEMPORARY_REDIRECT));
        assert_eq!(writer.headers().get(header::LOCATION).unwrap(), "/login");
        assert!(writer.body().is_empty());
    }

    #[test]
    fn test_permanent_redirect_display() {
        let err = HttpError::permanent_redirect("https://example.com/new");
        assert_eq!(err.to_string(), "308 redirect to https://example.com/new");
    }

    #[test]
    fn test_json_render() {
        let mut body = HashMap::new();
        body.insert("error", "quota exceeded");
        let err = HttpError::json(StatusCode::TOO_MANY_REQUESTS, &body);
        assert_eq!(err.to_string(), "429: {\n  \"error\": \"quota exceeded\"\n}");

        let writer = render(&err, &ErrorConfig::default());
        assert_eq!(writer.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(writer.body(), b"{\n  \"error\": \"quota exceeded\"\n}");
        assert_eq!(
            writer.headers().get(header::CONTENT_TYPE).unwrap(),
            content_type::JSON
        );
        assert_eq!(
            writer.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }

    #[test]
    fn test_json_conversion_failure_renders_500() {
        let err = HttpError::json(StatusCode::BAD_REQUEST, &Unserializable);
        assert!(err
            .to_string()
            .contains("can't marshal error body of type"));

        let writer = render(&err, &ErrorConfig::default());
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(writer.body(), b"Internal Server Error\n");
    }

    #[test]
    fn test_json_conversion_failure_detail_when_enabled() {
        let err = HttpError::json(StatusCode::BAD_REQUEST, &Unserializable);
        let writer = render(&err, &ErrorConfig::development());
        let body = String::from_utf8_lossy(writer.body());
        assert!(body.contains("Unserializable"));
        assert!(body.contains("no way"));
    }

    #[test]
    fn test_custom_render() {
        let err = HttpError::custom(
            "teapot",
            render_fn(|_cx, w| w.error("short and stout", StatusCode::IM_A_TEAPOT)),
        );
        assert_eq!(err.to_string(), "teapot");
        assert_eq!(err.status(), None);

        let writer = render(&err, &ErrorConfig::default());
        assert_eq!(writer.status(), Some(StatusCode::IM_A_TEAPOT));
    }

    #[test]
    fn test_http_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<HttpError>();
    }
}

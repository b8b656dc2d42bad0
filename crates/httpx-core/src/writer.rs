//! In-memory response sink.
//!
//! [`ResponseWriter`] is what handlers, renderers and the error dispatcher
//! write to. It records the first status written, the headers and the body,
//! and is turned into an [`HttpResponse`] once the request is done.
//!
//! # Example
//!
//! ```rust
//! use httpx_core::ResponseWriter;
//! use http::StatusCode;
//!
//! let mut writer = ResponseWriter::new();
//! writer.error("Bad Request", StatusCode::BAD_REQUEST);
//!
//! let response = writer.into_response();
//! assert_eq!(response.status(), StatusCode::BAD_REQUEST);
//! ```

use bytes::{Bytes, BytesMut};
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::content_type;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Collects status, headers and body of a single response.
///
/// The first status written wins. Later status writes are counted and
/// logged but do not change the response; body writes are appended.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
    status_writes: usize,
}

impl ResponseWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the response headers for modification.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Sets a header from a static value, replacing previous values.
    pub fn set_header(&mut self, name: HeaderName, value: &'static str) {
        self.headers.insert(name, HeaderValue::from_static(value));
    }

    /// Sets the `Content-Type` header.
    pub fn set_content_type(&mut self, value: &'static str) {
        self.set_header(header::CONTENT_TYPE, value);
    }

    /// Writes the status line.
    ///
    /// Only the first call takes effect.
    pub fn write_header(&mut self, status: StatusCode) {
        self.status_writes += 1;
        match self.status {
            None => self.status = Some(status),
            Some(existing) => {
                tracing::warn!(
                    existing = existing.as_u16(),
                    ignored = status.as_u16(),
                    "superfluous write_header call"
                );
            }
        }
    }

    /// Appends data to the body, writing `200 OK` first if no status was written.
    pub fn write(&mut self, data: &[u8]) {
        if self.status.is_none() {
            self.write_header(StatusCode::OK);
        }
        self.body.extend_from_slice(data);
    }

    /// Writes a plain text error response.
    ///
    /// Sets `Content-Type: text/plain; charset=utf-8` and
    /// `X-Content-Type-Options: nosniff`, writes `status` and the text
    /// followed by a newline.
    pub fn error(&mut self, text: &str, status: StatusCode) {
        self.headers.remove(header::CONTENT_LENGTH);
        self.set_content_type(content_type::PLAIN_TEXT);
        self.set_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff");
        self.write_header(status);
        self.write(text.as_bytes());
        self.write(b"\n");
    }

    /// Writes a redirect to `location` without a body.
    ///
    /// A location that is not a valid header value results in a plain
    /// `500 Internal Server Error`.
    pub fn redirect(&mut self, location: &str, status: StatusCode) {
        match HeaderValue::try_from(location) {
            Ok(value) => {
                self.headers.insert(header::LOCATION, value);
                self.write_header(status);
            }
            Err(e) => {
                tracing::warn!(location, error = %e, "invalid redirect location");
                self.error(
                    StatusCode::INTERNAL_SERVER_ERROR
                        .canonical_reason()
                        .unwrap_or("Internal Server Error"),
                    StatusCode::INTERNAL_SERVER_ERROR,
                );
            }
        }
    }

    /// Copies a complete response into this writer.
    pub fn write_response(&mut self, response: Response<Bytes>) {
        let (parts, body) = response.into_parts();
        for (name, value) in &parts.headers {
            self.headers.append(name, value.clone());
        }
        self.write_header(parts.status);
        self.body.extend_from_slice(&body);
    }

    /// Returns the written status, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns `true` once a status has been written.
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    /// Returns how many times a status was written, including ignored writes.
    #[must_use]
    pub fn status_writes(&self) -> usize {
        self.status_writes
    }

    /// Returns the body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Builds the HTTP response.
    ///
    /// A writer without a status becomes `200 OK` with an empty body.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        let mut response = Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_new_writer_is_unwritten() {
        let writer = ResponseWriter::new();
        assert!(!writer.is_written());
        assert_eq!(writer.status(), None);
        assert!(writer.body().is_empty());
    }

    #[test]
    fn test_write_implies_ok() {
        let mut writer = ResponseWriter::new();
        writer.write(b"hello");
        assert_eq!(writer.status(), Some(StatusCode::OK));
        assert_eq!(writer.body(), b"hello");
    }

    #[test]
    fn test_error_sets_plain_text_headers() {
        let mut writer = ResponseWriter::new();
        writer.error("Not Found", StatusCode::NOT_FOUND);

        assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(writer.body(), b"Not Found\n");
        assert_eq!(
            writer.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            writer.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }

    #[traced_test]
    #[test]
    fn test_first_status_wins() {
        let mut writer = ResponseWriter::new();
        writer.write_header(StatusCode::CREATED);
        writer.write_header(StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(writer.status(), Some(StatusCode::CREATED));
        assert_eq!(writer.status_writes(), 2);
        assert!(logs_contain("superfluous write_header call"));
    }

    #[test]
    fn test_redirect_has_location_and_no_body() {
        let mut writer = ResponseWriter::new();
        writer.redirect("/login", StatusCode::TEMPORARY_REDIRECT);

        let response = writer.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn test_redirect_invalid_location() {
        let mut writer = ResponseWriter::new();
        writer.redirect("/bad\nlocation", StatusCode::FOUND);

        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(writer.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn test_write_response_copies_everything() {
        let response = Response::builder()
            .status(StatusCode::ACCEPTED)
            .header("x-custom", "1")
            .body(Bytes::from_static(b"queued"))
            .unwrap();

        let mut writer = ResponseWriter::new();
        writer.write_response(response);

        assert_eq!(writer.status(), Some(StatusCode::ACCEPTED));
        assert_eq!(writer.headers().get("x-custom").unwrap(), "1");
        assert_eq!(writer.body(), b"queued");
    }

    #[test]
    fn test_into_response_defaults_to_ok() {
        let response = ResponseWriter::new().into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

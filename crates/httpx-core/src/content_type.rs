//! MIME content-type constants.
//!
//! All text based types use charset UTF-8.

/// `text/plain; charset=utf-8`
pub const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// `text/javascript; charset=utf-8`
pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";

/// `text/html; charset=utf-8`
pub const HTML: &str = "text/html; charset=utf-8";

/// `text/csv; charset=utf-8`
pub const CSV: &str = "text/csv; charset=utf-8";

/// `application/xml`
pub const XML: &str = "application/xml";

/// `application/json; charset=utf-8`
pub const JSON: &str = "application/json; charset=utf-8";

/// `application/pdf`
pub const PDF: &str = "application/pdf";

/// `application/zip`
pub const ZIP: &str = "application/zip";

/// `application/octet-stream`
pub const OCTET_STREAM: &str = "application/octet-stream";

/// `application/x-www-form-urlencoded`
pub const WWW_FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// `multipart/form-data`
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// `image/png`
pub const PNG: &str = "image/png";

/// `image/gif`
pub const GIF: &str = "image/gif";

/// `image/jpeg`
pub const JPEG: &str = "image/jpeg";

/// `image/tiff`
pub const TIFF: &str = "image/tiff";

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_all_constants_are_valid_header_values() {
        let all = [
            PLAIN_TEXT,
            JAVASCRIPT,
            HTML,
            CSV,
            XML,
            JSON,
            PDF,
            ZIP,
            OCTET_STREAM,
            WWW_FORM_URL_ENCODED,
            MULTIPART_FORM_DATA,
            PNG,
            GIF,
            JPEG,
            TIFF,
        ];

        for value in all {
            assert!(
                HeaderValue::from_str(value).is_ok(),
                "{value} should be a valid header value"
            );
        }
    }

    #[test]
    fn test_text_types_use_utf8() {
        for value in [PLAIN_TEXT, JAVASCRIPT, HTML, CSV, JSON] {
            assert!(value.ends_with("charset=utf-8"));
        }
    }
}

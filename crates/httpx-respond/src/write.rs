//! Writing typed bodies into a response.
//!
//! Encoding failures are answered with `500 Internal Server Error`, with the
//! detail shown according to the given [`ErrorConfig`].

use httpx_core::encode::{encode_json, encode_xml, XML_HEADER};
use httpx_core::{content_type, ErrorConfig, RespondConfig, ResponseWriter};
use httpx_err::write_internal_server_error;
use serde::Serialize;

/// Writes `value` as JSON with `Content-Type: application/json; charset=utf-8`.
pub fn write_json<T>(writer: &mut ResponseWriter, value: &T, config: &RespondConfig, errors: &ErrorConfig)
where
    T: Serialize + ?Sized,
{
    match encode_json(value, config.indent()) {
        Ok(body) => {
            writer.set_content_type(content_type::JSON);
            writer.write(&body);
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode JSON response");
            write_internal_server_error(&e, errors, writer);
        }
    }
}

/// Writes the XML declaration followed by `value` as XML.
///
/// `root` names the root element.
pub fn write_xml<T>(
    writer: &mut ResponseWriter,
    value: &T,
    root: Option<&str>,
    config: &RespondConfig,
    errors: &ErrorConfig,
) where
    T: Serialize + ?Sized,
{
    match encode_xml(value, config.indent(), root) {
        Ok(body) => {
            writer.set_content_type(content_type::XML);
            writer.write(XML_HEADER.as_bytes());
            writer.write(body.as_bytes());
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode XML response");
            write_internal_server_error(&e, errors, writer);
        }
    }
}

/// Writes `html` with `Content-Type: text/html; charset=utf-8`.
pub fn write_html(writer: &mut ResponseWriter, html: &str) {
    writer.set_content_type(content_type::HTML);
    writer.write(html.as_bytes());
}

/// Writes `text` with `Content-Type: text/plain; charset=utf-8`.
pub fn write_plaintext(writer: &mut ResponseWriter, text: &str) {
    writer.set_content_type(content_type::PLAIN_TEXT);
    writer.write(text.as_bytes());
}

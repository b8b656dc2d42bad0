//! JSON and XML body encoding.
//!
//! Both encoders take an optional indent. `None` produces compact output.
//! JSON output always ends with a newline.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::EncodeError;

/// XML declaration written before every XML body.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Encodes `value` as JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as JSON.
pub fn encode_json<T>(value: &T, indent: Option<&str>) -> Result<Vec<u8>, EncodeError>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::with_capacity(128);
    match indent {
        Some(indent) => {
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
        }
        None => serde_json::to_writer(&mut buf, value)?,
    }
    buf.push(b'\n');
    Ok(buf)
}

/// Encodes `value` as XML, without the declaration.
///
/// `root` names the root element; without it the type name is used, which
/// only works for structs and enums.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as XML.
pub fn encode_xml<T>(value: &T, indent: Option<&str>, root: Option<&str>) -> Result<String, EncodeError>
where
    T: Serialize + ?Sized,
{
    let mut buf = String::with_capacity(128);
    let mut ser = match root {
        Some(root) => quick_xml::se::Serializer::with_root(&mut buf, Some(root))
            .map_err(|e| EncodeError::xml(e.to_string()))?,
        None => quick_xml::se::Serializer::new(&mut buf),
    };
    if let Some(indent) = indent {
        if let Some(ch) = indent.chars().next() {
            ser.indent(ch, indent.chars().count());
        }
    }
    value
        .serialize(ser)
        .map_err(|e| EncodeError::xml(e.to_string()))?;
    Ok(buf)
}

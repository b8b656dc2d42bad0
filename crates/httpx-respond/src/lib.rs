//! # httpx Respond
//!
//! Typed handler adapters.
//!
//! Write handlers as async functions returning `Result<T, E>`; the adapters
//! encode `T`, route `E` through an [`httpx_err::Dispatcher`] and, unless
//! disabled, turn panics into error responses:
//!
//! - [`Json`] / [`Xml`] - Serialize the returned value
//! - [`Html`] / [`Plaintext`] - Write the returned string
//! - [`Raw`] - Pass a complete `http::Response` through
//! - [`StaticHtml`] / [`StaticPlaintext`] - Fixed content
//!
//! The `write_*` helpers are available for code that writes responses itself.

#![doc(html_root_url = "https://docs.rs/httpx-respond/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
mod handler;
mod write;

pub use adapter::{Html, Json, Plaintext, Raw, StaticHtml, StaticPlaintext, Xml};
pub use handler::{BoxFuture, Handler, Options};
pub use write::{write_html, write_json, write_plaintext, write_xml};

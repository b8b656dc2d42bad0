//! # httpx Core
//!
//! Core types shared by the httpx crates.
//!
//! This crate provides the foundational types used throughout httpx:
//!
//! - [`ResponseWriter`] - In-memory response sink handlers and renderers write to
//! - [`Render`] - Capability of producing an HTTP response
//! - [`RenderContext`] - Request and error settings available while rendering
//! - [`ErrorConfig`] / [`RespondConfig`] - Debug and pretty-print toggles
//! - [`content_type`] - MIME type constants
//! - [`encode`] - JSON and XML body encoding

#![doc(html_root_url = "https://docs.rs/httpx-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod content_type;
pub mod encode;
mod error;
mod render;
mod writer;

pub use config::{ErrorConfig, RespondConfig, DEFAULT_INTERNAL_ERROR_FORMAT, DEFAULT_PRETTY_PRINT_INDENT};
pub use error::{BoxError, EncodeError};
pub use render::{render_fn, Render, RenderContext, RenderFn};
pub use writer::{HttpResponse, ResponseBody, ResponseWriter};

pub use bytes;
pub use http;

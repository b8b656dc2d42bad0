//! # httpx Err
//!
//! Uniform error to HTTP response mapping.
//!
//! Handlers return errors; this crate decides which response each error
//! stands for:
//!
//! - [`HttpError`] - Errors that render themselves (status, redirect, JSON, custom)
//! - [`Marker`] / [`SentinelTable`] - Well-known errors mapped to responses
//! - [`Dispatcher`] - Classifies an error and writes exactly one response
//! - [`ErrorHandler`] / [`dispatch_all`] - Chaining several handlers
//! - [`dont_log`] / [`should_log`] - Suppressing logs for expected errors
//! - [`panic_to_error`] - Normalising recovered panics
//! - [`global`] - The process-wide default dispatcher

#![doc(html_root_url = "https://docs.rs/httpx-err/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
mod dispatch;
mod dont_log;
pub mod global;
mod handler;
mod marker;
mod panic;
mod response;
mod sentinel;

pub use chain::{Chain, MAX_CHAIN_DEPTH};
pub use dispatch::{write_internal_server_error, Disposition, Dispatcher};
pub use dont_log::{dont_log, should_log, DontLog};
pub use global::{handle, handle_panic};
pub use handler::{dispatch_all, handler_fn, ErrorHandler, HandlerFn, HANDLED, NOT_HANDLED};
pub use marker::{Marker, NoRows};
pub use panic::{panic_to_error, PanicError};
pub use response::{
    HttpError, JsonBodyError, BAD_REQUEST, FORBIDDEN, METHOD_NOT_ALLOWED, NOT_FOUND,
    PAYMENT_REQUIRED, UNAUTHORIZED,
};
pub use sentinel::SentinelTable;

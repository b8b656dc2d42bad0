//! Process-wide default dispatcher.
//!
//! Handler adapters that are not given a dispatcher use [`shared`]. Install a
//! customised dispatcher once at startup, before serving traffic:
//!
//! ```rust,no_run
//! use httpx_err::{global, Dispatcher, Marker, HttpError};
//! use http::StatusCode;
//!
//! let dispatcher = Dispatcher::new()
//!     .with_sentinel(Marker::of::<std::fmt::Error>(), HttpError::new(StatusCode::BAD_GATEWAY));
//! global::install(dispatcher).expect("default dispatcher already initialised");
//! ```

use std::any::Any;
use std::error::Error;
use std::sync::{Arc, OnceLock};

use http::request::Parts;
use httpx_core::ResponseWriter;

use crate::dispatch::Dispatcher;

static DEFAULT: OnceLock<Arc<Dispatcher>> = OnceLock::new();

/// Installs `dispatcher` as the process-wide default.
///
/// Fails, handing the dispatcher back, once the default has been installed
/// or used.
pub fn install(dispatcher: Dispatcher) -> Result<(), Dispatcher> {
    DEFAULT
        .set(Arc::new(dispatcher))
        .map_err(|rejected| Arc::try_unwrap(rejected).unwrap_or_else(|arc| (*arc).clone()))
}

/// Returns the process-wide default, initialising it with
/// [`Dispatcher::new`] on first use.
pub fn shared() -> Arc<Dispatcher> {
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(Dispatcher::new())))
}

/// Dispatches `err` with the process-wide default.
pub fn handle(err: Option<&(dyn Error + 'static)>, request: &Parts, writer: &mut ResponseWriter) -> bool {
    DEFAULT
        .get_or_init(|| Arc::new(Dispatcher::new()))
        .dispatch(err, request, writer)
}

/// Dispatches a panic payload with the process-wide default.
pub fn handle_panic(payload: Box<dyn Any + Send>, request: &Parts, writer: &mut ResponseWriter) -> bool {
    DEFAULT
        .get_or_init(|| Arc::new(Dispatcher::new()))
        .dispatch_panic(payload, request, writer)
}

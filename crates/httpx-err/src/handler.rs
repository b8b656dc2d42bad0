//! Pluggable error handlers.

use std::error::Error;
use std::sync::Arc;

use http::request::Parts;
use httpx_core::ResponseWriter;

use crate::dispatch::Dispatcher;

/// Returned by an [`ErrorHandler`] that wrote a response.
pub const HANDLED: bool = true;

/// Returned by an [`ErrorHandler`] that left the response alone.
pub const NOT_HANDLED: bool = false;

/// Something that may answer an error with a response.
pub trait ErrorHandler: Send + Sync {
    /// Handles `err`, returning [`HANDLED`] if a response was written.
    fn handle_error(
        &self,
        err: Option<&(dyn Error + 'static)>,
        request: &Parts,
        writer: &mut ResponseWriter,
    ) -> bool;
}

impl ErrorHandler for Dispatcher {
    fn handle_error(
        &self,
        err: Option<&(dyn Error + 'static)>,
        request: &Parts,
        writer: &mut ResponseWriter,
    ) -> bool {
        self.dispatch(err, request, writer)
    }
}

impl<H: ErrorHandler + ?Sized> ErrorHandler for Arc<H> {
    fn handle_error(
        &self,
        err: Option<&(dyn Error + 'static)>,
        request: &Parts,
        writer: &mut ResponseWriter,
    ) -> bool {
        (**self).handle_error(err, request, writer)
    }
}

/// An [`ErrorHandler`] backed by a closure.
pub struct HandlerFn<F> {
    f: F,
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

impl<F> ErrorHandler for HandlerFn<F>
where
    F: Fn(Option<&(dyn Error + 'static)>, &Parts, &mut ResponseWriter) -> bool + Send + Sync,
{
    fn handle_error(
        &self,
        err: Option<&(dyn Error + 'static)>,
        request: &Parts,
        writer: &mut ResponseWriter,
    ) -> bool {
        (self.f)(err, request, writer)
    }
}

/// Wraps a closure as an [`ErrorHandler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(Option<&(dyn Error + 'static)>, &Parts, &mut ResponseWriter) -> bool + Send + Sync,
{
    HandlerFn { f }
}

/// Runs every handler in order and reports whether any of them handled `err`.
///
/// Handlers are not short-circuited. If several write a response the writer
/// keeps the first status and logs the superfluous ones.
pub fn dispatch_all(
    err: Option<&(dyn Error + 'static)>,
    request: &Parts,
    writer: &mut ResponseWriter,
    handlers: &[&dyn ErrorHandler],
) -> bool {
    let mut handled = NOT_HANDLED;
    for handler in handlers {
        handled |= handler.handle_error(err, request, writer);
    }
    handled
}

//! The handler abstraction shared by all adapters.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::FutureExt;
use http::request::Parts;
use http::Request;
use httpx_core::{BoxError, HttpResponse, RespondConfig, ResponseWriter};
use httpx_err::{should_log, Dispatcher};

/// Boxed future type for handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that answers a request with a response.
///
/// All adapters in this crate implement it, and the server serves any
/// `Arc<dyn Handler>`.
pub trait Handler: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        (**self).call(request)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        (**self).call(request)
    }
}

/// Dispatcher and encoding settings of an adapter.
#[derive(Debug, Clone, Default)]
pub struct Options {
    dispatcher: Option<Arc<Dispatcher>>,
    config: RespondConfig,
}

impl Options {
    /// Creates options using the process-wide dispatcher and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `dispatcher` instead of the process-wide default.
    pub fn dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Replaces the encoding settings.
    pub fn config(mut self, config: RespondConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the encoding settings.
    pub fn respond_config(&self) -> &RespondConfig {
        &self.config
    }

    /// Returns the dispatcher errors are sent to.
    pub fn resolve_dispatcher(&self) -> Arc<Dispatcher> {
        match &self.dispatcher {
            Some(dispatcher) => Arc::clone(dispatcher),
            None => httpx_err::global::shared(),
        }
    }
}

/// Runs `f` and turns its outcome into a response.
///
/// `Ok` values go to `write`; errors and, when enabled, panics go to the
/// dispatcher.
pub(crate) async fn respond<F, Fut, T, E, W>(
    options: &Options,
    request: Request<Bytes>,
    f: &F,
    write: W,
) -> HttpResponse
where
    F: Fn(Request<Bytes>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
    W: FnOnce(T, &Options, &Dispatcher, &mut ResponseWriter),
{
    let (parts, body) = request.into_parts();
    let request = Request::from_parts(parts.clone(), body);
    let dispatcher = options.resolve_dispatcher();
    let mut writer = ResponseWriter::new();

    let call = async move { f(request).await };
    let outcome = if options.config.catches_panics() {
        AssertUnwindSafe(call).catch_unwind().await
    } else {
        Ok(call.await)
    };

    match outcome {
        Ok(Ok(value)) => write(value, options, &dispatcher, &mut writer),
        Ok(Err(err)) => {
            let err: BoxError = err.into();
            log_handler_error(&parts, &*err);
            dispatcher.dispatch(Some(&*err), &parts, &mut writer);
        }
        Err(payload) => {
            tracing::error!(
                http.method = %parts.method,
                http.path = parts.uri.path(),
                "handler panicked"
            );
            dispatcher.dispatch_panic(payload, &parts, &mut writer);
        }
    }

    writer.into_response()
}

fn log_handler_error(parts: &Parts, err: &(dyn std::error::Error + 'static)) {
    if should_log(err) {
        tracing::error!(
            http.method = %parts.method,
            http.path = parts.uri.path(),
            error = %err,
            "handler returned an error"
        );
    }
}

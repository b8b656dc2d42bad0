//! Error response dispatch.
//!
//! The [`Dispatcher`] is the single place where an error becomes an HTTP
//! response. Every error falls into exactly one [`Disposition`]:
//!
//! 1. a link of its chain is an [`HttpError`] or a type registered with
//!    [`Dispatcher::with_self_rendering`], which renders itself;
//! 2. a link matches a registered sentinel marker, whose renderer is used;
//! 3. otherwise it is opaque and answered with `500 Internal Server Error`.
//!
//! # Example
//!
//! ```rust
//! use httpx_core::ResponseWriter;
//! use httpx_err::{Dispatcher, NOT_FOUND};
//! use http::StatusCode;
//!
//! let dispatcher = Dispatcher::new();
//! let (request, ()) = http::Request::new(()).into_parts();
//!
//! let mut writer = ResponseWriter::new();
//! assert!(dispatcher.dispatch(Some(&NOT_FOUND), &request, &mut writer));
//! assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
//!
//! let mut writer = ResponseWriter::new();
//! assert!(!dispatcher.dispatch(None, &request, &mut writer));
//! assert!(!writer.is_written());
//! ```

use std::any::Any;
use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;

use http::request::Parts;
use http::StatusCode;
use httpx_core::{ErrorConfig, Render, RenderContext, ResponseWriter};

use crate::chain::{Chain, DisplayChain};
use crate::marker::Marker;
use crate::panic::panic_to_error;
use crate::response::HttpError;
use crate::sentinel::SentinelTable;

/// How an error is turned into a response.
#[derive(Clone, Copy)]
pub enum Disposition<'a> {
    /// The chain contains an error that renders itself.
    SelfRendering(&'a dyn Render),
    /// The chain contains a registered sentinel.
    Sentinel(&'a dyn Render),
    /// Nothing in the chain is recognised.
    Opaque,
}

impl Disposition<'_> {
    /// Returns a short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SelfRendering(_) => "self_rendering",
            Self::Sentinel(_) => "sentinel",
            Self::Opaque => "opaque",
        }
    }
}

impl std::fmt::Debug for Disposition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfRendering(_) => f.write_str("SelfRendering"),
            Self::Sentinel(_) => f.write_str("Sentinel"),
            Self::Opaque => f.write_str("Opaque"),
        }
    }
}

type RenderProbe = for<'a> fn(&'a (dyn Error + 'static)) -> Option<&'a dyn Render>;

fn probe<'a, E>(err: &'a (dyn Error + 'static)) -> Option<&'a dyn Render>
where
    E: Error + Render + 'static,
{
    err.downcast_ref::<E>().map(|err| err as &dyn Render)
}

/// An error type, other than [`HttpError`], that renders itself.
#[derive(Clone, Copy)]
struct SelfRenderingType {
    name: &'static str,
    probe: RenderProbe,
}

impl std::fmt::Debug for SelfRenderingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Converts errors into HTTP responses.
///
/// A dispatcher owns its sentinel table and error settings. Mutation needs
/// `&mut self`, so once shared behind an `Arc` it is read-only.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    sentinels: SentinelTable,
    self_rendering: Vec<SelfRenderingType>,
    config: ErrorConfig,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with the default sentinels and settings.
    pub fn new() -> Self {
        Self {
            sentinels: SentinelTable::with_defaults(),
            self_rendering: Vec::new(),
            config: ErrorConfig::default(),
        }
    }

    /// Creates a dispatcher without any sentinel.
    pub fn empty() -> Self {
        Self {
            sentinels: SentinelTable::new(),
            self_rendering: Vec::new(),
            config: ErrorConfig::default(),
        }
    }

    /// Replaces the error settings.
    pub fn with_config(mut self, config: ErrorConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a sentinel mapping, builder style.
    pub fn with_sentinel(mut self, marker: Marker, renderer: impl Render + 'static) -> Self {
        self.sentinels.register(marker, renderer);
        self
    }

    /// Treats errors of type `E` as self-rendering, builder style.
    ///
    /// [`HttpError`] is always recognised. Other error types implementing
    /// [`Render`] are only found in a chain once registered here; without
    /// registration they are opaque.
    pub fn with_self_rendering<E>(mut self) -> Self
    where
        E: Error + Render + 'static,
    {
        self.register_self_rendering::<E>();
        self
    }

    /// Treats errors of type `E` as self-rendering.
    ///
    /// Registering the same type twice has no effect.
    pub fn register_self_rendering<E>(&mut self) -> &mut Self
    where
        E: Error + Render + 'static,
    {
        let name = std::any::type_name::<E>();
        if !self.self_rendering.iter().any(|ty| ty.name == name) {
            self.self_rendering.push(SelfRenderingType {
                name,
                probe: probe::<E>,
            });
        }
        self
    }

    /// Maps `marker` to `renderer`, returning the renderer it replaced.
    pub fn register(
        &mut self,
        marker: Marker,
        renderer: impl Render + 'static,
    ) -> Option<Arc<dyn Render>> {
        self.sentinels.register(marker, renderer)
    }

    /// Returns the error settings.
    pub fn config(&self) -> &ErrorConfig {
        &self.config
    }

    /// Returns the error settings for modification.
    pub fn config_mut(&mut self) -> &mut ErrorConfig {
        &mut self.config
    }

    /// Returns the sentinel table.
    pub fn sentinels(&self) -> &SentinelTable {
        &self.sentinels
    }

    /// Returns the sentinel table for modification.
    pub fn sentinels_mut(&mut self) -> &mut SentinelTable {
        &mut self.sentinels
    }

    /// Decides how `err` is rendered.
    pub fn classify<'a>(&'a self, err: &'a (dyn Error + 'static)) -> Disposition<'a> {
        if let Some(renderer) = self.find_self_rendering(err) {
            return Disposition::SelfRendering(renderer);
        }
        match self.sentinels.lookup(err) {
            Some(renderer) => Disposition::Sentinel(renderer),
            None => Disposition::Opaque,
        }
    }

    fn find_self_rendering<'a>(&self, err: &'a (dyn Error + 'static)) -> Option<&'a dyn Render> {
        Chain::new(err).find_map(|link| {
            if let Some(http_error) = link.downcast_ref::<HttpError>() {
                return Some(http_error as &dyn Render);
            }
            self.self_rendering.iter().find_map(|ty| (ty.probe)(link))
        })
    }

    /// Writes the response for `err`.
    ///
    /// Returns `false` without writing anything if `err` is `None`,
    /// otherwise writes exactly one response and returns `true`.
    pub fn dispatch(
        &self,
        err: Option<&(dyn Error + 'static)>,
        request: &Parts,
        writer: &mut ResponseWriter,
    ) -> bool {
        let Some(err) = err else {
            return false;
        };

        let disposition = self.classify(err);
        tracing::debug!(
            disposition = disposition.kind(),
            http.method = %request.method,
            http.path = request.uri.path(),
            "dispatching error response"
        );

        let cx = RenderContext::new(request, &self.config);
        match disposition {
            Disposition::SelfRendering(renderer) => renderer.render(&cx, writer),
            Disposition::Sentinel(renderer) => renderer.render(&cx, writer),
            Disposition::Opaque => write_internal_server_error(err, &self.config, writer),
        }
        true
    }

    /// Writes the response for a recovered panic payload.
    ///
    /// Always returns `true`.
    pub fn dispatch_panic(
        &self,
        payload: Box<dyn Any + Send>,
        request: &Parts,
        writer: &mut ResponseWriter,
    ) -> bool {
        let err = panic_to_error(payload);
        self.dispatch(Some(&*err), request, writer)
    }
}

/// Writes a `500 Internal Server Error` plain text response.
///
/// The body is the reason phrase, followed by the error formatted with
/// [`ErrorConfig::internal_error_format`] when internal errors are shown.
pub fn write_internal_server_error(
    err: &(dyn Error + 'static),
    config: &ErrorConfig,
    writer: &mut ResponseWriter,
) {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let mut message = String::from(status.canonical_reason().unwrap_or("Internal Server Error"));
    if config.shows_internal_errors() {
        message.push_str(&format_error(err, &config.internal_error_format));
    }
    writer.error(&message, status);
}

fn format_error(err: &(dyn Error + 'static), template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(pos) = rest.find("{error") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{error:#}") {
            let _ = write!(out, "{}", DisplayChain(err));
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{error:?}") {
            let _ = write!(out, "{err:?}");
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{error}") {
            let _ = write!(out, "{err}");
            rest = after;
        } else {
            out.push_str("{error");
            rest = &tail["{error".len()..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dont_log::dont_log;
    use crate::marker::NoRows;
    use crate::response::{BAD_REQUEST, NOT_FOUND};
    use httpx_core::render_fn;
    use std::io;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("{context}")]
    struct Context {
        context: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    }

    fn wrap(context: &'static str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Context {
        Context {
            context,
            source: source.into(),
        }
    }

    fn request() -> Parts {
        let (parts, ()) = http::Request::get("/things/1").body(()).unwrap().into_parts();
        parts
    }

    fn dispatch(dispatcher: &Dispatcher, err: &(dyn Error + 'static)) -> ResponseWriter {
        let mut writer = ResponseWriter::new();
        assert!(dispatcher.dispatch(Some(err), &request(), &mut writer));
        writer
    }

    #[test]
    fn test_self_rendering_status() {
        let writer = dispatch(&Dispatcher::new(), &BAD_REQUEST);
        assert_eq!(writer.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(writer.body(), b"Bad Request\n");
    }

    #[test]
    fn test_self_rendering_wrapped() {
        let err = wrap("loading thing", NOT_FOUND);
        let writer = dispatch(&Dispatcher::new(), &err);
        assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_sentinel_three_layers_deep() {
        let err = wrap(
            "handler",
            wrap("service", wrap("repository", io::Error::from(io::ErrorKind::NotFound))),
        );
        let writer = dispatch(&Dispatcher::new(), &err);
        assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(writer.body(), b"Requested file not found\n");
    }

    #[test]
    fn test_self_rendering_beats_sentinel() {
        let err = wrap("outer", wrap("middle", NoRows));
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.classify(&err).kind(), "sentinel");

        let err = Context {
            context: "outer",
            source: Box::new(HttpError::new(StatusCode::CONFLICT)),
        };
        assert_eq!(dispatcher.classify(&err).kind(), "self_rendering");
    }

    #[derive(Debug, Error)]
    #[error("quota exceeded for {tenant}")]
    struct QuotaExceeded {
        tenant: &'static str,
    }

    impl Render for QuotaExceeded {
        fn render(&self, _cx: &RenderContext<'_>, writer: &mut ResponseWriter) {
            let text = format!("quota exceeded for {}", self.tenant);
            writer.error(&text, StatusCode::TOO_MANY_REQUESTS);
        }
    }

    #[test]
    fn test_unregistered_render_error_is_opaque() {
        let err = wrap("billing", QuotaExceeded { tenant: "acme" });
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.classify(&err).kind(), "opaque");

        let writer = dispatch(&dispatcher, &err);
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_registered_render_error_renders_itself() {
        let err = wrap("billing", wrap("usage", QuotaExceeded { tenant: "acme" }));
        let dispatcher = Dispatcher::new()
            .with_self_rendering::<QuotaExceeded>()
            .with_self_rendering::<QuotaExceeded>();
        assert_eq!(dispatcher.self_rendering.len(), 1);
        assert_eq!(dispatcher.classify(&err).kind(), "self_rendering");

        let writer = dispatch(&dispatcher, &err);
        assert_eq!(writer.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(writer.body(), b"quota exceeded for acme\n");
    }

    #[test]
    fn test_none_writes_nothing() {
        let mut writer = ResponseWriter::new();
        assert!(!Dispatcher::new().dispatch(None, &request(), &mut writer));
        assert!(!writer.is_written());
        assert!(writer.body().is_empty());
    }

    #[test]
    fn test_opaque_hides_detail_by_default() {
        let err = io::Error::new(io::ErrorKind::Other, "connection refused");
        let writer = dispatch(&Dispatcher::new(), &err);
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(writer.body(), b"Internal Server Error\n");
    }

    #[test]
    fn test_opaque_shows_detail_when_enabled() {
        let dispatcher = Dispatcher::new().with_config(ErrorConfig::development());
        let err = wrap("syncing", io::Error::new(io::ErrorKind::Other, "connection refused"));
        let writer = dispatch(&dispatcher, &err);
        assert_eq!(
            writer.body(),
            b"Internal Server Error\nsyncing: connection refused\n"
        );
    }

    #[test]
    fn test_custom_detail_format() {
        let config = ErrorConfig::development().internal_error_format(" ({error}) {error:x");
        let dispatcher = Dispatcher::new().with_config(config);
        let err = wrap("syncing", io::Error::new(io::ErrorKind::Other, "refused"));
        let writer = dispatch(&dispatcher, &err);
        assert_eq!(writer.body(), b"Internal Server Error (syncing) {error:x\n");
    }

    #[test]
    fn test_debug_detail_format() {
        let config = ErrorConfig::development().internal_error_format(": {error:?}");
        let dispatcher = Dispatcher::new().with_config(config);
        let writer = dispatch(&dispatcher, &NoRowsLike);
        assert_eq!(writer.body(), b"Internal Server Error: NoRowsLike\n");
    }

    #[derive(Debug, Error)]
    #[error("no rows, almost")]
    struct NoRowsLike;

    #[test]
    fn test_dont_log_is_transparent_for_dispatch() {
        let err = dont_log(HttpError::new(StatusCode::UNAUTHORIZED));
        let writer = dispatch(&Dispatcher::new(), &err);
        assert_eq!(writer.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_empty_dispatcher_has_no_sentinels() {
        let writer = dispatch(&Dispatcher::empty(), &NoRows);
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_register_custom_sentinel() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(
            Marker::of::<NoRowsLike>(),
            render_fn(|cx, w| {
                let text = format!("nothing at {}", cx.request().uri.path());
                w.error(&text, StatusCode::NOT_FOUND);
            }),
        );
        let writer = dispatch(&dispatcher, &wrap("query", NoRowsLike));
        assert_eq!(writer.body(), b"nothing at /things/1\n");
    }

    #[test]
    fn test_dispatch_panic_with_http_error() {
        let mut writer = ResponseWriter::new();
        let handled = Dispatcher::new().dispatch_panic(Box::new(NOT_FOUND), &request(), &mut writer);
        assert!(handled);
        assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_dispatch_panic_with_message() {
        let dispatcher = Dispatcher::new().with_config(ErrorConfig::development());
        let mut writer = ResponseWriter::new();
        dispatcher.dispatch_panic(Box::new("index out of bounds"), &request(), &mut writer);
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(String::from_utf8_lossy(writer.body()).contains("index out of bounds"));
    }
}

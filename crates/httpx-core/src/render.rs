//! The render capability.
//!
//! Anything that knows how to turn itself into an HTTP response implements
//! [`Render`]. Errors, sentinel responses and custom renderers all go
//! through this trait.

use http::request::Parts;

use crate::config::ErrorConfig;
use crate::writer::ResponseWriter;

/// Produces an HTTP response for a request.
///
/// An error type implementing `Render` is rendered by the dispatcher only
/// when it is an `HttpError` (see `HttpError::custom`) or was registered
/// with `Dispatcher::with_self_rendering`. Otherwise it is answered as an
/// opaque internal error.
pub trait Render: Send + Sync {
    /// Writes the response into `writer`.
    fn render(&self, cx: &RenderContext<'_>, writer: &mut ResponseWriter);
}

/// Context available while rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    request: &'a Parts,
    config: &'a ErrorConfig,
}

impl<'a> RenderContext<'a> {
    /// Creates a render context.
    #[must_use]
    pub fn new(request: &'a Parts, config: &'a ErrorConfig) -> Self {
        Self { request, config }
    }

    /// Returns the request being answered.
    #[must_use]
    pub fn request(&self) -> &'a Parts {
        self.request
    }

    /// Returns the error rendering settings.
    #[must_use]
    pub fn config(&self) -> &'a ErrorConfig {
        self.config
    }
}

/// A [`Render`] implementation backed by a closure.
///
/// Created by [`render_fn`].
pub struct RenderFn<F> {
    f: F,
}

impl<F> std::fmt::Debug for RenderFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderFn").finish_non_exhaustive()
    }
}

impl<F> Render for RenderFn<F>
where
    F: Fn(&RenderContext<'_>, &mut ResponseWriter) + Send + Sync,
{
    fn render(&self, cx: &RenderContext<'_>, writer: &mut ResponseWriter) {
        (self.f)(cx, writer);
    }
}

/// Wraps a closure as a [`Render`] implementation.
///
/// # Example
///
/// ```rust
/// use httpx_core::{render_fn, ErrorConfig, Render, RenderContext, ResponseWriter};
/// use http::StatusCode;
///
/// let gone = render_fn(|_cx, w| w.error("Gone", StatusCode::GONE));
///
/// let (parts, ()) = http::Request::new(()).into_parts();
/// let config = ErrorConfig::default();
/// let mut writer = ResponseWriter::new();
/// gone.render(&RenderContext::new(&parts, &config), &mut writer);
///
/// assert_eq!(writer.status(), Some(StatusCode::GONE));
/// ```
pub fn render_fn<F>(f: F) -> RenderFn<F>
where
    F: Fn(&RenderContext<'_>, &mut ResponseWriter) + Send + Sync,
{
    RenderFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Request, StatusCode};

    fn parts(method: Method, uri: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_render_fn_sees_request() {
        let renderer = render_fn(|cx, w| {
            let text = format!("{} {}", cx.request().method, cx.request().uri.path());
            w.error(&text, StatusCode::NOT_FOUND);
        });

        let parts = parts(Method::DELETE, "/items/7");
        let config = ErrorConfig::default();
        let mut writer = ResponseWriter::new();
        renderer.render(&RenderContext::new(&parts, &config), &mut writer);

        assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(writer.body(), b"DELETE /items/7\n");
    }

    #[test]
    fn test_render_context_exposes_config() {
        let parts = parts(Method::GET, "/");
        let config = ErrorConfig::development();
        let cx = RenderContext::new(&parts, &config);
        assert!(cx.config().shows_internal_errors());
    }

    #[test]
    fn test_render_is_object_safe() {
        let renderer: Box<dyn Render> = Box::new(render_fn(|_cx, w| w.write(b"ok")));
        let parts = parts(Method::GET, "/");
        let config = ErrorConfig::default();
        let mut writer = ResponseWriter::new();
        renderer.render(&RenderContext::new(&parts, &config), &mut writer);
        assert_eq!(writer.body(), b"ok");
    }
}

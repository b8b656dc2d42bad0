//! Typed handler adapters.
//!
//! Each adapter wraps an async function returning `Result<T, E>` and
//! writes `T` in its format. Errors are logged (unless wrapped with
//! [`dont_log`](httpx_err::dont_log)) and dispatched.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::Request;
//! use httpx_core::BoxError;
//! use httpx_err::NOT_FOUND;
//! use httpx_respond::Json;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//! }
//!
//! async fn get_user(request: Request<Bytes>) -> Result<User, BoxError> {
//!     match request.uri().path() {
//!         "/users/ada" => Ok(User { name: "Ada".to_string() }),
//!         _ => Err(NOT_FOUND.into()),
//!     }
//! }
//!
//! let handler = Json::new(get_user);
//! ```

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::Request;
use httpx_core::{BoxError, HttpResponse, RespondConfig, ResponseWriter};
use httpx_err::Dispatcher;
use serde::Serialize;

use crate::handler::{respond, BoxFuture, Handler, Options};
use crate::write::{write_html, write_json, write_plaintext, write_xml};

macro_rules! adapter {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<F> {
            f: F,
            options: Options,
        }

        impl<F> $name<F> {
            /// Wraps `f` using the process-wide dispatcher and default settings.
            pub fn new(f: F) -> Self {
                Self {
                    f,
                    options: Options::new(),
                }
            }

            /// Sends errors to `dispatcher` instead of the process-wide default.
            pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
                self.options = self.options.dispatcher(dispatcher);
                self
            }

            /// Replaces the encoding settings.
            pub fn with_config(mut self, config: RespondConfig) -> Self {
                self.options = self.options.config(config);
                self
            }

            /// Replaces all options.
            pub fn with_options(mut self, options: Options) -> Self {
                self.options = options;
                self
            }
        }

        impl<F> std::fmt::Debug for $name<F> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("options", &self.options)
                    .finish_non_exhaustive()
            }
        }
    };
}

adapter! {
    /// Responds with the returned value encoded as JSON.
    Json
}

adapter! {
    /// Responds with the returned string as HTML.
    Html
}

adapter! {
    /// Responds with the returned string as plain text.
    Plaintext
}

adapter! {
    /// Responds with the returned [`http::Response`] as is.
    Raw
}

impl<F, Fut, T, E> Handler for Json<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        Box::pin(respond(&self.options, request, &self.f, write_json_value))
    }
}

fn write_json_value<T: Serialize>(
    value: T,
    options: &Options,
    dispatcher: &Dispatcher,
    writer: &mut ResponseWriter,
) {
    write_json(writer, &value, options.respond_config(), dispatcher.config());
}

/// Responds with the returned value encoded as XML.
///
/// The root element is named after the value's type unless set with
/// [`Xml::root`].
pub struct Xml<F> {
    f: F,
    options: Options,
    root: Option<String>,
}

impl<F> Xml<F> {
    /// Wraps `f` using the process-wide dispatcher and default settings.
    pub fn new(f: F) -> Self {
        Self {
            f,
            options: Options::new(),
            root: None,
        }
    }

    /// Names the root element of the XML body.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Sends errors to `dispatcher` instead of the process-wide default.
    pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.options = self.options.dispatcher(dispatcher);
        self
    }

    /// Replaces the encoding settings.
    pub fn with_config(mut self, config: RespondConfig) -> Self {
        self.options = self.options.config(config);
        self
    }

    /// Replaces all options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl<F> std::fmt::Debug for Xml<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Xml")
            .field("options", &self.options)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<F, Fut, T, E> Handler for Xml<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        let root = self.root.as_deref();
        Box::pin(respond(&self.options, request, &self.f, move |value, options, dispatcher, writer| {
            write_xml(writer, &value, root, options.respond_config(), dispatcher.config());
        }))
    }
}

impl<F, Fut, T, E> Handler for Html<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: AsRef<str> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        Box::pin(respond(&self.options, request, &self.f, |html: T, _, _, writer| {
            write_html(writer, html.as_ref());
        }))
    }
}

impl<F, Fut, T, E> Handler for Plaintext<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: AsRef<str> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        Box::pin(respond(&self.options, request, &self.f, |text: T, _, _, writer| {
            write_plaintext(writer, text.as_ref());
        }))
    }
}

impl<F, Fut, E> Handler for Raw<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<http::Response<Bytes>, E>> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn call(&self, request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        Box::pin(respond(&self.options, request, &self.f, |response, _, _, writer| {
            writer.write_response(response);
        }))
    }
}

/// Responds to every request with the same HTML.
#[derive(Debug, Clone)]
pub struct StaticHtml(pub String);

impl StaticHtml {
    /// Creates a static HTML handler.
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }
}

impl Handler for StaticHtml {
    fn call(&self, _request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        let mut writer = ResponseWriter::new();
        write_html(&mut writer, &self.0);
        Box::pin(std::future::ready(writer.into_response()))
    }
}

/// Responds to every request with the same plain text.
#[derive(Debug, Clone)]
pub struct StaticPlaintext(pub String);

impl StaticPlaintext {
    /// Creates a static plain text handler.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl Handler for StaticPlaintext {
    fn call(&self, _request: Request<Bytes>) -> BoxFuture<'_, HttpResponse> {
        let mut writer = ResponseWriter::new();
        write_plaintext(&mut writer, &self.0);
        Box::pin(std::future::ready(writer.into_response()))
    }
}

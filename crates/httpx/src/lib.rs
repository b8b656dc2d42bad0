//! # httpx
//!
//! Helpers for writing HTTP handlers on hyper:
//!
//! - **Error dispatch** – handlers return errors; one dispatcher turns each
//!   error into exactly one response (self-rendering errors, well-known
//!   sentinel errors, or an opaque `500`)
//! - **Typed adapters** – `async fn(Request) -> Result<T, E>` becomes a
//!   handler that writes JSON, XML, HTML or plain text
//! - **Graceful shutdown** – drain in-flight requests on `SIGHUP`, `SIGINT`
//!   or `SIGTERM`
//! - **Content types** – the common `Content-Type` values
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use httpx::prelude::*;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//! }
//!
//! async fn get_user(req: Request<Bytes>) -> Result<User, HttpError> {
//!     match req.uri().path() {
//!         "/users/ada" => Ok(User { name: "Ada".into() }),
//!         _ => Err(HttpError::new(StatusCode::NOT_FOUND)),
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_env_prefix("HTTPX").load()?;
//!     httpx::telemetry::init_logging(&config.log_config())?;
//!
//!     let handler = Json::new(get_user).with_config(config.respond.clone());
//!     let bound = Server::new(config.server_config(), handler).bind().await?;
//!
//!     shutdown_on_signal(
//!         bound.handle(),
//!         SignalShutdown::with_tracing().timeout(config.server.shutdown_timeout()),
//!     )?;
//!     bound.serve().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/httpx/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use httpx_config as config;
pub use httpx_core as core;
pub use httpx_err as err;
pub use httpx_respond as respond;
pub use httpx_server as server;
pub use httpx_telemetry as telemetry;

pub use httpx_core::content_type;
pub use httpx_err::{http_errorf, Dispatcher, HttpError};

/// Prelude module for convenient imports.
///
/// ```rust
/// use httpx::prelude::*;
/// ```
pub mod prelude {
    pub use httpx_core::http::{Request, Response, StatusCode};
    pub use httpx_core::{
        content_type, render_fn, BoxError, ErrorConfig, HttpResponse, Render, RenderContext,
        RespondConfig, ResponseWriter,
    };

    pub use httpx_core::bytes::Bytes;

    pub use httpx_err::{
        dont_log, global, handle, should_log, Dispatcher, ErrorHandler, HttpError, Marker,
        NoRows,
    };

    pub use httpx_respond::{
        Handler, Html, Json, Options, Plaintext, Raw, StaticHtml, StaticPlaintext, Xml,
    };

    pub use httpx_server::{
        shutdown_on_signal, shutdown_when, GracefulShutdown, Server, ServerConfig, ServerHandle,
        Signal, SignalShutdown,
    };

    pub use httpx_config::{ConfigLoader, HttpxConfig};
}

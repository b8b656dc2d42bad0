//! # httpx Server
//!
//! A small HTTP/1.1 server for one handler, with graceful shutdown.
//!
//! - [`Server`] / [`BoundServer`] - Serve an [`httpx_respond::Handler`]
//! - [`ServerHandle`] - Stop accepting and drain open connections
//! - [`shutdown_on_signal`] - Drain on `SIGHUP`, `SIGINT` or `SIGTERM`
//! - [`GracefulShutdown`] / [`Logger`] - The seams the signal helper uses
//!
//! ## Example
//!
//! ```rust,no_run
//! use httpx_respond::StaticHtml;
//! use httpx_server::{shutdown_on_signal, Server, ServerConfig, SignalShutdown};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::new(ServerConfig::default(), StaticHtml("<h1>hi</h1>".into()));
//!     let bound = server.bind().await?;
//!
//!     shutdown_on_signal(bound.handle(), SignalShutdown::with_tracing())?;
//!     bound.serve().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/httpx-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod graceful;
mod logger;
mod on_signal;
mod server;
pub mod shutdown;
mod signal;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::{ServerError, ShutdownError};
pub use graceful::GracefulShutdown;
pub use logger::{Logger, TracingLogger};
pub use on_signal::{shutdown_on_signal, shutdown_when, SignalShutdown};
pub use server::{BoundServer, Server, ServerHandle};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
pub use signal::{Signal, SignalListener, DEFAULT_SIGNALS};

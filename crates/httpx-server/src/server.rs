//! HTTP server implementation.
//!
//! A [`Server`] serves one [`Handler`] over HTTP/1.1. Binding returns a
//! [`BoundServer`] whose [`ServerHandle`] stops it gracefully: the accept
//! loop ends, every connection finishes its in-flight request and closes,
//! and the handle waits for the connections to drain.
//!
//! # Example
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use http::Request;
//! use httpx_respond::Plaintext;
//! use httpx_server::{Server, ServerConfig};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = Plaintext::new(|_req: Request<Bytes>| async { Ok::<_, std::io::Error>("hello") });
//! let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
//!
//! let bound = Server::new(config, handler).bind().await?;
//! let handle = bound.handle();
//! tokio::spawn(async move {
//!     tokio::time::sleep(Duration::from_secs(60)).await;
//!     let _ = handle.shutdown(Duration::from_secs(5)).await;
//! });
//! bound.serve().await?;
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::request::Parts;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use httpx_core::{HttpResponse, ResponseWriter};
use httpx_err::{Dispatcher, HttpError};
use httpx_respond::Handler;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;

use crate::config::ServerConfig;
use crate::error::{ServerError, ShutdownError};
use crate::shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};

/// An HTTP server for a single handler.
pub struct Server {
    config: ServerConfig,
    handler: Arc<dyn Handler>,
    dispatcher: Option<Arc<Dispatcher>>,
}

impl Server {
    /// Creates a server for `handler`.
    pub fn new(config: ServerConfig, handler: impl Handler) -> Self {
        Self {
            config,
            handler: Arc::new(handler),
            dispatcher: None,
        }
    }

    /// Uses `dispatcher` for the server's own error responses (timeouts,
    /// unreadable bodies) instead of the process-wide default.
    pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the listener without accepting connections yet.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let service = RequestService {
            handler: self.handler,
            dispatcher: self.dispatcher.unwrap_or_else(httpx_err::global::shared),
            request_timeout: self.config.request_timeout(),
        };

        Ok(BoundServer {
            listener,
            local_addr,
            service: Arc::new(service),
            config: self.config,
            signal: ShutdownSignal::new(),
            tracker: ConnectionTracker::new(),
        })
    }

    /// Binds and serves until the process exits.
    ///
    /// Use [`Server::bind`] to obtain a [`ServerHandle`] for shutting down.
    pub async fn run(self) -> Result<(), ServerError> {
        self.bind().await?.serve().await
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// A server with a bound listener.
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    service: Arc<RequestService>,
    config: ServerConfig,
    signal: ShutdownSignal,
    tracker: ConnectionTracker,
}

impl BoundServer {
    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns a handle that shuts this server down.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            local_addr: self.local_addr,
            signal: self.signal.clone(),
            tracker: self.tracker.clone(),
        }
    }

    /// Accepts connections until a [`ServerHandle`] triggers shutdown.
    ///
    /// After the accept loop ends, waits for open connections to finish.
    /// The wait uses the timeout passed to [`ServerHandle::shutdown`], or
    /// the configured shutdown timeout when shutdown was requested without
    /// one. Zero waits indefinitely.
    pub async fn serve(self) -> Result<(), ServerError> {
        let Self {
            listener,
            local_addr,
            service,
            config,
            signal,
            tracker,
        } = self;

        tracing::info!(addr = %local_addr, "server listening");

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let connection = Connection {
                            service: Arc::clone(&service),
                            signal: signal.clone(),
                            keep_alive: config.keep_alive(),
                            remote_addr,
                            _token: tracker.acquire(),
                        };
                        tokio::spawn(connection.run(stream));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to accept connection");
                    }
                },
                () = signal.recv() => {
                    tracing::info!("shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }
        drop(listener);

        let timeout = signal
            .drain_timeout()
            .unwrap_or_else(|| config.shutdown_timeout());
        tracing::info!(
            active = tracker.active_connections(),
            timeout = ?timeout,
            "waiting for connections to close"
        );
        match wait_drained(&tracker, timeout).await {
            Ok(()) => tracing::info!("all connections closed"),
            Err(e) => tracing::warn!(error = %e, "connections still open at shutdown"),
        }

        tracing::info!(addr = %local_addr, "server stopped");
        Ok(())
    }
}

/// Stops a running [`BoundServer`].
///
/// Cloning is cheap; all clones control the same server.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    signal: ShutdownSignal,
    tracker: ConnectionTracker,
}

impl ServerHandle {
    /// Returns the address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the number of open connections.
    pub fn active_connections(&self) -> usize {
        self.tracker.active_connections()
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.signal.is_shutdown()
    }

    /// Stops accepting connections and waits for open ones to finish.
    ///
    /// A zero `timeout` waits indefinitely.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), ShutdownError> {
        self.signal.trigger_with_timeout(timeout);
        wait_drained(&self.tracker, timeout).await
    }
}

async fn wait_drained(tracker: &ConnectionTracker, timeout: Duration) -> Result<(), ShutdownError> {
    if timeout.is_zero() {
        tracker.wait_idle().await;
        return Ok(());
    }
    tokio::time::timeout(timeout, tracker.wait_idle())
        .await
        .map_err(|_| ShutdownError::Timeout {
            timeout,
            active: tracker.active_connections(),
        })
}

/// Per-server request state shared by all connections.
struct RequestService {
    handler: Arc<dyn Handler>,
    dispatcher: Arc<Dispatcher>,
    request_timeout: Option<Duration>,
}

impl std::fmt::Debug for RequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestService")
            .field("dispatcher", &self.dispatcher)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl RequestService {
    async fn handle(&self, request: Request<Incoming>) -> HttpResponse {
        let (parts, body) = request.into_parts();
        tracing::debug!(http.method = %parts.method, http.path = parts.uri.path(), "request");

        let deadline = self.request_timeout.map(|limit| Instant::now() + limit);

        let collected = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, body.collect()).await {
                Ok(collected) => collected,
                Err(_) => {
                    tracing::warn!(http.path = parts.uri.path(), "request body read timed out");
                    return self.reject(&parts, &HttpError::new(StatusCode::REQUEST_TIMEOUT));
                }
            },
            None => body.collect().await,
        };

        let body = match collected {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read request body");
                let err = HttpError::with_text(StatusCode::BAD_REQUEST, "Failed to read request body");
                return self.reject(&parts, &err);
            }
        };

        let call = self.handler.call(Request::from_parts(parts.clone(), body));
        match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, call).await {
                Ok(response) => response,
                Err(_) => {
                    tracing::warn!(
                        http.method = %parts.method,
                        http.path = parts.uri.path(),
                        "handler timed out"
                    );
                    self.reject(&parts, &HttpError::new(StatusCode::GATEWAY_TIMEOUT))
                }
            },
            None => call.await,
        }
    }

    fn reject(&self, parts: &Parts, err: &HttpError) -> HttpResponse {
        let err: &(dyn std::error::Error + 'static) = err;
        let mut writer = ResponseWriter::new();
        self.dispatcher.dispatch(Some(err), parts, &mut writer);
        writer.into_response()
    }
}

/// One accepted connection.
struct Connection {
    service: Arc<RequestService>,
    signal: ShutdownSignal,
    keep_alive: bool,
    remote_addr: SocketAddr,
    _token: ConnectionToken,
}

impl Connection {
    async fn run(self, stream: TcpStream) {
        let service = Arc::clone(&self.service);
        let svc = service_fn(move |request: Request<Incoming>| {
            let service = Arc::clone(&service);
            async move { Ok::<_, Infallible>(service.handle(request).await) }
        });

        let conn = http1::Builder::new()
            .keep_alive(self.keep_alive)
            .serve_connection(TokioIo::new(stream), svc);
        tokio::pin!(conn);

        let finished = tokio::select! {
            result = conn.as_mut() => Some(result),
            () = self.signal.recv() => None,
        };
        let result = match finished {
            Some(result) => result,
            None => {
                tracing::debug!(remote = %self.remote_addr, "closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        };

        if let Err(e) = result {
            tracing::error!(remote = %self.remote_addr, error = %e, "connection error");
        }
    }
}

//! Server error types.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address could not be parsed.
    #[error("invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// Binding the listener failed.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: std::net::SocketAddr,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a graceful shutdown.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShutdownError {
    /// Connections were still open when the timeout expired.
    #[error("shutdown timed out after {timeout:?} with {active} connections still active")]
    Timeout {
        /// The timeout that expired.
        timeout: Duration,
        /// Connections still open.
        active: usize,
    },
}

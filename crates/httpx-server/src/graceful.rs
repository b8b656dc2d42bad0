//! The shutdown capability used by the signal helpers.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::error::ShutdownError;
use crate::server::ServerHandle;

/// Something that can stop serving and wait for in-flight work.
///
/// [`ServerHandle`] implements it; anything else that drains on request
/// (a test double, a wrapper around several servers) can too.
pub trait GracefulShutdown: Send + Sync + 'static {
    /// Why a shutdown did not complete cleanly.
    type Error: Display + Send;

    /// Stops accepting work and waits for in-flight work to finish.
    ///
    /// A zero `timeout` waits indefinitely.
    fn shutdown(&self, timeout: Duration) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl GracefulShutdown for ServerHandle {
    type Error = ShutdownError;

    fn shutdown(&self, timeout: Duration) -> impl Future<Output = Result<(), Self::Error>> + Send {
        ServerHandle::shutdown(self, timeout)
    }
}

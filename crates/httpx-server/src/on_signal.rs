//! Graceful shutdown on OS signals.
//!
//! [`shutdown_on_signal`] installs signal handlers and spawns a task that,
//! on the first signal, logs it, shuts the server down and logs a failed
//! shutdown. [`shutdown_when`] does the same for any trigger future.
//!
//! # Example
//!
//! ```rust,no_run
//! use httpx_respond::StaticPlaintext;
//! use httpx_server::{shutdown_on_signal, Server, ServerConfig, SignalShutdown};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let server = Server::new(ServerConfig::default(), StaticPlaintext("ok".into()));
//! let bound = server.bind().await?;
//!
//! shutdown_on_signal(
//!     bound.handle(),
//!     SignalShutdown::with_tracing().timeout(Duration::from_secs(10)),
//! )?;
//! bound.serve().await?;
//! # Ok(())
//! # }
//! ```

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::graceful::GracefulShutdown;
use crate::logger::{Logger, TracingLogger};
use crate::signal::{Signal, SignalListener};

/// What [`shutdown_on_signal`] listens for and how it reports.
///
/// The default listens for [`DEFAULT_SIGNALS`](crate::DEFAULT_SIGNALS),
/// waits indefinitely for in-flight requests and logs nothing.
#[derive(Clone, Default)]
pub struct SignalShutdown {
    signal_log: Option<Arc<dyn Logger>>,
    error_log: Option<Arc<dyn Logger>>,
    timeout: Duration,
    signals: Vec<Signal>,
}

impl SignalShutdown {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs received signals at `INFO` and shutdown failures at `ERROR`
    /// through `tracing`.
    pub fn with_tracing() -> Self {
        Self::new()
            .signal_log(TracingLogger::info())
            .error_log(TracingLogger::error())
    }

    /// Logs `Received signal: <name>` to `logger`.
    pub fn signal_log(mut self, logger: impl Logger + 'static) -> Self {
        self.signal_log = Some(Arc::new(logger));
        self
    }

    /// Logs `server shutdown error: <error>` to `logger`.
    pub fn error_log(mut self, logger: impl Logger + 'static) -> Self {
        self.error_log = Some(Arc::new(logger));
        self
    }

    /// Limits how long in-flight requests may run. Zero waits indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Listens for `signals` instead of the defaults. An empty list keeps
    /// the defaults.
    pub fn signals(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        self.signals = signals.into_iter().collect();
        self
    }

    /// Returns the shutdown timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        self.timeout
    }

    fn log_signal(&self, received: &str) {
        if let Some(logger) = &self.signal_log {
            logger.log(&format!("Received signal: {received}"));
        }
    }

    fn log_error(&self, err: &dyn Display) {
        if let Some(logger) = &self.error_log {
            logger.log(&format!("server shutdown error: {err}"));
        }
    }
}

impl fmt::Debug for SignalShutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalShutdown")
            .field("signal_log", &self.signal_log.is_some())
            .field("error_log", &self.error_log.is_some())
            .field("timeout", &self.timeout)
            .field("signals", &self.signals)
            .finish()
    }
}

/// Shuts `server` down when one of the configured signals arrives.
///
/// Handlers are installed before this returns. The returned task runs
/// until the first signal; abort it to stop listening.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn shutdown_on_signal<S>(server: S, options: SignalShutdown) -> std::io::Result<JoinHandle<()>>
where
    S: GracefulShutdown,
{
    let mut listener = SignalListener::new(&options.signals)?;
    Ok(shutdown_when(
        server,
        async move { listener.recv().await },
        options,
    ))
}

/// Shuts `server` down once `trigger` completes.
///
/// The trigger's output is logged as the received signal.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn shutdown_when<S, F>(server: S, trigger: F, options: SignalShutdown) -> JoinHandle<()>
where
    S: GracefulShutdown,
    F: Future + Send + 'static,
    F::Output: Display,
{
    tokio::spawn(async move {
        let received = trigger.await.to_string();
        options.log_signal(&received);

        if let Err(err) = server.shutdown(options.timeout).await {
            options.log_error(&err);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeServer {
        fail: bool,
        called: AtomicBool,
        timeout: Mutex<Option<Duration>>,
    }

    impl GracefulShutdown for Arc<FakeServer> {
        type Error = String;

        fn shutdown(&self, timeout: Duration) -> impl Future<Output = Result<(), String>> + Send {
            self.called.store(true, Ordering::SeqCst);
            *self.timeout.lock().unwrap() = Some(timeout);
            let fail = self.fail;
            async move {
                if fail {
                    Err("deadline exceeded".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Logger + 'static) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        (lines, move |message: &str| sink.lock().unwrap().push(message.to_string()))
    }

    #[tokio::test]
    async fn test_logs_signal_and_shuts_down() {
        let server = Arc::new(FakeServer::default());
        let (lines, logger) = recorder();
        let options = SignalShutdown::new()
            .signal_log(logger)
            .timeout(Duration::from_secs(3));

        shutdown_when(Arc::clone(&server), async { Signal::Terminate }, options)
            .await
            .unwrap();

        assert!(server.called.load(Ordering::SeqCst));
        assert_eq!(*server.timeout.lock().unwrap(), Some(Duration::from_secs(3)));
        assert_eq!(*lines.lock().unwrap(), vec!["Received signal: SIGTERM"]);
    }

    #[tokio::test]
    async fn test_logs_shutdown_error() {
        let server = Arc::new(FakeServer {
            fail: true,
            ..FakeServer::default()
        });
        let (signals, signal_logger) = recorder();
        let (errors, error_logger) = recorder();
        let options = SignalShutdown::new()
            .signal_log(signal_logger)
            .error_log(error_logger);

        shutdown_when(server, async { Signal::Interrupt }, options)
            .await
            .unwrap();

        assert_eq!(*signals.lock().unwrap(), vec!["Received signal: SIGINT"]);
        assert_eq!(
            *errors.lock().unwrap(),
            vec!["server shutdown error: deadline exceeded"]
        );
    }

    #[tokio::test]
    async fn test_without_loggers_still_shuts_down() {
        let server = Arc::new(FakeServer {
            fail: true,
            ..FakeServer::default()
        });

        shutdown_when(Arc::clone(&server), async { "manual" }, SignalShutdown::new())
            .await
            .unwrap();

        assert!(server.called.load(Ordering::SeqCst));
        assert_eq!(*server.timeout.lock().unwrap(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_waits_for_trigger() {
        let server = Arc::new(FakeServer::default());
        let (tx, rx) = tokio::sync::oneshot::channel::<&'static str>();

        let task = shutdown_when(
            Arc::clone(&server),
            async move { rx.await.unwrap_or("closed") },
            SignalShutdown::new(),
        );

        tokio::task::yield_now().await;
        assert!(!server.called.load(Ordering::SeqCst));

        tx.send("go").unwrap();
        task.await.unwrap();
        assert!(server.called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_options_debug_hides_loggers() {
        let options = SignalShutdown::with_tracing().signals([Signal::Quit]);
        let debug = format!("{options:?}");
        assert!(debug.contains("signal_log: true"));
        assert!(debug.contains("Quit"));
    }
}

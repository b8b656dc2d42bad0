//! Shutdown coordination.
//!
//! [`ShutdownSignal`] tells the accept loop and every open connection to
//! stop; [`ConnectionTracker`] counts connections so a shutdown can wait
//! for them to drain.
//!
//! # Example
//!
//! ```rust
//! use httpx_server::shutdown::{ConnectionTracker, ShutdownSignal};
//!
//! let shutdown = ShutdownSignal::new();
//! let tracker = ConnectionTracker::new();
//!
//! let token = tracker.acquire();
//! assert_eq!(tracker.active_connections(), 1);
//!
//! shutdown.trigger();
//! assert!(shutdown.is_shutdown());
//!
//! drop(token);
//! assert_eq!(tracker.active_connections(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};

/// A one-shot flag that wakes every waiter when triggered.
///
/// The trigger may carry the drain timeout the caller asked for, so the
/// server waits for connections exactly as long as the requester does.
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<State>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct State {
    triggered: bool,
    drain_timeout: Option<Duration>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(State::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Triggers the signal. Later calls have no effect.
    pub fn trigger(&self) {
        self.sender.send_if_modified(|state| !std::mem::replace(&mut state.triggered, true));
    }

    /// Triggers the signal and records how long to wait for connections.
    ///
    /// A zero `timeout` waits indefinitely. The first recorded timeout wins.
    pub fn trigger_with_timeout(&self, timeout: Duration) {
        self.sender.send_if_modified(|state| {
            let changed = !state.triggered || state.drain_timeout.is_none();
            state.triggered = true;
            state.drain_timeout.get_or_insert(timeout);
            changed
        });
    }

    /// Returns `true` once the signal has been triggered.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.sender.borrow().triggered
    }

    /// Returns the drain timeout recorded by [`trigger_with_timeout`].
    ///
    /// [`trigger_with_timeout`]: ShutdownSignal::trigger_with_timeout
    #[must_use]
    pub fn drain_timeout(&self) -> Option<Duration> {
        self.sender.borrow().drain_timeout
    }

    /// Completes when the signal is triggered, immediately if it already was.
    pub async fn recv(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = receiver.wait_for(|state| state.triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts open connections.
///
/// Each connection holds a [`ConnectionToken`]; dropping the last token
/// wakes [`ConnectionTracker::wait_idle`].
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    active: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Registers a connection until the returned token is dropped.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.active.fetch_add(1, Ordering::SeqCst);
        ConnectionToken {
            active: Arc::clone(&self.active),
            idle: Arc::clone(&self.idle),
        }
    }

    /// Returns the number of open connections.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Completes once no connections are open.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a drop in between is not missed.
            notified.as_mut().enable();
            if self.active_connections() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks one open connection. See [`ConnectionTracker::acquire`].
#[derive(Debug)]
pub struct ConnectionToken {
    active: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

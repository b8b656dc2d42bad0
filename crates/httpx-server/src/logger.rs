//! Line loggers for the shutdown helpers.

use tracing::Level;

/// Receives one formatted line per event.
///
/// Closures taking `&str` are loggers.
pub trait Logger: Send + Sync {
    /// Logs `message`.
    fn log(&self, message: &str);
}

impl<F> Logger for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message);
    }
}

/// Forwards lines to `tracing` at a fixed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingLogger {
    level: Level,
}

impl TracingLogger {
    /// Logs at `level`.
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Logs at `INFO`.
    pub const fn info() -> Self {
        Self::new(Level::INFO)
    }

    /// Logs at `ERROR`.
    pub const fn error() -> Self {
        Self::new(Level::ERROR)
    }

    /// Returns the level lines are logged at.
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::info()
    }
}

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        if self.level == Level::ERROR {
            tracing::error!("{message}");
        } else if self.level == Level::WARN {
            tracing::warn!("{message}");
        } else if self.level == Level::INFO {
            tracing::info!("{message}");
        } else if self.level == Level::DEBUG {
            tracing::debug!("{message}");
        } else {
            tracing::trace!("{message}");
        }
    }
}

//! OS signals that can trigger a shutdown.

use std::fmt;

/// A process signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGHUP`
    Hangup,
    /// `SIGINT`
    Interrupt,
    /// `SIGTERM`
    Terminate,
    /// `SIGQUIT`
    Quit,
    /// `SIGUSR1`
    User1,
    /// `SIGUSR2`
    User2,
}

/// Signals listened to when none are given.
pub const DEFAULT_SIGNALS: &[Signal] = &[Signal::Hangup, Signal::Interrupt, Signal::Terminate];

impl Signal {
    /// Returns the conventional name, e.g. `"SIGTERM"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hangup => "SIGHUP",
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::Quit => "SIGQUIT",
            Self::User1 => "SIGUSR1",
            Self::User2 => "SIGUSR2",
        }
    }

    #[cfg(unix)]
    fn kind(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            Self::Hangup => SignalKind::hangup(),
            Self::Interrupt => SignalKind::interrupt(),
            Self::Terminate => SignalKind::terminate(),
            Self::Quit => SignalKind::quit(),
            Self::User1 => SignalKind::user_defined1(),
            Self::User2 => SignalKind::user_defined2(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives the signals it was created for.
///
/// Handlers are installed by [`SignalListener::new`], so signals arriving
/// before the first [`recv`](SignalListener::recv) are not lost.
#[derive(Debug)]
pub struct SignalListener {
    #[cfg(unix)]
    streams: Vec<(Signal, tokio::signal::unix::Signal)>,
}

impl SignalListener {
    /// Installs handlers for `signals`, or for [`DEFAULT_SIGNALS`] if empty.
    ///
    /// Outside unix only [`Signal::Interrupt`] (Ctrl+C) is delivered.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(signals: &[Signal]) -> std::io::Result<Self> {
        let signals = if signals.is_empty() { DEFAULT_SIGNALS } else { signals };

        #[cfg(unix)]
        {
            let mut streams = Vec::with_capacity(signals.len());
            for &signal in signals {
                if streams.iter().any(|(registered, _)| *registered == signal) {
                    continue;
                }
                streams.push((signal, tokio::signal::unix::signal(signal.kind())?));
            }
            Ok(Self { streams })
        }

        #[cfg(not(unix))]
        {
            let _ = signals;
            Ok(Self {})
        }
    }

    /// Returns the signals being listened to.
    #[cfg(unix)]
    pub fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.streams.iter().map(|(signal, _)| *signal)
    }

    /// Waits for the next signal.
    pub async fn recv(&mut self) -> Signal {
        #[cfg(unix)]
        {
            let waits = self.streams.iter_mut().map(|(signal, stream)| {
                let signal = *signal;
                Box::pin(async move {
                    match stream.recv().await {
                        Some(()) => signal,
                        None => std::future::pending().await,
                    }
                })
            });
            let (signal, _, _) = futures_util::future::select_all(waits).await;
            signal
        }

        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
            Signal::Interrupt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_names() {
        assert_eq!(Signal::Hangup.to_string(), "SIGHUP");
        assert_eq!(Signal::Interrupt.to_string(), "SIGINT");
        assert_eq!(Signal::Terminate.to_string(), "SIGTERM");
        assert_eq!(Signal::User2.name(), "SIGUSR2");
    }

    #[test]
    fn test_default_signals() {
        assert_eq!(
            DEFAULT_SIGNALS,
            &[Signal::Hangup, Signal::Interrupt, Signal::Terminate]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_list_uses_defaults() {
        let listener = SignalListener::new(&[]).unwrap();
        assert_eq!(listener.signals().collect::<Vec<_>>(), DEFAULT_SIGNALS);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_duplicates_registered_once() {
        let listener = SignalListener::new(&[Signal::User1, Signal::User1]).unwrap();
        assert_eq!(listener.signals().collect::<Vec<_>>(), vec![Signal::User1]);
    }
}

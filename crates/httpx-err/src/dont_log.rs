//! Suppressing error logs.

use std::error::Error;
use std::fmt;

use httpx_core::BoxError;

use crate::chain::Chain;

/// Wraps an error so that [`should_log`] returns `false` for it.
///
/// The wrapper is invisible to rendering: it displays as the inner error and
/// reports it as its source, so dispatch still finds status responses and
/// sentinels behind it.
pub struct DontLog(BoxError);

impl DontLog {
    /// Returns the wrapped error.
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.0
    }

    /// Unwraps the inner error.
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

impl fmt::Debug for DontLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DontLog").field(&self.0).finish()
    }
}

impl fmt::Display for DontLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for DontLog {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.0)
    }
}

/// Wraps `err` so that it is not logged by the handler adapters.
///
/// ```rust
/// use httpx_err::{dont_log, should_log, BAD_REQUEST};
///
/// assert!(should_log(&BAD_REQUEST));
/// assert!(!should_log(&dont_log(BAD_REQUEST)));
/// ```
pub fn dont_log(err: impl Into<BoxError>) -> DontLog {
    DontLog(err.into())
}

/// Returns `false` if any link of the chain of `err` is a [`DontLog`].
pub fn should_log(err: &(dyn Error + 'static)) -> bool {
    !Chain::new(err).any(|link| link.is::<DontLog>())
}

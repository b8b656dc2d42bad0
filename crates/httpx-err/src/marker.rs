//! Markers for well-known errors.

use std::any::type_name;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::chain::Chain;

type Matcher = Arc<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>;

/// Error returned when a query expected a row but found none.
///
/// Database layers can return or wrap this to get a 404 from the default
/// sentinel table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("no rows in result set")]
pub struct NoRows;

/// A named predicate recognising one link of an error chain.
///
/// Two markers with the same name are the same marker.
#[derive(Clone)]
pub struct Marker {
    name: Cow<'static, str>,
    matcher: Matcher,
}

impl Marker {
    /// Creates a marker from a name and a predicate over a single link.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, matcher: F) -> Self
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher: Arc::new(matcher),
        }
    }

    /// Matches any link of concrete type `E`. Named after the type.
    pub fn of<E>() -> Self
    where
        E: Error + 'static,
    {
        Self::new(type_name::<E>(), |link| link.is::<E>())
    }

    /// Matches an [`io::Error`] of kind [`io::ErrorKind::NotFound`].
    pub fn not_exist() -> Self {
        Self::new("not_exist", |link| {
            link.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
        })
    }

    /// Matches [`NoRows`].
    pub fn no_rows() -> Self {
        Self::new("no_rows", |link| link.is::<NoRows>())
    }

    /// Returns the marker's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn key(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    /// Returns `true` if this single link is the marked error.
    pub fn matches(&self, link: &(dyn Error + 'static)) -> bool {
        (self.matcher)(link)
    }

    /// Returns `true` if any link in the chain of `err` is the marked error.
    pub fn is_in(&self, err: &(dyn Error + 'static)) -> bool {
        Chain::new(err).any(|link| self.matches(link))
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Marker").field(&self.name).finish()
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Marker {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    #[derive(Debug, Error)]
    #[error("loading profile")]
    struct Loading(#[source] io::Error);

    #[test]
    fn test_not_exist_matches_kind_only() {
        let marker = Marker::not_exist();
        assert!(marker.matches(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!marker.matches(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!marker.matches(&NoRows));
    }

    #[test]
    fn test_not_exist_in_chain() {
        let err = Loading(io::Error::from(io::ErrorKind::NotFound));
        assert!(!Marker::not_exist().matches(&err));
        assert!(Marker::not_exist().is_in(&err));
    }

    #[test]
    fn test_no_rows() {
        assert!(Marker::no_rows().matches(&NoRows));
        assert_eq!(NoRows.to_string(), "no rows in result set");
    }

    #[test]
    fn test_of_uses_type() {
        let marker = Marker::of::<QuotaExceeded>();
        assert!(marker.name().ends_with("QuotaExceeded"));
        assert!(marker.matches(&QuotaExceeded));
        assert!(!marker.matches(&NoRows));
    }

    #[test]
    fn test_identity_is_name() {
        let a = Marker::new("x", |_| true);
        let b = Marker::new("x", |_| false);
        assert_eq!(a, b);
        assert_ne!(a, Marker::no_rows());
    }
}

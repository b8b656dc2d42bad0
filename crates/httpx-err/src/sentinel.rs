//! Sentinel mapping table.
//!
//! Maps [`Marker`]s to the renderer used when an error chain contains the
//! marked error. Entries keep their registration order; that order is the
//! priority when several markers match the same link.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use httpx_core::Render;
use indexmap::IndexMap;

use crate::chain::Chain;
use crate::marker::Marker;
use crate::response::HttpError;

#[derive(Clone)]
struct Entry {
    marker: Marker,
    renderer: Arc<dyn Render>,
}

/// Ordered marker to renderer mapping.
#[derive(Clone, Default)]
pub struct SentinelTable {
    entries: IndexMap<Cow<'static, str>, Entry>,
}

impl SentinelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with the built-in mappings:
    ///
    /// - [`Marker::not_exist`] → `404 Requested file not found`
    /// - [`Marker::no_rows`] → `404 Requested database row not found`
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.register(
            Marker::not_exist(),
            HttpError::with_text(StatusCode::NOT_FOUND, "Requested file not found"),
        );
        table.register(
            Marker::no_rows(),
            HttpError::with_text(StatusCode::NOT_FOUND, "Requested database row not found"),
        );
        table
    }

    /// Maps `marker` to `renderer`.
    ///
    /// Registering a marker that is already present replaces its renderer
    /// in place and returns the previous one.
    pub fn register(
        &mut self,
        marker: Marker,
        renderer: impl Render + 'static,
    ) -> Option<Arc<dyn Render>> {
        self.register_shared(marker, Arc::new(renderer))
    }

    /// Like [`register`](Self::register) for an already shared renderer.
    pub fn register_shared(
        &mut self,
        marker: Marker,
        renderer: Arc<dyn Render>,
    ) -> Option<Arc<dyn Render>> {
        self.entries
            .insert(marker.key(), Entry { marker, renderer })
            .map(|previous| previous.renderer)
    }

    /// Removes the marker called `name`, returning its renderer.
    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Render>> {
        self.entries.shift_remove(name).map(|entry| entry.renderer)
    }

    /// Returns `true` if a marker called `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the number of registered markers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no marker is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the registered marker names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| &**key)
    }

    /// Finds the renderer for `err`.
    ///
    /// Links are visited from the outermost error inward; for each link the
    /// markers are tried in registration order. The first match wins.
    pub fn lookup(&self, err: &(dyn Error + 'static)) -> Option<&dyn Render> {
        Chain::new(err).find_map(|link| {
            self.entries
                .values()
                .find(|entry| entry.marker.matches(link))
                .map(|entry| entry.renderer.as_ref())
        })
    }
}

impl fmt::Debug for SentinelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::NoRows;
    use httpx_core::{render_fn, ErrorConfig, RenderContext, ResponseWriter};
    use std::io;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("query failed")]
    struct QueryFailed(#[source] NoRows);

    fn render_lookup(table: &SentinelTable, err: &(dyn Error + 'static)) -> Option<ResponseWriter> {
        let renderer = table.lookup(err)?;
        let (parts, ()) = http::Request::new(()).into_parts();
        let config = ErrorConfig::default();
        let mut writer = ResponseWriter::new();
        renderer.render(&RenderContext::new(&parts, &config), &mut writer);
        Some(writer)
    }

    #[test]
    fn test_defaults() {
        let table = SentinelTable::with_defaults();
        assert_eq!(table.len(), 2);
        assert!(table.contains("not_exist"));
        assert!(table.contains("no_rows"));

        let writer = render_lookup(&table, &io::Error::from(io::ErrorKind::NotFound)).unwrap();
        assert_eq!(writer.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(writer.body(), b"Requested file not found\n");

        let writer = render_lookup(&table, &QueryFailed(NoRows)).unwrap();
        assert_eq!(writer.body(), b"Requested database row not found\n");
    }

    #[test]
    fn test_unknown_error_has_no_renderer() {
        let table = SentinelTable::with_defaults();
        let err = io::Error::from(io::ErrorKind::TimedOut);
        assert!(table.lookup(&err).is_none());
    }

    #[test]
    fn test_register_twice_keeps_one_entry() {
        let mut table = SentinelTable::with_defaults();
        let previous = table.register(
            Marker::no_rows(),
            HttpError::with_text(StatusCode::GONE, "row gone"),
        );

        assert!(previous.is_some());
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["not_exist", "no_rows"]);

        let writer = render_lookup(&table, &NoRows).unwrap();
        assert_eq!(writer.status(), Some(StatusCode::GONE));
    }

    #[test]
    fn test_registration_order_is_priority() {
        let mut table = SentinelTable::new();
        table.register(
            Marker::new("first", |_| true),
            render_fn(|_cx, w| w.error("first", StatusCode::BAD_REQUEST)),
        );
        table.register(
            Marker::new("second", |_| true),
            render_fn(|_cx, w| w.error("second", StatusCode::CONFLICT)),
        );

        let writer = render_lookup(&table, &NoRows).unwrap();
        assert_eq!(writer.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_outer_link_wins_over_priority() {
        let mut table = SentinelTable::new();
        table.register(Marker::no_rows(), HttpError::new(StatusCode::GONE));
        table.register(Marker::of::<QueryFailed>(), HttpError::new(StatusCode::CONFLICT));

        let writer = render_lookup(&table, &QueryFailed(NoRows)).unwrap();
        assert_eq!(writer.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn test_remove() {
        let mut table = SentinelTable::with_defaults();
        assert!(table.remove("not_exist").is_some());
        assert!(table.remove("not_exist").is_none());
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }
}

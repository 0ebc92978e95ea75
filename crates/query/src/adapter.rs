//! The boundary the engine consumes from storage backends
//!
//! An [`Adapter`] is a backend-specific implementation of raw iteration
//! plus a capability declaration. The engine needs nothing else from a
//! backend: connection setup, serialization, and durability all live on
//! the adapter's side of this line.

use crate::capability::Capabilities;
use crate::filter::{matches_all, Filter};
use crate::order::{sort_entries, Order};
use crate::query::Query;
use shale_core::{Cursor, Entry, Result};

/// The natively-executed subset of a query, handed to [`Adapter::scan`].
///
/// The negotiator only puts stages in here that the adapter's declared
/// capabilities cover, so an adapter may assume every part of the pushdown
/// is something it claimed to support. [`Pushdown::none`] is a raw full
/// scan. Honoring the pushdown correctly is a trust contract: the engine
/// does not re-check native stages, and a violation produces silently
/// wrong query results.
#[derive(Debug, Clone, Default)]
pub struct Pushdown {
    pub(crate) filters: Vec<Filter>,
    pub(crate) orders: Vec<Order>,
    pub(crate) offset: Option<usize>,
    pub(crate) limit: Option<usize>,
}

impl Pushdown {
    /// An empty pushdown: scan everything, in whatever order is natural
    /// for the backend.
    pub fn none() -> Self {
        Self::default()
    }

    /// Filters to apply natively, combined by conjunction.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Ordering to apply natively; empty means the scan order is
    /// unspecified.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Offset to apply natively, after filters and ordering.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Limit to apply natively, after filters, ordering, and offset.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether there is anything to push down.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.orders.is_empty()
            && self.offset.is_none()
            && self.limit.is_none()
    }

    /// Reference application of this pushdown over materialized entries.
    ///
    /// This is the behavior an honest adapter must reproduce: filter by
    /// conjunction, stable-sort by the composed ordering, then window by
    /// offset/limit. In-memory adapters can simply call it.
    pub fn apply(&self, entries: Vec<Entry>) -> Result<Vec<Entry>> {
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if matches_all(&self.filters, &entry)? {
                kept.push(entry);
            }
        }
        let sorted = sort_entries(kept, &self.orders)?;
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        Ok(sorted.into_iter().skip(offset).take(limit).collect())
    }
}

/// A backend-specific source of entries.
///
/// Implementations must be safe to share across threads; each returned
/// [`Cursor`] is owned by a single consumer.
pub trait Adapter: Send + Sync {
    /// Open a raw scan, with `pushdown` executed natively.
    ///
    /// Unless the pushdown carries an ordering, the order of the returned
    /// entries is unspecified (but must be deterministic for an unchanged
    /// backing data set, which is what makes query re-execution
    /// idempotent).
    ///
    /// # Errors
    ///
    /// Backend failures surface as [`shale_core::Error::Adapter`]; the
    /// engine passes them through unchanged and never retries.
    fn scan(&self, pushdown: &Pushdown) -> Result<Cursor>;

    /// Declare which stages of `query` this adapter can execute natively.
    ///
    /// Called once per query invocation; the engine never caches the
    /// answer across invocations, so the declaration may depend on the
    /// adapter's current state.
    fn capabilities(&self, query: &Query) -> Capabilities;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::RangeOp;
    use shale_core::{Key, Value};
    use std::collections::HashMap;

    fn user(path: &str, age: i64) -> Entry {
        let mut fields = HashMap::new();
        fields.insert("age".to_string(), Value::Int(age));
        Entry::new(Key::parse(path).unwrap(), Value::Object(fields))
    }

    #[test]
    fn empty_pushdown_is_identity() {
        let entries = vec![user("/b", 2), user("/a", 1)];
        let out = Pushdown::none().apply(entries.clone()).unwrap();
        assert_eq!(out, entries);
    }

    #[test]
    fn apply_filters_sorts_then_windows() {
        let pushdown = Pushdown {
            filters: vec![Filter::field_range("age", RangeOp::Ge, 10i64)],
            orders: vec![Order::field_asc("age")],
            offset: Some(1),
            limit: Some(1),
        };
        let entries = vec![user("/a", 30), user("/b", 5), user("/c", 20), user("/d", 10)];

        let out = pushdown.apply(entries).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key().to_string(), "/c");
    }

    #[test]
    fn apply_propagates_filter_errors() {
        let pushdown = Pushdown {
            filters: vec![Filter::field_eq("missing", 1i64)],
            ..Pushdown::default()
        };
        let err = pushdown.apply(vec![user("/a", 1)]).unwrap_err();
        assert!(err.is_field_access());
    }
}

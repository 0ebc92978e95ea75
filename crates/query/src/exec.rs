//! The generic fallback executor
//!
//! Completes whatever stages an adapter could not run natively, as a stack
//! of lazy cursor stages over the adapter's raw scan:
//!
//! - **filter**: entry-at-a-time, no buffering;
//! - **order**: requires full materialization of the filtered sequence
//!   before the first entry can be yielded (a global sort cannot do
//!   otherwise). The buffer is stable-sorted and re-exposed lazily. This
//!   memory-for-correctness trade is inherent, not an artifact;
//! - **skip/take**: lazy offset/limit. Without an order stage this never
//!   materializes anything, which is what keeps large unordered queries
//!   cheap. A limit of 0 never pulls from the underlying cursor at all.
//!
//! Stage order is fixed: filter, then order, then offset/limit. Offset and
//! limit always apply after filtering and ordering.

use crate::filter::{matches_all, Filter};
use crate::order::{sort_entries, Order};
use shale_core::{Cursor, Entry, EntrySource, Result};
use tracing::trace;

/// The stages left for the fallback executor after negotiation.
///
/// Built by [`Plan::negotiate`](crate::Plan::negotiate); [`Fallback::wrap`]
/// turns it into the cursor handed back to the caller.
#[derive(Debug, Clone, Default)]
pub struct Fallback {
    pub(crate) filters: Vec<Filter>,
    pub(crate) orders: Vec<Order>,
    pub(crate) offset: Option<usize>,
    pub(crate) limit: Option<usize>,
}

impl Fallback {
    /// Nothing left to do; the adapter ran every stage.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether there is any fallback work.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.orders.is_empty()
            && self.offset.is_none()
            && self.limit.is_none()
    }

    /// Filters the executor still applies.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Ordering the executor still applies.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Wrap an adapter's raw cursor with the remaining stages.
    ///
    /// `raw` is already filtered/ordered/windowed to the extent the
    /// adapter claimed native; the result satisfies the full query
    /// semantics. When `self` is empty the raw cursor passes through
    /// untouched.
    pub fn wrap(self, raw: Cursor) -> Cursor {
        let mut cursor = raw;
        if !self.filters.is_empty() {
            cursor = Cursor::new(FilterStage {
                inner: cursor,
                filters: self.filters,
            });
        }
        if !self.orders.is_empty() {
            cursor = Cursor::new(OrderStage {
                inner: Some(cursor),
                orders: self.orders,
                sorted: None,
            });
        }
        if self.offset.is_some() || self.limit.is_some() {
            cursor = Cursor::new(SkipTakeStage {
                inner: cursor,
                to_skip: self.offset.unwrap_or(0),
                remaining: self.limit,
            });
        }
        cursor
    }
}

/// Lazy conjunction filtering, one entry at a time.
struct FilterStage {
    inner: Cursor,
    filters: Vec<Filter>,
}

impl EntrySource for FilterStage {
    fn pull(&mut self) -> Result<Option<Entry>> {
        while let Some(entry) = self.inner.next()? {
            if matches_all(&self.filters, &entry)? {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.inner.cancel();
    }
}

/// Materialize-then-sort ordering stage.
///
/// The first pull drains the inner cursor completely, stable-sorts the
/// buffer, and yields from it afterwards. An error during materialization
/// or comparison discards the buffer entirely: no partial result escapes,
/// even entries that were buffered successfully.
struct OrderStage {
    inner: Option<Cursor>,
    orders: Vec<Order>,
    sorted: Option<std::vec::IntoIter<Entry>>,
}

impl EntrySource for OrderStage {
    fn pull(&mut self) -> Result<Option<Entry>> {
        if self.sorted.is_none() {
            let Some(mut inner) = self.inner.take() else {
                return Ok(None);
            };
            let mut buffer = Vec::new();
            while let Some(entry) = inner.next()? {
                buffer.push(entry);
            }
            trace!(
                entries = buffer.len(),
                orders = self.orders.len(),
                "materialized entries for fallback ordering"
            );
            let sorted = sort_entries(buffer, &self.orders)?;
            self.sorted = Some(sorted.into_iter());
        }
        Ok(self.sorted.as_mut().and_then(Iterator::next))
    }

    fn close(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            inner.cancel();
        }
        self.sorted = None;
    }
}

/// Lazy offset/limit windowing.
struct SkipTakeStage {
    inner: Cursor,
    to_skip: usize,
    remaining: Option<usize>,
}

impl EntrySource for SkipTakeStage {
    fn pull(&mut self) -> Result<Option<Entry>> {
        // Limit exhausted (or zero from the start): never touch the inner
        // cursor.
        if self.remaining == Some(0) {
            return Ok(None);
        }
        while self.to_skip > 0 {
            if self.inner.next()?.is_none() {
                // Offset past the end: empty result, not an error.
                return Ok(None);
            }
            self.to_skip -= 1;
        }
        match self.inner.next()? {
            Some(entry) => {
                if let Some(remaining) = &mut self.remaining {
                    *remaining -= 1;
                }
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.inner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::RangeOp;
    use shale_core::{Error, Key, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn user(path: &str, age: i64) -> Entry {
        let mut fields = HashMap::new();
        fields.insert("age".to_string(), Value::Int(age));
        Entry::new(Key::parse(path).unwrap(), Value::Object(fields))
    }

    fn keys(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| e.key().to_string()).collect()
    }

    /// Counts pulls so tests can observe laziness.
    struct CountingSource {
        entries: std::vec::IntoIter<Entry>,
        pulls: Arc<AtomicUsize>,
    }

    impl EntrySource for CountingSource {
        fn pull(&mut self) -> Result<Option<Entry>> {
            self.pulls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entries.next())
        }
    }

    fn counting_cursor(entries: Vec<Entry>) -> (Cursor, Arc<AtomicUsize>) {
        let pulls = Arc::new(AtomicUsize::new(0));
        let cursor = Cursor::new(CountingSource {
            entries: entries.into_iter(),
            pulls: pulls.clone(),
        });
        (cursor, pulls)
    }

    #[test]
    fn empty_fallback_passes_through() {
        let raw = Cursor::from_entries(vec![user("/b", 2), user("/a", 1)]);
        let out = Fallback::none().wrap(raw).collect().unwrap();
        assert_eq!(keys(&out), vec!["/b", "/a"]);
    }

    #[test]
    fn filter_stage_is_lazy() {
        let (raw, pulls) = counting_cursor(vec![user("/a", 1), user("/b", 2), user("/c", 3)]);
        let fallback = Fallback {
            filters: vec![Filter::field_range("age", RangeOp::Ge, 2i64)],
            ..Fallback::default()
        };
        let mut cursor = fallback.wrap(raw);

        let first = cursor.next().unwrap().unwrap();
        assert_eq!(first.key().to_string(), "/b");
        // Two pulls to find the first match; /c not touched yet.
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn order_stage_materializes_and_sorts_stably() {
        let raw = Cursor::from_entries(vec![
            user("/c", 2),
            user("/a", 1),
            user("/b", 2), // ties with /c on age; must stay after it
        ]);
        let fallback = Fallback {
            orders: vec![Order::field_asc("age")],
            ..Fallback::default()
        };

        let out = fallback.wrap(raw).collect().unwrap();
        assert_eq!(keys(&out), vec!["/a", "/c", "/b"]);
    }

    #[test]
    fn order_failure_discards_buffered_entries() {
        let raw = Cursor::from_entries(vec![
            user("/a", 1),
            Entry::new(Key::parse("/bad").unwrap(), Value::Int(0)), // no object
        ]);
        let fallback = Fallback {
            orders: vec![Order::field_asc("age")],
            ..Fallback::default()
        };
        let mut cursor = fallback.wrap(raw);

        assert!(cursor.next().is_err());
        // Terminal: nothing already buffered leaks out.
        assert!(cursor.next().unwrap().is_none());
    }

    #[test]
    fn skip_take_without_order_stays_lazy() {
        let (raw, pulls) = counting_cursor(vec![
            user("/a", 1),
            user("/b", 2),
            user("/c", 3),
            user("/d", 4),
        ]);
        let fallback = Fallback {
            offset: Some(1),
            limit: Some(1),
            ..Fallback::default()
        };

        let out = fallback.wrap(raw).collect().unwrap();
        assert_eq!(keys(&out), vec!["/b"]);
        // One skipped + one yielded; the tail was never pulled.
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn offset_past_end_is_empty_not_error() {
        let raw = Cursor::from_entries(vec![user("/a", 1)]);
        let fallback = Fallback {
            offset: Some(10),
            ..Fallback::default()
        };

        let out = fallback.wrap(raw).collect().unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn limit_zero_pulls_nothing() {
        let (raw, pulls) = counting_cursor(vec![user("/a", 1), user("/b", 2)]);
        let fallback = Fallback {
            limit: Some(0),
            ..Fallback::default()
        };

        let out = fallback.wrap(raw).collect().unwrap();
        assert!(out.is_empty());
        assert_eq!(pulls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn limit_stops_pulling_once_satisfied() {
        let (raw, pulls) = counting_cursor(vec![user("/a", 1), user("/b", 2), user("/c", 3)]);
        let fallback = Fallback {
            limit: Some(2),
            ..Fallback::default()
        };

        let out = fallback.wrap(raw).collect().unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn filter_errors_propagate_and_terminate() {
        let raw = Cursor::from_entries(vec![user("/a", 1)]);
        let fallback = Fallback {
            filters: vec![Filter::field_eq("missing", 1i64)],
            ..Fallback::default()
        };
        let mut cursor = fallback.wrap(raw);

        match cursor.next() {
            Err(Error::FieldAccess { .. }) => {}
            other => panic!("expected field access error, got {other:?}"),
        }
        assert!(cursor.next().unwrap().is_none());
    }

    #[test]
    fn full_pipeline_filter_order_window() {
        let raw = Cursor::from_entries(vec![
            user("/e", 50),
            user("/a", 10),
            user("/c", 30),
            user("/b", 20),
            user("/d", 40),
        ]);
        let fallback = Fallback {
            filters: vec![Filter::field_range("age", RangeOp::Gt, 10i64)],
            orders: vec![Order::field_asc("age")],
            offset: Some(1),
            limit: Some(2),
        };

        let out = fallback.wrap(raw).collect().unwrap();
        assert_eq!(keys(&out), vec!["/c", "/d"]);
    }
}

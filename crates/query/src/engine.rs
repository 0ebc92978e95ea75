//! The engine entry point
//!
//! [`execute`] is the sole way a query meets an adapter: negotiate a plan,
//! open the adapter scan with the native subset, and wrap the rest in the
//! fallback executor.

use crate::adapter::Adapter;
use crate::plan::Plan;
use crate::query::Query;
use shale_core::{Cursor, Result};
use tracing::debug;

/// Execute `query` against `adapter`, returning a lazy cursor over the
/// filtered, ordered, windowed result.
///
/// Capabilities are asked for fresh on every call, never cached, and the
/// negotiated plan guarantees full query semantics regardless of how
/// little the adapter can do natively. Pushdown changes performance, not
/// results.
///
/// # Errors
///
/// Opening the scan can fail with [`shale_core::Error::Adapter`];
/// evaluation failures ([`shale_core::Error::FieldAccess`], further
/// adapter errors) surface from [`Cursor::next`] and are terminal for the
/// returned cursor.
///
/// # Examples
///
/// ```
/// use shale_query::{execute, testing::StaticAdapter, Order, Query};
/// use shale_core::{Entry, Key, Value};
///
/// let adapter = StaticAdapter::new(vec![
///     Entry::new(Key::parse("/b")?, Value::Int(2)),
///     Entry::new(Key::parse("/a")?, Value::Int(1)),
/// ]);
/// let query = Query::new().order(Order::key_asc()).limit(1);
///
/// let entries = execute(&adapter, &query)?.collect()?;
/// assert_eq!(entries[0].key().to_string(), "/a");
/// # Ok::<(), shale_core::Error>(())
/// ```
pub fn execute(adapter: &dyn Adapter, query: &Query) -> Result<Cursor> {
    let capabilities = adapter.capabilities(query);
    let plan = Plan::negotiate(query, &capabilities);
    debug!(
        native_filters = plan.native.filters().len(),
        fallback_filters = plan.fallback.filters().len(),
        native_order = !plan.native.orders().is_empty(),
        fallback_order = !plan.fallback.orders().is_empty(),
        fully_native = plan.is_fully_native(),
        "negotiated query plan"
    );
    let raw = adapter.scan(&plan.native)?;
    Ok(plan.fallback.wrap(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::filter::Filter;
    use crate::order::Order;
    use crate::testing::StaticAdapter;
    use shale_core::{Entry, Key, Value};
    use std::collections::HashMap;

    fn user(path: &str, age: i64) -> Entry {
        let mut fields = HashMap::new();
        fields.insert("age".to_string(), Value::Int(age));
        Entry::new(Key::parse(path).unwrap(), Value::Object(fields))
    }

    #[test]
    fn identity_query_yields_scan_unchanged() {
        let adapter = StaticAdapter::new(vec![user("/b", 2), user("/a", 1)]);
        let out = execute(&adapter, &Query::new()).unwrap().collect().unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].key().to_string(), "/b");
    }

    #[test]
    fn same_results_with_and_without_capabilities() {
        let entries = vec![user("/c", 30), user("/a", 10), user("/b", 20)];
        let query = Query::new()
            .filter(Filter::field_eq("age", 20i64).negate())
            .order(Order::field_desc("age"))
            .limit(2);

        let fallback_only = StaticAdapter::new(entries.clone());
        let fully_native =
            StaticAdapter::new(entries).with_capabilities(Capabilities::full());

        let a = execute(&fallback_only, &query).unwrap().collect().unwrap();
        let b = execute(&fully_native, &query).unwrap().collect().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].key().to_string(), "/c");
    }
}

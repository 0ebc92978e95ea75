//! The backend-independent query descriptor

use crate::filter::Filter;
use crate::order::Order;

/// An immutable description of what to return: filters combined by
/// conjunction, orders composed lexicographically, then an optional offset
/// and limit applied strictly after filtering and ordering, never before.
///
/// Builder methods consume the query and return a new one, so a query can
/// be cloned and reused across adapters without aliasing surprises.
/// [`Query::new`] is the identity query: it passes every entry through
/// unchanged.
///
/// # Examples
///
/// ```
/// use shale_query::{Filter, Order, Query};
/// use shale_core::Key;
///
/// let query = Query::new()
///     .filter(Filter::key_prefix(Key::parse("/users")?))
///     .order(Order::key_asc())
///     .offset(10)
///     .limit(20);
/// assert_eq!(query.get_limit(), Some(20));
/// # Ok::<(), shale_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    orders: Vec<Order>,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl Query {
    /// The identity query: no filters, no orders, no offset, no limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; all filters combine by conjunction.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an order; orders compose lexicographically, the first being the
    /// primary sort key and later ones breaking ties.
    pub fn order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Skip the first `offset` entries of the filtered, ordered result.
    ///
    /// Calling this again replaces the prior value (last write wins); the
    /// offsets do not add up. An offset past the end of the result yields
    /// an empty result, not an error.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` entries of the filtered, ordered, offset
    /// result.
    ///
    /// Calling this again replaces the prior value (last write wins). A
    /// limit of 0 yields an empty result without pulling anything from the
    /// backend.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The filter conjunction, in insertion order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// The composed ordering, primary first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The configured offset, if any.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// The configured limit, if any.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Whether this is the identity query.
    pub fn is_identity(&self) -> bool {
        self.filters.is_empty()
            && self.orders.is_empty()
            && self.offset.is_none()
            && self.limit.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shale_core::Key;

    #[test]
    fn identity_query() {
        assert!(Query::new().is_identity());
        assert!(!Query::new().limit(5).is_identity());
    }

    #[test]
    fn builder_accumulates_filters_and_orders() {
        let query = Query::new()
            .filter(Filter::field_eq("a", 1i64))
            .filter(Filter::key_prefix(Key::root()))
            .order(Order::key_asc())
            .order(Order::field_desc("a"));

        assert_eq!(query.filters().len(), 2);
        assert_eq!(query.orders().len(), 2);
    }

    #[test]
    fn offset_and_limit_last_write_wins() {
        let query = Query::new().offset(5).limit(10).offset(7).limit(3);

        assert_eq!(query.get_offset(), Some(7));
        assert_eq!(query.get_limit(), Some(3));
    }

    #[test]
    fn builder_does_not_mutate_the_original() {
        let base = Query::new().limit(1);
        let extended = base.clone().limit(9);

        assert_eq!(base.get_limit(), Some(1));
        assert_eq!(extended.get_limit(), Some(9));
    }
}

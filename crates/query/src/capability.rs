//! Adapter capability declarations
//!
//! An adapter declares which query stages it can execute natively and
//! correctly: per-filter-kind support, full-ordering support, and
//! offset/limit support. The engine queries capabilities once per `execute`
//! invocation and never caches them across calls, since the adapter's own
//! state may change the answer.
//!
//! Declarations are a trust contract: the engine does not verify them. An
//! adapter claiming support it does not actually have produces silently
//! wrong query results.

use crate::filter::{Filter, FilterKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What an adapter claims to execute natively.
///
/// # Examples
///
/// ```
/// use shale_query::{Capabilities, FilterKind};
///
/// // A typical ordered KV backend: key-prefix scans only.
/// let caps = Capabilities::none().with_filter_kind(FilterKind::KeyPrefix);
/// assert!(caps.supports_filter_kind(FilterKind::KeyPrefix));
/// assert!(!caps.supports_ordering());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    filters: BTreeSet<FilterKind>,
    ordering: bool,
    paging: bool,
}

impl Capabilities {
    /// No native support at all; every stage falls back.
    pub fn none() -> Self {
        Self::default()
    }

    /// Full native support: every filter kind, composed ordering, and
    /// offset/limit.
    pub fn full() -> Self {
        Self {
            filters: FilterKind::ALL.into_iter().collect(),
            ordering: true,
            paging: true,
        }
    }

    /// Declare native support for one filter kind.
    pub fn with_filter_kind(mut self, kind: FilterKind) -> Self {
        self.filters.insert(kind);
        self
    }

    /// Declare native support for the entire composed ordering of a query.
    ///
    /// Ordering support is all-or-nothing: a partially sorted stream
    /// cannot be trusted without re-sorting, which would defeat pushdown.
    pub fn with_ordering(mut self) -> Self {
        self.ordering = true;
        self
    }

    /// Declare native support for offset and limit.
    pub fn with_paging(mut self) -> Self {
        self.paging = true;
        self
    }

    /// Whether a filter kind is natively supported.
    pub fn supports_filter_kind(&self, kind: FilterKind) -> bool {
        self.filters.contains(&kind)
    }

    /// Whether a concrete filter is natively supported.
    ///
    /// A composite filter is native only if its own kind and every child
    /// are native; otherwise the whole composite falls back.
    pub fn supports_filter(&self, filter: &Filter) -> bool {
        if !self.supports_filter_kind(filter.kind()) {
            return false;
        }
        match filter {
            Filter::Not(inner) => self.supports_filter(inner),
            Filter::All(children) | Filter::Any(children) => {
                children.iter().all(|child| self.supports_filter(child))
            }
            _ => true,
        }
    }

    /// Whether the adapter executes the full composed ordering natively.
    pub fn supports_ordering(&self) -> bool {
        self.ordering
    }

    /// Whether the adapter applies offset/limit natively.
    pub fn supports_paging(&self) -> bool {
        self.paging
    }
}

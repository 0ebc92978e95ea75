//! Capability negotiation: splitting a query into native and fallback stages
//!
//! Given a query and an adapter's declared capabilities, the negotiator
//! produces a [`Plan`]: the subset of stages the adapter runs natively (the
//! [`Pushdown`]) and the remainder the fallback executor completes. The
//! split preserves query semantics exactly; pushdown may only change
//! performance, never results.

use crate::adapter::Pushdown;
use crate::capability::Capabilities;
use crate::exec::Fallback;
use crate::query::Query;
use serde::{Deserialize, Serialize};

/// Where a stage executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// Inside the adapter, as declared by its capabilities.
    Native,
    /// In the generic fallback executor.
    Fallback,
}

/// A query stage, for plan introspection and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKind {
    /// One filter of the conjunction.
    Filter,
    /// The entire composed ordering.
    Order,
    /// Offset and limit, taken together.
    Paging,
}

/// How one query stage was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// What the stage does.
    pub kind: StageKind,
    /// Where it runs.
    pub placement: Placement,
}

/// The negotiated execution plan for one query against one adapter.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Stages the adapter executes natively.
    pub native: Pushdown,
    /// Stages the fallback executor completes.
    pub fallback: Fallback,
}

impl Plan {
    /// Split `query` between native and fallback execution under the
    /// adapter's declared `capabilities`.
    ///
    /// The rules, in order:
    ///
    /// 1. Each filter is placed independently: filter conjunction is
    ///    commutative, so the native subset may interleave with fallback
    ///    filters without changing results.
    /// 2. Ordering is all-or-nothing: it is pushed down only when the
    ///    adapter supports the entire composed ordering. A partial native
    ///    sort cannot be completed without re-sorting everything, which
    ///    would defeat the pushdown.
    /// 3. Offset/limit are pushed down only when filtering AND ordering
    ///    are both fully native. Windowing a stream that still has
    ///    un-applied filters or an un-applied sort would select the wrong
    ///    window.
    pub fn negotiate(query: &Query, capabilities: &Capabilities) -> Self {
        let mut native = Pushdown::none();
        let mut fallback = Fallback::none();

        for filter in query.filters() {
            if capabilities.supports_filter(filter) {
                native.filters.push(filter.clone());
            } else {
                fallback.filters.push(filter.clone());
            }
        }

        let order_native = query.orders().is_empty() || capabilities.supports_ordering();
        if order_native {
            native.orders = query.orders().to_vec();
        } else {
            fallback.orders = query.orders().to_vec();
        }

        let paging_native =
            capabilities.supports_paging() && fallback.filters.is_empty() && order_native;
        if paging_native {
            native.offset = query.get_offset();
            native.limit = query.get_limit();
        } else {
            fallback.offset = query.get_offset();
            fallback.limit = query.get_limit();
        }

        Self { native, fallback }
    }

    /// Whether every stage was pushed down.
    pub fn is_fully_native(&self) -> bool {
        self.fallback.is_empty()
    }

    /// The stage list with placements: native filters, then fallback
    /// filters, then ordering, then paging. Filter interleaving from the
    /// query is not preserved; conjunction makes it irrelevant to results.
    /// Stages absent from the query are omitted.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();
        for _ in &self.native.filters {
            stages.push(Stage {
                kind: StageKind::Filter,
                placement: Placement::Native,
            });
        }
        for _ in &self.fallback.filters {
            stages.push(Stage {
                kind: StageKind::Filter,
                placement: Placement::Fallback,
            });
        }
        if !self.native.orders.is_empty() {
            stages.push(Stage {
                kind: StageKind::Order,
                placement: Placement::Native,
            });
        } else if !self.fallback.orders.is_empty() {
            stages.push(Stage {
                kind: StageKind::Order,
                placement: Placement::Fallback,
            });
        }
        if self.native.offset.is_some() || self.native.limit.is_some() {
            stages.push(Stage {
                kind: StageKind::Paging,
                placement: Placement::Native,
            });
        } else if self.fallback.offset.is_some() || self.fallback.limit.is_some() {
            stages.push(Stage {
                kind: StageKind::Paging,
                placement: Placement::Fallback,
            });
        }
        stages
    }
}

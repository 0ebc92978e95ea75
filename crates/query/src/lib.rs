//! Backend-independent query execution for the shale datastore
//!
//! This crate is the query engine: it takes a [`Query`] (filters,
//! ordering, offset, limit), negotiates with an [`Adapter`] over which
//! stages the backend can run natively, and completes the rest in a
//! generic fallback executor, lazily, over a cancelable [`Cursor`].
//!
//! ```text
//! Query ──► Plan::negotiate(caps) ──► adapter.scan(native pushdown)
//!                                          │
//!                             Fallback::wrap(raw cursor)
//!                                          │
//!                                caller consumes Cursor
//! ```
//!
//! The split never changes results, only where work happens: correctness
//! is defined by the all-fallback reference execution, and pushdown must
//! agree with it.

pub mod adapter;
pub mod capability;
pub mod engine;
pub mod exec;
pub mod filter;
pub mod order;
pub mod plan;
pub mod query;
pub mod testing;

pub use adapter::{Adapter, Pushdown};
pub use capability::Capabilities;
pub use engine::execute;
pub use exec::Fallback;
pub use filter::{matches_all, Filter, FilterKind, RangeOp};
pub use order::{compare_all, sort_entries, Direction, Order};
pub use plan::{Placement, Plan, Stage, StageKind};
pub use query::Query;

// The cursor contract is half of this crate's API surface; re-export it.
pub use shale_core::{Cursor, CursorState, EntrySource};

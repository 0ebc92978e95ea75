//! # Shale
//!
//! A uniform key/value datastore abstraction: one API surface (get, put,
//! delete, iterate, query) that works identically whether the underlying
//! storage is an in-memory map, a filesystem tree, or a remote service,
//! reached through pluggable adapters.
//!
//! The heart of the system is the query engine in [`shale_query`]: a
//! backend-neutral query algebra (filters, ordering, offset, limit), a
//! capability negotiator that decides per adapter which stages run
//! natively, and a generic fallback executor that completes the rest,
//! lazily and cancelably, over cursors that may be unbounded.
//!
//! ## Quick Start
//!
//! ```
//! use shale::prelude::*;
//!
//! let store = MemoryStore::new();
//! store.put(Key::parse("/users/alice")?, Value::Int(30));
//! store.put(Key::parse("/users/bob")?, Value::Int(25));
//!
//! let query = Query::new()
//!     .filter(Filter::key_prefix(Key::parse("/users")?))
//!     .order(Order::key_desc())
//!     .limit(1);
//!
//! let mut cursor = store.query(&query)?;
//! let entry = cursor.next()?.expect("one entry");
//! assert_eq!(entry.key().to_string(), "/users/bob");
//! # Ok::<(), shale::Error>(())
//! ```
//!
//! ## Writing an adapter
//!
//! Implement [`Adapter`]: a raw `scan` honoring whatever pushdown the
//! engine hands you, and a `capabilities` declaration of what you can run
//! natively. Declare only what you execute correctly: the engine trusts
//! you and does not verify.

#![warn(missing_docs)]

mod store;

pub mod prelude;

pub use store::MemoryStore;

// Core model
pub use shale_core::{Cursor, CursorState, Entry, EntrySource, Error, Key, Result, Value};

// Query engine
pub use shale_query::{
    execute, Adapter, Capabilities, Direction, Filter, FilterKind, Order, Placement, Plan,
    Pushdown, Query, RangeOp, Stage, StageKind,
};

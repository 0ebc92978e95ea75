//! Convenient imports for shale.
//!
//! Re-exports the types most callers touch, so you can get started with a
//! single import:
//!
//! ```
//! use shale::prelude::*;
//!
//! let store = MemoryStore::new();
//! store.put(Key::parse("/greeting")?, Value::from("hello"));
//! # Ok::<(), shale::Error>(())
//! ```

// Reference store
pub use crate::MemoryStore;

// Core model
pub use crate::{Cursor, CursorState, Entry, Error, Key, Result, Value};

// Query building and execution
pub use crate::{execute, Direction, Filter, Order, Query, RangeOp};

// Adapter authoring
pub use crate::{Adapter, Capabilities, FilterKind, Pushdown};

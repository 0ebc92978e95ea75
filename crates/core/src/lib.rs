//! Core types for the shale datastore abstraction
//!
//! This crate defines the identity, payload, and iteration primitives the
//! rest of the system is built on:
//! - [`Key`]: ordered, path-like identifier
//! - [`Value`]: opaque payload, interpreted only by field filters/orders
//! - [`Entry`]: the (Key, Value) pair flowing through iteration
//! - [`Cursor`] / [`EntrySource`]: lazy, single-consumer, cancelable
//!   sequences shared by adapters and the query executor
//! - [`Error`] / [`Result`]: the crate-wide error taxonomy

pub mod cursor;
pub mod entry;
pub mod error;
pub mod key;
pub mod value;

pub use cursor::{Cursor, CursorState, EntrySource};
pub use entry::Entry;
pub use error::{Error, Result};
pub use key::Key;
pub use value::Value;

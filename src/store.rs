//! Reference in-memory datastore.
//!
//! [`MemoryStore`] is the uniform API surface over the simplest possible
//! backend: a `BTreeMap` behind a lock. It doubles as the reference
//! adapter for the query engine: with no claimed capabilities it defines
//! what correct query results look like, and with configured capabilities
//! it exercises honest pushdown.

use parking_lot::RwLock;
use shale_core::{Cursor, Entry, Key, Result, Value};
use shale_query::{execute, Adapter, Capabilities, Pushdown, Query};
use std::collections::BTreeMap;

/// An in-memory key/value store with the full datastore surface:
/// get, put, delete, iterate, query.
///
/// Writes take the lock briefly; scans snapshot the map, so a cursor never
/// observes writes made after it was opened and holds no lock while the
/// consumer drains it.
///
/// # Example
///
/// ```
/// use shale::prelude::*;
///
/// let store = MemoryStore::new();
/// let key = Key::parse("/users/alice")?;
/// store.put(key.clone(), Value::Int(30));
///
/// assert_eq!(store.get(&key), Some(Value::Int(30)));
/// assert!(store.delete(&key));
/// assert!(store.is_empty());
/// # Ok::<(), shale::Error>(())
/// ```
pub struct MemoryStore {
    entries: RwLock<BTreeMap<Key, Value>>,
    capabilities: Capabilities,
}

impl MemoryStore {
    /// An empty store claiming no native query capabilities: every query
    /// stage runs in the fallback executor. This is the reference
    /// configuration.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            capabilities: Capabilities::none(),
        }
    }

    /// An empty store claiming (and honoring) the given capabilities.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            capabilities,
        }
    }

    /// Store or replace the value named by `key`.
    pub fn put(&self, key: Key, value: Value) {
        self.entries.write().insert(key, value);
    }

    /// The value named by `key`, if present.
    pub fn get(&self, key: &Key) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    /// Remove the value named by `key`; returns whether it existed.
    pub fn delete(&self, key: &Key) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Whether `key` names a value.
    pub fn contains(&self, key: &Key) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// A cursor over all entries under `prefix` (or everything, for
    /// `None`), in ascending key order.
    pub fn iterate(&self, prefix: Option<&Key>) -> Cursor {
        let entries: Vec<Entry> = self
            .entries
            .read()
            .iter()
            .filter(|(key, _)| prefix.map_or(true, |p| key.starts_with(p)))
            .map(|(key, value)| Entry::new(key.clone(), value.clone()))
            .collect();
        Cursor::from_entries(entries)
    }

    /// Execute a query against this store.
    ///
    /// Equivalent to [`shale_query::execute`] with this store as the
    /// adapter.
    pub fn query(&self, query: &Query) -> Result<Cursor> {
        execute(self, query)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for MemoryStore {
    /// Snapshot the map and honor the pushdown with the engine's
    /// reference semantics. The raw scan order is ascending key order,
    /// which keeps re-execution deterministic.
    fn scan(&self, pushdown: &Pushdown) -> Result<Cursor> {
        let snapshot: Vec<Entry> = self
            .entries
            .read()
            .iter()
            .map(|(key, value)| Entry::new(key.clone(), value.clone()))
            .collect();
        let entries = pushdown.apply(snapshot)?;
        Ok(Cursor::from_entries(entries))
    }

    fn capabilities(&self, _query: &Query) -> Capabilities {
        self.capabilities.clone()
    }
}

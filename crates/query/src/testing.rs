//! Test adapters for exercising the engine
//!
//! These adapters make engine behavior observable from the outside:
//! [`StaticAdapter`] is an honest in-memory backend with configurable
//! capability claims, [`CountingAdapter`] counts pulls, [`TrackingAdapter`]
//! counts cursor opens and closes, and [`MisdeclaringAdapter`] claims
//! capabilities it does not honor (the adversarial case the capability
//! trust contract warns about).
//!
//! They live in the library (not a test directory) so downstream adapter
//! authors can reuse them against their own backends.

use crate::adapter::{Adapter, Pushdown};
use crate::capability::Capabilities;
use crate::query::Query;
use shale_core::{Cursor, Entry, EntrySource, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// An honest in-memory adapter over a fixed entry list.
///
/// Whatever capabilities it is configured to claim, it honors: the
/// pushdown is applied with the engine's own reference semantics
/// ([`Pushdown::apply`]). With [`Capabilities::none`] (the default) it is
/// the pure fallback reference backend from which correct results are
/// defined.
#[derive(Debug, Clone, Default)]
pub struct StaticAdapter {
    entries: Vec<Entry>,
    capabilities: Capabilities,
}

impl StaticAdapter {
    /// An adapter over `entries`, claiming no native capabilities.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            capabilities: Capabilities::none(),
        }
    }

    /// Claim the given capabilities (and honor them).
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

impl Adapter for StaticAdapter {
    fn scan(&self, pushdown: &Pushdown) -> Result<Cursor> {
        let entries = pushdown.apply(self.entries.clone())?;
        Ok(Cursor::from_entries(entries))
    }

    fn capabilities(&self, _query: &Query) -> Capabilities {
        self.capabilities.clone()
    }
}

/// Wraps an adapter and counts every pull made against its cursors.
///
/// Used to prove laziness properties, e.g. that a limit of 0 pulls zero
/// entries from the backend.
pub struct CountingAdapter<A> {
    inner: A,
    pulls: Arc<AtomicUsize>,
}

impl<A> CountingAdapter<A> {
    /// Wrap `inner`.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            pulls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total pulls across all cursors opened so far.
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }
}

impl<A: Adapter> Adapter for CountingAdapter<A> {
    fn scan(&self, pushdown: &Pushdown) -> Result<Cursor> {
        let inner = self.inner.scan(pushdown)?;
        Ok(Cursor::new(CountingSource {
            inner,
            pulls: self.pulls.clone(),
        }))
    }

    fn capabilities(&self, query: &Query) -> Capabilities {
        self.inner.capabilities(query)
    }
}

struct CountingSource {
    inner: Cursor,
    pulls: Arc<AtomicUsize>,
}

impl EntrySource for CountingSource {
    fn pull(&mut self) -> Result<Option<Entry>> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        self.inner.next()
    }

    fn close(&mut self) {
        self.inner.cancel();
    }
}

/// Wraps an adapter and counts cursor opens and closes.
///
/// A consumer abandoning a cursor must, on every exit path, trigger
/// release of whatever the adapter holds; this adapter makes that
/// observable as `opened() == closed()`.
pub struct TrackingAdapter<A> {
    inner: A,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl<A> TrackingAdapter<A> {
    /// Wrap `inner`.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Cursors opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Cursors whose resources were released so far.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether every opened cursor has been released.
    pub fn is_balanced(&self) -> bool {
        self.opened() == self.closed()
    }
}

impl<A: Adapter> Adapter for TrackingAdapter<A> {
    fn scan(&self, pushdown: &Pushdown) -> Result<Cursor> {
        let inner = self.inner.scan(pushdown)?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Cursor::new(TrackingSource {
            inner,
            closed: self.closed.clone(),
        }))
    }

    fn capabilities(&self, query: &Query) -> Capabilities {
        self.inner.capabilities(query)
    }
}

struct TrackingSource {
    inner: Cursor,
    closed: Arc<AtomicUsize>,
}

impl EntrySource for TrackingSource {
    fn pull(&mut self) -> Result<Option<Entry>> {
        self.inner.next()
    }

    fn close(&mut self) {
        self.inner.cancel();
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// An adapter that claims capabilities but ignores the pushdown.
///
/// The engine trusts capability declarations and does not verify native
/// execution, so this adapter produces silently wrong results, which is
/// exactly the hazard the trust contract documents. Useful for asserting
/// that the hazard is real.
pub struct MisdeclaringAdapter<A> {
    inner: A,
    claimed: Capabilities,
}

impl<A> MisdeclaringAdapter<A> {
    /// Wrap `inner`, claiming `claimed` without honoring it.
    pub fn new(inner: A, claimed: Capabilities) -> Self {
        Self { inner, claimed }
    }
}

impl<A: Adapter> Adapter for MisdeclaringAdapter<A> {
    fn scan(&self, _pushdown: &Pushdown) -> Result<Cursor> {
        // Drops the pushdown on the floor: raw scan regardless.
        self.inner.scan(&Pushdown::none())
    }

    fn capabilities(&self, _query: &Query) -> Capabilities {
        self.claimed.clone()
    }
}

/// An adapter whose scans fail, for exercising error propagation.
#[derive(Debug, Clone, Default)]
pub struct FailingAdapter;

impl Adapter for FailingAdapter {
    fn scan(&self, _pushdown: &Pushdown) -> Result<Cursor> {
        Err(shale_core::Error::adapter(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "backend unavailable",
        )))
    }

    fn capabilities(&self, _query: &Query) -> Capabilities {
        Capabilities::none()
    }
}

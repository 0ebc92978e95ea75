//! Lazy, single-consumer, cancelable iteration over entries
//!
//! A [`Cursor`] is the one sequence abstraction shared by adapters and the
//! fallback executor: forward-only, owned by exactly one consumer, and
//! never restartable. Once exhausted, canceled, or failed, a cursor stays
//! terminal; a new cursor is obtained by re-issuing the query.
//!
//! Whoever opens a cursor must guarantee its backing resources are
//! released on every exit path. The cursor discharges that obligation
//! itself: the source is closed on exhaustion, on the first failed pull,
//! on [`Cursor::cancel`], and on drop.

use crate::entry::Entry;
use crate::error::Result;
use std::fmt;

/// Something a cursor can pull entries from.
///
/// Adapters implement this over their backing storage; executor stages
/// implement it over an inner cursor. Every pull may fail: a source may be
/// backed by disk or network I/O, and callers must not assume retrieval is
/// free of latency or failure.
pub trait EntrySource: Send {
    /// Pull the next entry, `Ok(None)` when the source is drained.
    fn pull(&mut self) -> Result<Option<Entry>>;

    /// Release any held resources (file handles, connections).
    ///
    /// Called at most once, after which the source is never pulled again.
    /// The default is a no-op for purely in-memory sources.
    fn close(&mut self) {}
}

/// Lifecycle of a [`Cursor`].
///
/// `Ready` covers the yielding loop: the transient mid-pull state lives
/// inside [`Cursor::next`] and is not observable from outside. The other
/// three states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// More entries may follow; `next()` will pull from the source.
    Ready,
    /// The source was drained; `next()` returns `Ok(None)` forever.
    Exhausted,
    /// The consumer abandoned the cursor; `next()` returns `Ok(None)`.
    Canceled,
    /// A pull failed. The error was surfaced exactly once; no further
    /// entries are ever yielded, including any the source had buffered.
    Failed,
}

impl CursorState {
    /// Whether the cursor will never yield again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, CursorState::Ready)
    }
}

/// A lazy, forward-only sequence of entries.
///
/// Ownership is exclusive to the consumer; advancement takes `&mut self`,
/// so concurrent advancement of one cursor is unrepresentable rather than
/// undefined.
///
/// # Examples
///
/// ```
/// use shale_core::{Cursor, Entry, Key, Value};
///
/// let entries = vec![Entry::new(Key::parse("/a")?, Value::Int(1))];
/// let mut cursor = Cursor::from_entries(entries);
///
/// while let Some(entry) = cursor.next()? {
///     println!("{} = {:?}", entry.key(), entry.value());
/// }
/// assert!(cursor.state().is_terminal());
/// # Ok::<(), shale_core::Error>(())
/// ```
pub struct Cursor {
    state: CursorState,
    source: Box<dyn EntrySource>,
}

impl Cursor {
    /// Wrap an entry source.
    pub fn new(source: impl EntrySource + 'static) -> Self {
        Self {
            state: CursorState::Ready,
            source: Box::new(source),
        }
    }

    /// A cursor over an already-materialized sequence.
    ///
    /// Entries are yielded in the order given.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self::new(VecSource {
            entries: entries.into_iter(),
        })
    }

    /// A cursor that is empty from the start.
    pub fn empty() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Advance to the next entry.
    ///
    /// Returns `Ok(None)` once the cursor is exhausted, canceled, or
    /// failed, never an error from a terminal state. The first failed
    /// pull closes the source, moves the cursor to
    /// [`CursorState::Failed`], and surfaces the error exactly once.
    pub fn next(&mut self) -> Result<Option<Entry>> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        match self.source.pull() {
            Ok(Some(entry)) => Ok(Some(entry)),
            Ok(None) => {
                self.state = CursorState::Exhausted;
                self.source.close();
                Ok(None)
            }
            Err(err) => {
                self.state = CursorState::Failed;
                self.source.close();
                Err(err)
            }
        }
    }

    /// Abandon the cursor, releasing the source's resources.
    ///
    /// Safe to call in any state; only the first call in `Ready` closes
    /// the source. Subsequent `next()` calls return `Ok(None)`.
    pub fn cancel(&mut self) {
        if self.state == CursorState::Ready {
            self.state = CursorState::Canceled;
            self.source.close();
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Drain the cursor into a vector.
    ///
    /// On error the already-collected prefix is discarded, matching the
    /// no-partial-results policy of the engine.
    pub fn collect(mut self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

impl Drop for Cursor {
    /// Close the source if the consumer walked away mid-stream.
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("state", &self.state).finish()
    }
}

/// A cursor is itself a valid source, so executor stages can stack.
impl EntrySource for Cursor {
    fn pull(&mut self) -> Result<Option<Entry>> {
        self.next()
    }

    fn close(&mut self) {
        self.cancel();
    }
}

struct VecSource {
    entries: std::vec::IntoIter<Entry>,
}

impl EntrySource for VecSource {
    fn pull(&mut self) -> Result<Option<Entry>> {
        Ok(self.entries.next())
    }
}

//! Path-like keys with a total lexicographic order
//!
//! A [`Key`] names a value in a datastore. Keys are immutable sequences of
//! string segments, displayed as `/segment/segment/...`, and compare
//! lexicographically segment by segment. That ordering is the canonical
//! by-key ordering used by query execution and by ordered adapters.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered, path-like identifier for an entry.
///
/// Keys are immutable once constructed. Segments must be non-empty and must
/// not contain `/`; violations are rejected eagerly with
/// [`Error::InvalidArgument`].
///
/// # Ordering
///
/// Keys compare lexicographically over their segments, so `/a` < `/a/b` <
/// `/b`. The derived `Ord` on `Vec<String>` gives exactly this order.
///
/// # Examples
///
/// ```
/// use shale_core::Key;
///
/// let users = Key::parse("/users")?;
/// let alice = users.child("alice")?;
/// assert_eq!(alice.to_string(), "/users/alice");
/// assert!(alice.starts_with(&users));
/// # Ok::<(), shale_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    segments: Vec<String>,
}

impl Key {
    /// Build a key from an iterator of segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any segment is empty or
    /// contains `/`.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// The root key, ancestor of every other key.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a key from its `/a/b/c` string form.
    ///
    /// A leading `/` is optional; `""` and `"/"` both parse to the root key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] on empty segments (`"/a//b"`).
    ///
    /// # Examples
    ///
    /// ```
    /// use shale_core::Key;
    ///
    /// let key = Key::parse("/users/alice")?;
    /// assert_eq!(key.segments(), &["users", "alice"]);
    /// # Ok::<(), shale_core::Error>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.strip_prefix('/').unwrap_or(input);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        Self::new(trimmed.split('/'))
    }

    /// The segments of this key, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root key.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, or `None` for the root key.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// A new key with `segment` appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the segment is invalid.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self> {
        let segment = segment.into();
        validate_segment(&segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// The key with the final segment removed, or `None` for the root key.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether `prefix` is this key or one of its ancestors.
    ///
    /// Every key starts with the root key.
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::invalid_argument("key segment must not be empty"));
    }
    if segment.contains('/') {
        return Err(Error::invalid_argument(format!(
            "key segment {segment:?} must not contain '/'"
        )));
    }
    Ok(())
}

impl fmt::Display for Key {
    /// Display a key in the format: `/a/b/c` (root key displays as `/`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

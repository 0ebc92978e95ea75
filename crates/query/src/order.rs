//! Comparator specifications over entries
//!
//! An [`Order`] answers `compare(a, b) -> Ordering`. Like filters, orders
//! are pure and deterministic. A sequence of orders composes as a
//! lexicographic tuple: the first is the primary sort key, later ones break
//! ties, and entries equal under every order keep their scan order (the
//! fallback sort is stable).

use serde::{Deserialize, Serialize};
use shale_core::{Entry, Error, Result};
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl Direction {
    /// Apply this direction to an ascending comparison outcome.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// A single comparator specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    /// Order by the entry key's lexicographic segment order.
    Key(Direction),

    /// Order by a named field of the payload.
    Field {
        /// Field to read from the payload object
        field: String,
        /// Sort direction
        direction: Direction,
    },
}

impl Order {
    /// By key, smallest first.
    pub fn key_asc() -> Self {
        Order::Key(Direction::Ascending)
    }

    /// By key, largest first.
    pub fn key_desc() -> Self {
        Order::Key(Direction::Descending)
    }

    /// By field, smallest first.
    pub fn field_asc(field: impl Into<String>) -> Self {
        Order::Field {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    /// By field, largest first.
    pub fn field_desc(field: impl Into<String>) -> Self {
        Order::Field {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    /// Compare two entries under this order.
    ///
    /// # Errors
    ///
    /// [`Error::FieldAccess`] when a field order cannot evaluate against
    /// either entry: absent field, non-object payload, or values with no
    /// defined mutual order. Terminal for the query.
    pub fn compare(&self, a: &Entry, b: &Entry) -> Result<Ordering> {
        match self {
            Order::Key(direction) => Ok(direction.apply(a.key().cmp(b.key()))),
            Order::Field { field, direction } => {
                let va = a.field(field)?;
                let vb = b.field(field)?;
                match va.compare(vb) {
                    Some(ord) => Ok(direction.apply(ord)),
                    None => Err(Error::field_access(
                        field,
                        format!(
                            "cannot order {} against {}",
                            va.type_name(),
                            vb.type_name()
                        ),
                    )),
                }
            }
        }
    }
}

/// Compare two entries under a lexicographic composition of orders.
///
/// The first order is primary; subsequent orders only run on ties. An
/// empty composition compares everything equal.
pub fn compare_all(orders: &[Order], a: &Entry, b: &Entry) -> Result<Ordering> {
    for order in orders {
        match order.compare(a, b)? {
            Ordering::Equal => continue,
            decided => return Ok(decided),
        }
    }
    Ok(Ordering::Equal)
}

/// Stable-sort entries under a composed ordering.
///
/// Entries comparing equal under every order keep their input order. A
/// comparator failure aborts the sort and discards the buffer: no
/// partially-ordered result ever escapes.
pub fn sort_entries(mut entries: Vec<Entry>, orders: &[Order]) -> Result<Vec<Entry>> {
    if orders.is_empty() {
        return Ok(entries);
    }
    let mut failure: Option<Error> = None;
    // Vec::sort_by is stable. The comparator cannot return a Result, so
    // the first error is latched and everything after compares equal; the
    // buffer is discarded below if the latch is set.
    entries.sort_by(|a, b| {
        if failure.is_some() {
            return Ordering::Equal;
        }
        match compare_all(orders, a, b) {
            Ok(ord) => ord,
            Err(err) => {
                failure = Some(err);
                Ordering::Equal
            }
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(entries),
    }
}

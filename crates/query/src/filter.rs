//! Composable predicates over entries
//!
//! A [`Filter`] answers `matches(entry) -> bool`. Filters are pure: no side
//! effects, deterministic, and safe to evaluate zero, one, or many times in
//! any order consistent with the final result. A native adapter and the
//! fallback executor are both allowed to run them, so callers must not rely
//! on call count or call order. Conjunction is associative and commutative,
//! which is what lets the negotiator split a filter list between native and
//! fallback execution.

use serde::{Deserialize, Serialize};
use shale_core::{Entry, Error, Key, Result, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Comparison operator for range filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeOp {
    /// Field strictly less than the bound
    Lt,
    /// Field less than or equal to the bound
    Le,
    /// Field strictly greater than the bound
    Gt,
    /// Field greater than or equal to the bound
    Ge,
}

impl RangeOp {
    /// Whether an ordering outcome satisfies this operator.
    pub fn accepts(self, ord: Ordering) -> bool {
        match self {
            RangeOp::Lt => ord == Ordering::Less,
            RangeOp::Le => ord != Ordering::Greater,
            RangeOp::Gt => ord == Ordering::Greater,
            RangeOp::Ge => ord != Ordering::Less,
        }
    }
}

/// Tag identifying a filter variant, used for capability negotiation.
///
/// Adapters declare native support per kind; the negotiator matches each
/// filter's kind (and, for composites, its children) against that set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    /// [`Filter::KeyPrefix`]
    KeyPrefix,
    /// [`Filter::FieldEq`]
    FieldEq,
    /// [`Filter::FieldRange`]
    FieldRange,
    /// [`Filter::Not`]
    Negation,
    /// [`Filter::All`]
    Conjunction,
    /// [`Filter::Any`]
    Disjunction,
    /// [`Filter::Custom`]
    Custom,
}

impl FilterKind {
    /// Every kind, in declaration order.
    pub const ALL: [FilterKind; 7] = [
        FilterKind::KeyPrefix,
        FilterKind::FieldEq,
        FilterKind::FieldRange,
        FilterKind::Negation,
        FilterKind::Conjunction,
        FilterKind::Disjunction,
        FilterKind::Custom,
    ];
}

/// A predicate over an [`Entry`].
///
/// # Examples
///
/// ```
/// use shale_query::Filter;
/// use shale_core::{Entry, Key, Value};
///
/// let under_users = Filter::key_prefix(Key::parse("/users")?);
/// let entry = Entry::new(Key::parse("/users/alice")?, Value::Null);
/// assert!(under_users.matches(&entry)?);
/// # Ok::<(), shale_core::Error>(())
/// ```
#[derive(Clone)]
pub enum Filter {
    /// Entry key is the given key or a descendant of it.
    KeyPrefix(Key),

    /// Named field of the payload equals the given value (strict same-type
    /// equality, no coercion).
    FieldEq {
        /// Field to read from the payload object
        field: String,
        /// Value it must equal
        value: Value,
    },

    /// Named field of the payload compares against a bound.
    FieldRange {
        /// Field to read from the payload object
        field: String,
        /// Comparison operator
        op: RangeOp,
        /// Bound to compare against
        value: Value,
    },

    /// Inverts the inner filter.
    Not(Box<Filter>),

    /// Matches when every sub-filter matches; short-circuits at the first
    /// non-match. Empty conjunction matches everything.
    All(Vec<Filter>),

    /// Matches when any sub-filter matches; short-circuits at the first
    /// match. Empty disjunction matches nothing.
    Any(Vec<Filter>),

    /// Caller-supplied predicate.
    ///
    /// The predicate must be pure and deterministic, like every other
    /// filter. The name only identifies it in logs and debug output.
    Custom {
        /// Label for debug output
        name: String,
        /// The predicate itself
        predicate: Arc<dyn Fn(&Entry) -> Result<bool> + Send + Sync>,
    },
}

impl Filter {
    /// Filter entries whose key starts with `prefix`.
    pub fn key_prefix(prefix: Key) -> Self {
        Filter::KeyPrefix(prefix)
    }

    /// Filter entries whose `field` equals `value`.
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::FieldEq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Filter entries whose `field` compares against `value` under `op`.
    pub fn field_range(field: impl Into<String>, op: RangeOp, value: impl Into<Value>) -> Self {
        Filter::FieldRange {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Invert this filter.
    pub fn negate(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Conjunction of the given filters.
    pub fn all(filters: Vec<Filter>) -> Self {
        Filter::All(filters)
    }

    /// Disjunction of the given filters.
    pub fn any(filters: Vec<Filter>) -> Self {
        Filter::Any(filters)
    }

    /// Wrap a caller-supplied predicate.
    pub fn custom(
        name: impl Into<String>,
        predicate: impl Fn(&Entry) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        Filter::Custom {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// The variant tag used for capability negotiation.
    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::KeyPrefix(_) => FilterKind::KeyPrefix,
            Filter::FieldEq { .. } => FilterKind::FieldEq,
            Filter::FieldRange { .. } => FilterKind::FieldRange,
            Filter::Not(_) => FilterKind::Negation,
            Filter::All(_) => FilterKind::Conjunction,
            Filter::Any(_) => FilterKind::Disjunction,
            Filter::Custom { .. } => FilterKind::Custom,
        }
    }

    /// Evaluate this filter against an entry.
    ///
    /// # Errors
    ///
    /// [`Error::FieldAccess`] when a field filter cannot evaluate: the
    /// field is absent, the payload is not an object, or the field's type
    /// has no defined order against the bound. The engine treats this as
    /// terminal for the query.
    pub fn matches(&self, entry: &Entry) -> Result<bool> {
        match self {
            Filter::KeyPrefix(prefix) => Ok(entry.key().starts_with(prefix)),
            Filter::FieldEq { field, value } => Ok(entry.field(field)? == value),
            Filter::FieldRange { field, op, value } => {
                let actual = entry.field(field)?;
                match actual.compare(value) {
                    Some(ord) => Ok(op.accepts(ord)),
                    None => Err(Error::field_access(
                        field,
                        format!(
                            "cannot order {} against {}",
                            actual.type_name(),
                            value.type_name()
                        ),
                    )),
                }
            }
            Filter::Not(inner) => Ok(!inner.matches(entry)?),
            Filter::All(filters) => {
                for filter in filters {
                    if !filter.matches(entry)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Any(filters) => {
                for filter in filters {
                    if filter.matches(entry)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Filter::Custom { predicate, .. } => predicate(entry),
        }
    }
}

/// Evaluate a filter list as a conjunction, short-circuiting on the first
/// non-match. This is the semantics of a query's filter sequence.
pub fn matches_all(filters: &[Filter], entry: &Entry) -> Result<bool> {
    for filter in filters {
        if !filter.matches(entry)? {
            return Ok(false);
        }
    }
    Ok(true)
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::KeyPrefix(prefix) => f.debug_tuple("KeyPrefix").field(prefix).finish(),
            Filter::FieldEq { field, value } => f
                .debug_struct("FieldEq")
                .field("field", field)
                .field("value", value)
                .finish(),
            Filter::FieldRange { field, op, value } => f
                .debug_struct("FieldRange")
                .field("field", field)
                .field("op", op)
                .field("value", value)
                .finish(),
            Filter::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Filter::All(filters) => f.debug_tuple("All").field(filters).finish(),
            Filter::Any(filters) => f.debug_tuple("Any").field(filters).finish(),
            Filter::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
        }
    }
}

//! Unified error types for the datastore core.
//!
//! The taxonomy is deliberately small. The engine recovers nothing locally:
//! every failure surfaces to the immediate caller of `execute` or
//! `Cursor::next`, and there is no partial-result-on-error mode.

use thiserror::Error;

/// All datastore core errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller misuse, detected eagerly at construction time (malformed
    /// keys, malformed queries). Never silently repaired.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A filter or order could not evaluate against an entry, e.g. the
    /// named field is absent or its type carries no defined order.
    ///
    /// This is terminal for the whole query: skipping the entry instead
    /// would silently change result-set semantics.
    #[error("field access failed for `{field}`: {reason}")]
    FieldAccess {
        /// The field the filter or order tried to read
        field: String,
        /// Why the access failed
        reason: String,
    },

    /// Opaque backend failure, passed through unchanged.
    ///
    /// The core never retries: it cannot know whether the backend
    /// operation is idempotent. Retry policy belongs to the adapter or
    /// the caller.
    #[error("adapter error: {0}")]
    Adapter(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Cooperative abandonment of a cursor by its consumer.
    ///
    /// Not a failure for the purposes of resource cleanup; cleanup still
    /// runs on cancellation.
    #[error("canceled")]
    Canceled,
}

/// Result type for datastore core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Build an [`Error::FieldAccess`].
    pub fn field_access(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::FieldAccess {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a backend failure as an [`Error::Adapter`].
    pub fn adapter(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Adapter(Box::new(err))
    }

    /// Check if this is an invalid-argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if this is a field-access error.
    pub fn is_field_access(&self) -> bool {
        matches!(self, Error::FieldAccess { .. })
    }

    /// Check if this is a propagated adapter error.
    pub fn is_adapter(&self) -> bool {
        matches!(self, Error::Adapter(_))
    }

    /// Check if this is a cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::Canceled)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Adapter(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = Error::invalid_argument("offset must be finite");
        assert_eq!(err.to_string(), "invalid argument: offset must be finite");

        let err = Error::field_access("age", "field is absent");
        assert_eq!(
            err.to_string(),
            "field access failed for `age`: field is absent"
        );

        assert_eq!(Error::Canceled.to_string(), "canceled");
    }

    #[test]
    fn io_errors_become_adapter_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: Error = io.into();
        assert!(err.is_adapter());
    }

    #[test]
    fn predicates() {
        assert!(Error::invalid_argument("x").is_invalid_argument());
        assert!(Error::field_access("f", "r").is_field_access());
        assert!(Error::Canceled.is_canceled());
        assert!(!Error::Canceled.is_adapter());
    }
}

//! Error types for the query builder.
//!
//! All errors are strongly typed using thiserror so callers can match
//! on the kind of rejection and the field it concerns.

use thiserror::Error;

/// Errors raised when a value is rejected by a query setter.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The value has the wrong type or shape for the field.
    #[error("{field}: invalid input argument. {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },

    /// The value has the right type but does not follow the field's grammar.
    #[error("{field}: invalid format '{value}'. {expected}")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A JSON query description could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if this is an invalid-argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns true if this is an invalid-format error.
    #[must_use]
    pub const fn is_invalid_format(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }

    /// The field the error refers to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { field, .. } | Self::InvalidFormat { field, .. } => Some(*field),
            Self::Json(_) => None,
        }
    }
}

/// Result type alias for query builder operations.
pub type QueryResult<T> = Result<T, QueryError>;

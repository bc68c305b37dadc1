//! Error types for content search.
//!
//! Every failure surfaced by the crate is one variant of [`Error`]. Variants are
//! deliberately distinct so callers can map them to different outcomes: an
//! [`Error::UnknownField`] is a configuration or query bug, an
//! [`Error::NotFound`] is a normal "no such object" answer and an
//! [`Error::BackendUnavailable`] may be retried.

use thiserror::Error;

/// Result type alias for content search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, translating or executing searches.
///
/// Error codes follow the pattern `CSE-XXX`.
#[derive(Error, Debug)]
pub enum Error {
    /// A criterion value violates its operator specification (CSE-001).
    #[error("[CSE-001] Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operator is not supported by the criterion (CSE-002).
    #[error("[CSE-002] Operator {operator} is not supported by {criterion}")]
    InvalidOperator {
        /// Criterion kind that rejected the operator.
        criterion: String,
        /// Rejected operator.
        operator: String,
    },

    /// No physical field is mapped for the logical field (CSE-003).
    #[error("[CSE-003] Unknown field: {0}")]
    UnknownField(String),

    /// The search backend could not be reached or timed out (CSE-004).
    #[error("[CSE-004] Search backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A single-object search did not match exactly one object (CSE-005).
    #[error("[CSE-005] Expected exactly {expected} object to be found, found {found}")]
    InvalidObjectCount {
        /// Expected number of objects.
        expected: usize,
        /// Number of objects the query matched.
        found: usize,
    },

    /// The object does not exist or has no visible language (CSE-006).
    #[error("[CSE-006] Not found: {0}")]
    NotFound(String),

    /// Configuration error (CSE-007).
    #[error("[CSE-007] Configuration error: {0}")]
    Config(String),

    /// Serialization error (CSE-008).
    #[error("[CSE-008] Serialization error: {0}")]
    Serialization(String),

    /// Extension point without an implementation (CSE-009).
    #[error("[CSE-009] Not implemented: {0}")]
    NotImplemented(String),

    /// Internal error (CSE-010).
    ///
    /// Indicates an unexpected internal error. Please report if encountered.
    #[error("[CSE-010] Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns the error code (e.g., "CSE-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "CSE-001",
            Self::InvalidOperator { .. } => "CSE-002",
            Self::UnknownField(_) => "CSE-003",
            Self::BackendUnavailable(_) => "CSE-004",
            Self::InvalidObjectCount { .. } => "CSE-005",
            Self::NotFound(_) => "CSE-006",
            Self::Config(_) => "CSE-007",
            Self::Serialization(_) => "CSE-008",
            Self::NotImplemented(_) => "CSE-009",
            Self::Internal(_) => "CSE-010",
        }
    }

    /// Returns true if the caller may retry the failed operation.
    ///
    /// Only transient backend failures qualify; the crate never retries internally.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }

    pub(crate) fn invalid_operator(
        criterion: impl Into<String>,
        operator: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidOperator {
            criterion: criterion.into(),
            operator: operator.to_string(),
        }
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

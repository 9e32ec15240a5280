//! Shared types for the natural-language query gateway

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw text produced by the generation backend for one request,
/// before any fence stripping or validation.
#[derive(Debug, Clone)]
pub struct GeneratedCandidate {
    /// Trimmed candidate text as returned by the backend
    pub text: String,
    /// Model identifier that produced the text
    pub model: String,
}

/// Normalized result set for an executed statement
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Column names in SELECT order
    pub columns: Vec<String>,
    /// One JSON object per row, keyed by column name
    pub rows: Vec<Map<String, Value>>,
    /// Rows actually returned (after the cap is applied)
    pub row_count: usize,
    /// True when the statement produced more rows than the cap
    pub truncated: bool,
}

/// Why the safety policy refused a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Statement does not begin with the SELECT keyword
    NotASelect,
    /// Statement contains more than one SQL statement
    MultipleStatements,
    /// A data- or schema-modifying keyword appeared as a standalone word
    ForbiddenKeyword(String),
    /// A server-side escape construct appeared as a standalone word
    ForbiddenConstruct(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotASelect => write!(f, "not a SELECT statement"),
            RejectReason::MultipleStatements => write!(f, "multiple statements"),
            RejectReason::ForbiddenKeyword(word) => write!(f, "forbidden keyword {}", word),
            RejectReason::ForbiddenConstruct(word) => write!(f, "forbidden construct {}", word),
        }
    }
}

/// Everything that can go wrong between a natural-language request
/// and its JSON result
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request text was empty or whitespace-only
    #[error("Query text must not be empty")]
    InputEmpty,

    /// The generation backend could not be reached or answered abnormally
    #[error("Text generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// The backend answered but carried no usable candidate text
    #[error("Text generation returned no usable candidate")]
    GenerationEmpty,

    /// Candidate text was empty after fence and whitespace cleanup
    #[error("No SQL statement could be extracted from the generated text")]
    NoStatementExtracted,

    /// The safety policy refused the extracted statement
    #[error("Statement rejected: {reason}")]
    ValidationRejected {
        /// The offending statement, echoed back to the caller
        sql: String,
        reason: RejectReason,
    },

    /// The statement ran past the execution deadline
    #[error("Query execution timed out")]
    ExecutionTimeout,

    /// The store refused or failed the statement
    #[error("Query execution failed: {0}")]
    ExecutionError(String),

    /// A result value could not be converted to a JSON-safe representation
    #[error("Value in column '{column}' has no safe JSON representation")]
    SerializationUnsafeInteger { column: String },

    /// All generation slots or database connections are busy
    #[error("Gateway at capacity: {0}")]
    CapacityExceeded(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_display() {
        assert_eq!(RejectReason::NotASelect.to_string(), "not a SELECT statement");
        assert_eq!(
            RejectReason::ForbiddenKeyword("DELETE".to_string()).to_string(),
            "forbidden keyword DELETE"
        );
        assert_eq!(
            RejectReason::ForbiddenConstruct("PG_SLEEP".to_string()).to_string(),
            "forbidden construct PG_SLEEP"
        );
    }

    #[test]
    fn test_gateway_error_messages() {
        let err = GatewayError::ValidationRejected {
            sql: "DROP TABLE Employee".to_string(),
            reason: RejectReason::NotASelect,
        };
        assert_eq!(err.to_string(), "Statement rejected: not a SELECT statement");

        let err = GatewayError::SerializationUnsafeInteger {
            column: "payload".to_string(),
        };
        assert!(err.to_string().contains("payload"));
    }
}

//! Error types for the Matrix Core
//!
//! Every variant is reported to the caller as `success = false` plus the
//! display string; none of them is fatal to the service.

use super::value_objects::{ClientId, QueryKind};
use thiserror::Error;

/// Reasons a row submission can be rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    /// Client session has been marked completed
    #[error("Client {client} has already completed data submission. Cannot send again.")]
    ClientAlreadyCompleted { client: ClientId },

    /// Row width differs from the established column width
    #[error("Row dimension mismatch. Expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Reasons a query can fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Matrix has no rows yet
    #[error("No matrix data available. Please send matrix data first.")]
    NoDataAvailable,

    /// Determinant requested on a non-square matrix
    #[error("Dimensions not matched. Matrix is {rows}x{cols}, need square matrix for determinant.")]
    SquareMatrixRequired { rows: usize, cols: usize },

    /// Wire value outside the known query kinds
    #[error("Invalid query type {0}. Use 1 (row count), 2 (rank), or 3 (determinant)")]
    InvalidQueryType(i64),

    /// Numerical routine could not produce a value
    #[error("Error processing {query}: {reason}")]
    ComputationFailed { query: QueryKind, reason: String },
}

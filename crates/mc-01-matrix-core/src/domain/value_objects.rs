//! Value objects for the Matrix Core
//!
//! Identifiers, query kinds and shapes shared by the store, the session
//! registry and the query engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a row inside the shared matrix.
///
/// Assigned by the store, equal to the row count at acceptance time.
pub type RowIndex = usize;

/// Identity of a contributing client, as supplied on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ClientId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Aggregate property a client can ask about.
///
/// Discriminants match the wire values of `query_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum QueryKind {
    /// Number of stored rows
    RowCount = 1,
    /// Numerical rank
    Rank = 2,
    /// Determinant (square matrices only)
    Determinant = 3,
}

impl QueryKind {
    /// Wire value of this kind.
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Name used in log lines and failure messages.
    pub const fn name(self) -> &'static str {
        match self {
            QueryKind::RowCount => "row_count",
            QueryKind::Rank => "rank",
            QueryKind::Determinant => "determinant",
        }
    }
}

impl TryFrom<i64> for QueryKind {
    type Error = i64;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(QueryKind::RowCount),
            2 => Ok(QueryKind::Rank),
            3 => Ok(QueryKind::Determinant),
            other => Err(other),
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Actual value produced by a query. Threshold checks are the caller's job.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum QueryOutcome {
    RowCount(usize),
    Rank(usize),
    Determinant(f64),
}

impl QueryOutcome {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryOutcome::RowCount(_) => QueryKind::RowCount,
            QueryOutcome::Rank(_) => QueryKind::Rank,
            QueryOutcome::Determinant(_) => QueryKind::Determinant,
        }
    }
}

/// Rows x columns. `columns` is `None` until the first row fixes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixShape {
    pub rows: usize,
    pub columns: Option<usize>,
}

impl MatrixShape {
    pub fn is_square(&self) -> bool {
        self.columns == Some(self.rows)
    }
}

impl fmt::Display for MatrixShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.columns {
            Some(cols) => write!(f, "{}x{}", self.rows, cols),
            None => write!(f, "{}x?", self.rows),
        }
    }
}

/// Lifecycle phase of the shared matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixPhase {
    /// No row accepted yet; column width unset
    Empty,
    /// At least one row accepted; column width fixed for good
    Accumulating,
}

/// Acknowledgement for an accepted row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowReceipt {
    /// Index assigned to the row
    pub row_index: RowIndex,
    /// Rows stored after this one was appended
    pub total_stored: usize,
}

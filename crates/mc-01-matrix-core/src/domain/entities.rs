//! Core entities for the Matrix Core
//!
//! - [`MatrixStore`]: append-only rows with a column width fixed by the first row
//! - [`SessionRegistry`]: per-client bookkeeping
//! - [`MatrixSnapshot`]: immutable copy handed to the query engine
//!
//! None of these types lock anything themselves; the service wraps them in a
//! single mutex.

use super::errors::SubmissionError;
use super::value_objects::{ClientId, MatrixPhase, MatrixShape, RowIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One row of the shared matrix.
pub type MatrixRow = Vec<f64>;

/// Append-only row storage.
#[derive(Debug, Clone, Default)]
pub struct MatrixStore {
    rows: Vec<MatrixRow>,
    column_width: Option<usize>,
}

impl MatrixStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, fixing the column width if this is the first one.
    ///
    /// A rejected row leaves the store untouched.
    pub fn append_row(&mut self, values: MatrixRow) -> Result<RowIndex, SubmissionError> {
        let width = *self.column_width.get_or_insert(values.len());

        if values.len() != width {
            return Err(SubmissionError::DimensionMismatch {
                expected: width,
                actual: values.len(),
            });
        }

        let index = self.rows.len();
        self.rows.push(values);
        Ok(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_width(&self) -> Option<usize> {
        self.column_width
    }

    pub fn shape(&self) -> MatrixShape {
        MatrixShape {
            rows: self.rows.len(),
            columns: self.column_width,
        }
    }

    pub fn phase(&self) -> MatrixPhase {
        if self.rows.is_empty() {
            MatrixPhase::Empty
        } else {
            MatrixPhase::Accumulating
        }
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    /// Copy every stored row into an immutable snapshot.
    pub fn snapshot(&self) -> MatrixSnapshot {
        MatrixSnapshot {
            rows: Arc::from(self.rows.clone()),
            columns: self.column_width.unwrap_or(0),
        }
    }
}

/// Immutable copy of the matrix taken for one query.
#[derive(Debug, Clone)]
pub struct MatrixSnapshot {
    rows: Arc<[MatrixRow]>,
    columns: usize,
}

impl MatrixSnapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.rows.len() == self.columns
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    /// Row-major flattening, the layout `nalgebra::DMatrix::from_row_slice` expects.
    pub fn to_row_major(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }
}

/// Per-client bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSession {
    /// Once set, the client may not append any further rows
    pub completed: bool,
    /// Set on the first accepted row
    pub active: bool,
    /// Indices of the rows this client contributed, in acceptance order
    pub contributed_rows: Vec<RowIndex>,
}

/// Registry of client sessions, created lazily on first contact.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ClientId, ClientSession>,
    /// Reverse index: row -> contributing client
    row_owners: HashMap<RowIndex, ClientId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session if this is the first time the client is seen.
    pub fn touch(&mut self, client: ClientId) -> &mut ClientSession {
        self.sessions.entry(client).or_default()
    }

    pub fn is_completed(&self, client: ClientId) -> bool {
        self.sessions
            .get(&client)
            .map(|s| s.completed)
            .unwrap_or(false)
    }

    pub fn record_contribution(&mut self, client: ClientId, row_index: RowIndex) {
        let session = self.touch(client);
        session.contributed_rows.push(row_index);
        session.active = true;
        self.row_owners.insert(row_index, client);
    }

    pub fn mark_completed(&mut self, client: ClientId) {
        self.touch(client).completed = true;
    }

    pub fn session(&self, client: ClientId) -> Option<ClientSession> {
        self.sessions.get(&client).cloned()
    }

    pub fn contributor_of(&self, row_index: RowIndex) -> Option<ClientId> {
        self.row_owners.get(&row_index).copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClientId, &ClientSession)> {
        self.sessions.iter()
    }
}

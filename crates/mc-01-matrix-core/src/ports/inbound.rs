//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{ClientSession, MatrixSnapshot};
use crate::domain::errors::{QueryError, SubmissionError};
use crate::domain::value_objects::{ClientId, MatrixShape, QueryKind, QueryOutcome, RowReceipt};

/// Primary Matrix Coordination API
///
/// Every method is one critical section over the whole shared state.
/// Implementations must not suspend while holding it.
pub trait MatrixCoordinationApi: Send + Sync {
    /// Append a row on behalf of `client`.
    ///
    /// Rejected when the client's session is completed or the width does not
    /// match. The row index is always assigned by the service.
    fn submit_row(&self, client: ClientId, values: Vec<f64>) -> Result<RowReceipt, SubmissionError>;

    /// Evaluate a query against a snapshot of the current matrix.
    fn query(&self, client: ClientId, kind: QueryKind) -> Result<QueryOutcome, QueryError> {
        self.query_by_code(client, kind.code())
    }

    /// Evaluate a query given its wire code.
    ///
    /// An empty matrix is reported as `NoDataAvailable` before the code is
    /// checked, so an unknown code only fails with `InvalidQueryType` once
    /// rows exist.
    fn query_by_code(&self, client: ClientId, query_type: i64) -> Result<QueryOutcome, QueryError>;

    /// Close a client's session for further submissions.
    ///
    /// Not reachable from the RPC surface.
    fn mark_completed(&self, client: ClientId);

    /// Copy of the client's session, if the client has been seen.
    fn session(&self, client: ClientId) -> Option<ClientSession>;

    /// Current rows x columns.
    fn shape(&self) -> MatrixShape;

    /// Immutable copy of every stored row.
    fn snapshot(&self) -> MatrixSnapshot;
}

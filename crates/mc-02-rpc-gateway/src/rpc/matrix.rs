//! Matrix JSON-RPC methods.
//!
//! Each call runs one core operation on the blocking pool; the operation
//! holds the matrix lock for its whole duration and rank/determinant can be
//! expensive on large matrices.

use crate::domain::error::{ApiError, ApiResult};
use crate::middleware::GatewayMetrics;
use mc_01_matrix_core::{
    MatrixRequestHandler, MatrixShape, QueryRequest, QueryResponse, SendRowRequest,
    SendRowResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// Matrix RPC methods handler
pub struct MatrixRpc {
    handler: MatrixRequestHandler,
    metrics: Arc<GatewayMetrics>,
}

impl MatrixRpc {
    pub fn new(handler: MatrixRequestHandler, metrics: Arc<GatewayMetrics>) -> Self {
        Self { handler, metrics }
    }

    /// matrix_sendRow - Append one row for a client
    #[instrument(skip(self, request), fields(client = %request.client_id, width = request.values.len()))]
    pub async fn send_row(&self, request: SendRowRequest) -> ApiResult<SendRowResponse> {
        let handler = self.handler.clone();
        let response = tokio::task::spawn_blocking(move || handler.handle_send_row(request))
            .await
            .map_err(|e| ApiError::internal(format!("send row task failed: {}", e)))?;

        self.metrics.record_row(response.success);
        Ok(response)
    }

    /// matrix_query - Row count, rank or determinant
    #[instrument(skip(self, request), fields(client = %request.client_id, query_type = request.query_type))]
    pub async fn query(&self, request: QueryRequest) -> ApiResult<QueryResponse> {
        let handler = self.handler.clone();
        let response = tokio::task::spawn_blocking(move || handler.handle_query(request))
            .await
            .map_err(|e| ApiError::internal(format!("query task failed: {}", e)))?;

        self.metrics.record_query(response.success);
        Ok(response)
    }

    /// Current matrix dimensions
    pub fn shape(&self) -> MatrixShape {
        self.handler.service().shape()
    }
}

//! IPC Handler for the Matrix Core
//!
//! The two entry points the transport calls: row submission and query.
//! Each converts the wire payload, runs one service operation (one critical
//! section) and folds any domain error into a `success = false` response.

use crate::application::service::MatrixCoordinationService;
use crate::config::MatrixConfig;
use crate::domain::value_objects::QueryOutcome;
use crate::ipc::payloads::{QueryRequest, QueryResponse, SendRowRequest, SendRowResponse};
use crate::ports::inbound::MatrixCoordinationApi;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// IPC Handler for the Matrix Core.
///
/// Cheap to clone; all clones drive the same service.
#[derive(Clone)]
pub struct MatrixRequestHandler {
    service: Arc<dyn MatrixCoordinationApi>,
}

impl MatrixRequestHandler {
    /// Create a handler over a fresh service with default config.
    pub fn new() -> Self {
        Self::with_config(MatrixConfig::default())
    }

    /// Create a handler over a fresh service with custom config.
    pub fn with_config(config: MatrixConfig) -> Self {
        Self::from_service(Arc::new(MatrixCoordinationService::with_config(config)))
    }

    /// Wrap an existing service.
    pub fn from_service(service: Arc<dyn MatrixCoordinationApi>) -> Self {
        Self { service }
    }

    /// The service behind this handler.
    pub fn service(&self) -> &Arc<dyn MatrixCoordinationApi> {
        &self.service
    }

    /// Handle a SendRow request.
    ///
    /// `row_index` in the request is ignored.
    pub fn handle_send_row(&self, request: SendRowRequest) -> SendRowResponse {
        let start_time = Instant::now();
        let client = request.client_id;

        if let Some(ignored) = request.row_index {
            debug!(%client, ignored, "[mc-01] Ignoring caller-supplied row index");
        }

        let response = match self.service.submit_row(client, request.values) {
            Ok(receipt) => SendRowResponse {
                success: true,
                message: format!("Row {} received from client {}", receipt.row_index, client),
                rows_received: receipt.total_stored as u64,
                total_stored: receipt.total_stored as u64,
            },
            Err(e) => SendRowResponse::rejected(e.to_string()),
        };

        debug!(
            %client,
            success = response.success,
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "[mc-01] SendRow handled"
        );
        response
    }

    /// Handle a Query request.
    pub fn handle_query(&self, request: QueryRequest) -> QueryResponse {
        let start_time = Instant::now();
        let client = request.client_id;
        let query_type = request.query_type;

        let response = match self.service.query_by_code(client, query_type) {
            Ok(outcome) => Self::outcome_response(outcome),
            Err(e) => QueryResponse::failed(e.to_string()),
        };

        debug!(
            %client,
            query_type,
            success = response.success,
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "[mc-01] Query handled"
        );
        response
    }

    fn outcome_response(outcome: QueryOutcome) -> QueryResponse {
        match outcome {
            QueryOutcome::RowCount(rows) => QueryResponse {
                success: true,
                message: format!("Matrix has {} rows", rows),
                row_count: Some(rows as u64),
                ..Default::default()
            },
            QueryOutcome::Rank(rank) => QueryResponse {
                success: true,
                message: format!("Actual rank: {}", rank),
                rank: Some(rank as u64),
                ..Default::default()
            },
            QueryOutcome::Determinant(det) => QueryResponse {
                success: true,
                message: format!("Actual determinant: {}", det),
                determinant: Some(det),
                ..Default::default()
            },
        }
    }
}

impl Default for MatrixRequestHandler {
    fn default() -> Self {
        Self::new()
    }
}

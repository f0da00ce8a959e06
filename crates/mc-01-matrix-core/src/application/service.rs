//! Matrix Coordination Service
//!
//! Main service implementing MatrixCoordinationApi.
//!
//! All shared state (rows plus client sessions) sits behind one
//! `parking_lot::Mutex`. Each public operation takes the guard once and holds
//! it until it returns, so submissions and queries from any number of clients
//! are fully serialized. The guard is released on every exit path, unwinding
//! included.

use crate::algorithms::query_engine;
use crate::config::MatrixConfig;
use crate::domain::entities::{ClientSession, MatrixSnapshot, MatrixStore, SessionRegistry};
use crate::domain::errors::{QueryError, SubmissionError};
use crate::domain::invariants::check_all_invariants;
use crate::domain::value_objects::{ClientId, MatrixShape, QueryKind, QueryOutcome, RowReceipt};
use crate::ports::inbound::MatrixCoordinationApi;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Everything the gate protects.
#[derive(Debug, Default)]
struct MatrixState {
    store: MatrixStore,
    sessions: SessionRegistry,
}

/// Matrix Coordination Service
///
/// One instance owns one matrix. Share it with `Arc`.
pub struct MatrixCoordinationService {
    state: Mutex<MatrixState>,
    config: MatrixConfig,
}

impl MatrixCoordinationService {
    /// Create a new service with default config
    pub fn new() -> Self {
        Self::with_config(MatrixConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(config: MatrixConfig) -> Self {
        Self {
            state: Mutex::new(MatrixState::default()),
            config,
        }
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    fn log_matrix(state: &MatrixState) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        debug!(shape = %state.store.shape(), "[mc-01] Current matrix");
        for (index, row) in state.store.rows().iter().enumerate() {
            let contributor = state.sessions.contributor_of(index);
            debug!(row = index, client = ?contributor, values = ?row, "[mc-01] Matrix row");
        }
    }
}

impl Default for MatrixCoordinationService {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixCoordinationApi for MatrixCoordinationService {
    fn submit_row(&self, client: ClientId, values: Vec<f64>) -> Result<RowReceipt, SubmissionError> {
        let mut state = self.state.lock();
        state.sessions.touch(client);

        if state.sessions.is_completed(client) {
            warn!(%client, "[mc-01] Rejected row from completed client");
            return Err(SubmissionError::ClientAlreadyCompleted { client });
        }

        debug!(%client, width = values.len(), "[mc-01] Client sending row");

        let row_index = state.store.append_row(values).map_err(|e| {
            warn!(%client, error = %e, "[mc-01] Row rejected");
            e
        })?;
        state.sessions.record_contribution(client, row_index);

        debug_assert!(check_all_invariants(&state.store, &state.sessions));

        let total_stored = state.store.row_count();
        info!(
            %client,
            row_index,
            total_stored,
            "[mc-01] Row stored"
        );

        Ok(RowReceipt {
            row_index,
            total_stored,
        })
    }

    fn query_by_code(&self, client: ClientId, query_type: i64) -> Result<QueryOutcome, QueryError> {
        let mut state = self.state.lock();
        state.sessions.touch(client);

        info!(%client, query_type, "[mc-01] Client requesting query");

        if state.store.row_count() == 0 {
            warn!(%client, query_type, "[mc-01] Query on empty matrix");
            return Err(QueryError::NoDataAvailable);
        }

        let kind = QueryKind::try_from(query_type).map_err(|raw| {
            warn!(%client, query_type = raw, "[mc-01] Invalid query type");
            QueryError::InvalidQueryType(raw)
        })?;

        let snapshot = state.store.snapshot();
        Self::log_matrix(&state);

        match query_engine::evaluate(&snapshot, kind, &self.config) {
            Ok(outcome) => {
                info!(%client, ?outcome, "[mc-01] Query answered");
                Ok(outcome)
            }
            Err(e) => {
                warn!(%client, query = %kind, error = %e, "[mc-01] Query failed");
                Err(e)
            }
        }
    }

    fn mark_completed(&self, client: ClientId) {
        let mut state = self.state.lock();
        state.sessions.mark_completed(client);
        info!(%client, "[mc-01] Client marked as completed");
    }

    fn session(&self, client: ClientId) -> Option<ClientSession> {
        self.state.lock().sessions.session(client)
    }

    fn shape(&self) -> MatrixShape {
        self.state.lock().store.shape()
    }

    fn snapshot(&self) -> MatrixSnapshot {
        self.state.lock().store.snapshot()
    }
}

//! IPC Payloads for the Matrix Core
//!
//! Semantic request/response shapes for the two operations exposed to the
//! transport. Failures travel inside the response (`success = false` plus a
//! message), never as transport errors.

use crate::domain::value_objects::ClientId;
use serde::{Deserialize, Serialize};

// ============================================================
// INCOMING REQUESTS
// ============================================================

/// Request to append one row to the shared matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRowRequest {
    /// Submitting client
    pub client_id: ClientId,
    /// Caller-supplied index. Ignored; the service assigns indices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u64>,
    /// Row values
    pub values: Vec<f64>,
}

impl SendRowRequest {
    pub fn new(client_id: impl Into<ClientId>, values: Vec<f64>) -> Self {
        Self {
            client_id: client_id.into(),
            row_index: None,
            values,
        }
    }
}

/// Request to evaluate an aggregate property of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Requesting client
    pub client_id: ClientId,
    /// 1 = row count, 2 = rank, 3 = determinant
    pub query_type: i64,
}

impl QueryRequest {
    pub fn new(client_id: impl Into<ClientId>, query_type: i64) -> Self {
        Self {
            client_id: client_id.into(),
            query_type,
        }
    }
}

// ============================================================
// OUTGOING RESPONSES
// ============================================================

/// Outcome of a row submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRowResponse {
    /// Whether the row was stored
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Rows stored after this request (0 on failure)
    pub rows_received: u64,
    /// Rows stored after this request (0 on failure)
    pub total_stored: u64,
}

impl SendRowResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            rows_received: 0,
            total_stored: 0,
        }
    }
}

/// Outcome of a query. On success exactly one of the optional values is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Whether a value was computed
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub determinant: Option<f64>,
}

impl QueryResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }
}

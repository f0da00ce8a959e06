use crate::domain::config::LimitsConfig;
use crate::domain::error::ApiError;
use crate::domain::methods::{get_method_info, MatrixMethod};
use crate::middleware::GatewayMetrics;
use crate::rpc::MatrixRpc;
use mc_01_matrix_core::{ClientId, QueryRequest, SendRowRequest};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub matrix: Arc<MatrixRpc>,
    pub metrics: Arc<GatewayMetrics>,
    pub limits: LimitsConfig,
}

/// Route a JSON-RPC method to its handler.
///
/// Params may be positional (`[client_id, values]`) or named
/// (`{"client_id": .., "values": ..}`).
pub async fn route_method(
    state: &AppState,
    method: &str,
    params: Option<&serde_json::Value>,
) -> Result<serde_json::Value, ApiError> {
    let info = get_method_info(method).ok_or_else(|| ApiError::method_not_found(method))?;

    match info.method {
        MatrixMethod::SendRow => {
            let client_id: ClientId = parse_param(params, 0, "client_id")?;
            let values: Vec<f64> = parse_param(params, 1, "values")?;
            let row_index: Option<u64> = parse_param_optional(params, 2, "row_index");
            let request = SendRowRequest {
                client_id,
                row_index,
                values,
            };
            let response = state.matrix.send_row(request).await?;
            to_result(&response)
        }
        MatrixMethod::Query => {
            let client_id: ClientId = parse_param(params, 0, "client_id")?;
            let query_type: i64 = parse_param(params, 1, "query_type")?;
            let response = state
                .matrix
                .query(QueryRequest {
                    client_id,
                    query_type,
                })
                .await?;
            to_result(&response)
        }
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

fn lookup<'a>(
    params: Option<&'a serde_json::Value>,
    index: usize,
    name: &str,
) -> Option<&'a serde_json::Value> {
    params.and_then(|p| match p {
        serde_json::Value::Array(items) => items.get(index),
        serde_json::Value::Object(fields) => fields.get(name),
        _ => None,
    })
}

/// Parse a required parameter by position or by name.
fn parse_param<T: serde::de::DeserializeOwned>(
    params: Option<&serde_json::Value>,
    index: usize,
    name: &str,
) -> Result<T, ApiError> {
    let param = lookup(params, index, name)
        .ok_or_else(|| ApiError::invalid_params(format!("missing parameter '{}'", name)))?;

    serde_json::from_value(param.clone())
        .map_err(|e| ApiError::invalid_params(format!("parameter '{}': {}", name, e)))
}

/// Parse an optional parameter; absent, null or malformed yields `None`.
fn parse_param_optional<T: serde::de::DeserializeOwned>(
    params: Option<&serde_json::Value>,
    index: usize,
    name: &str,
) -> Option<T> {
    lookup(params, index, name)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

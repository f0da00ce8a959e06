//! RPC gateway service - HTTP server exposing the shared matrix.
//!
//! Serves JSON-RPC 2.0 on `POST /`, plus `GET /health` and `GET /metrics`.

use crate::domain::config::GatewayConfig;
use crate::domain::error::{ApiError, GatewayError};
use crate::domain::methods::is_write_method;
use crate::middleware::{GatewayMetrics, RequestTimer, TracingLayer};
use crate::router::{route_method, AppState};
use crate::rpc::MatrixRpc;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use mc_01_matrix_core::MatrixRequestHandler;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info, warn};

/// Longest string request id accepted
const MAX_ID_LEN: usize = 256;

/// RPC gateway service
pub struct RpcGatewayService {
    config: GatewayConfig,
    matrix: Arc<MatrixRpc>,
    metrics: Arc<GatewayMetrics>,
}

impl RpcGatewayService {
    /// Create a gateway over an existing matrix handler
    pub fn new(config: GatewayConfig, handler: MatrixRequestHandler) -> Result<Self, GatewayError> {
        config.validate()?;

        let metrics = Arc::new(GatewayMetrics::new());
        let matrix = Arc::new(MatrixRpc::new(handler, Arc::clone(&metrics)));

        Ok(Self {
            config,
            matrix,
            metrics,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            matrix: Arc::clone(&self.matrix),
            metrics: Arc::clone(&self.metrics),
            limits: self.config.limits.clone(),
        };

        Router::new()
            .route("/", post(handle_json_rpc))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics_snapshot))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_request_size))
            .layer(TracingLayer::new())
            .with_state(state)
    }

    /// Bind the configured listen address
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind {
                addr: addr.to_string(),
                source,
            })
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn start<F>(&self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr: Option<SocketAddr> = listener.local_addr().ok();
        info!(addr = ?local_addr, "[mc-02] RPC gateway listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(GatewayError::Serve)?;

        info!("[mc-02] RPC gateway stopped");
        Ok(())
    }
}

/// `GET /health`
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let shape = state.matrix.shape();
    Json(serde_json::json!({
        "status": "ok",
        "rows": shape.rows,
        "columns": shape.columns,
    }))
}

/// `GET /metrics`
async fn metrics_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}

/// Handle JSON-RPC request
async fn handle_json_rpc(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let request: serde_json::Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "[mc-02] Unparseable request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(error_response(None, ApiError::parse_error(e.to_string()))),
            );
        }
    };

    let response = match request {
        serde_json::Value::Array(requests) => {
            if requests.is_empty() {
                error_response(None, ApiError::invalid_request("empty batch"))
            } else if requests.len() > state.limits.max_batch_size {
                warn!(
                    size = requests.len(),
                    max = state.limits.max_batch_size,
                    "[mc-02] Batch too large"
                );
                state.metrics.record_batch_rejection();
                error_response(
                    None,
                    ApiError::limit_exceeded(
                        format!(
                            "batch size {} > {}",
                            requests.len(),
                            state.limits.max_batch_size
                        ),
                        serde_json::json!({ "max_batch_size": state.limits.max_batch_size }),
                    ),
                )
            } else {
                let mut responses = Vec::with_capacity(requests.len());
                for req in &requests {
                    responses.push(process_single_request(&state, req).await);
                }
                serde_json::Value::Array(responses)
            }
        }
        single => process_single_request(&state, &single).await,
    };

    (StatusCode::OK, Json(response))
}

/// Process a single JSON-RPC request
async fn process_single_request(
    state: &AppState,
    request: &serde_json::Value,
) -> serde_json::Value {
    if !request.is_object() {
        return error_response(None, ApiError::invalid_request("request must be an object"));
    }

    let id = request.get("id").cloned();

    if let Some(ref id_val) = id {
        if let Err(e) = validate_id(id_val) {
            return error_response(None, e);
        }
    }

    let method = match request.get("method").and_then(|m| m.as_str()) {
        Some(method) => method,
        None => {
            return error_response(id, ApiError::invalid_request("missing method"));
        }
    };
    let params = request.get("params");

    let timer = RequestTimer::new(Arc::clone(&state.metrics), is_write_method(method));
    let result = route_method(state, method, params).await;
    timer.finish(result.is_ok());

    match result {
        Ok(value) => serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": value
        }),
        Err(e) => {
            debug!(method, code = e.code, "[mc-02] Call failed");
            error_response(id, e)
        }
    }
}

/// String ids must be non-empty and bounded; ids must be string or number.
fn validate_id(id: &serde_json::Value) -> Result<(), ApiError> {
    if id.is_null() {
        return Err(ApiError::invalid_request(
            "null id (notifications not supported)",
        ));
    }
    if let Some(s) = id.as_str() {
        if s.is_empty() {
            return Err(ApiError::invalid_request("empty string id"));
        }
        if s.len() > MAX_ID_LEN {
            return Err(ApiError::invalid_request(format!(
                "id string too long (max {} chars)",
                MAX_ID_LEN
            )));
        }
    }
    if !id.is_string() && !id.is_number() {
        return Err(ApiError::invalid_request("id must be string or number"));
    }
    Ok(())
}

fn error_response(id: Option<serde_json::Value>, error: ApiError) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": error
    })
}

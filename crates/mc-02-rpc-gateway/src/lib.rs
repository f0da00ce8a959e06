//! MC-02 RPC Gateway - JSON-RPC 2.0 over HTTP for the shared matrix.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    RPC GATEWAY (mc-02)                     │
//! ├───────────────────────────────────────────────────────────┤
//! │   POST /  (JSON-RPC)     GET /health     GET /metrics      │
//! │         │                                                  │
//! │  ┌──────┴──────────────────────────────┐                   │
//! │  │ Middleware: BodyLimit → Tracing     │                   │
//! │  └──────┬──────────────────────────────┘                   │
//! │  ┌──────┴──────────────────────────────┐                   │
//! │  │ Router: matrix_sendRow, matrix_query│                   │
//! │  └──────┬──────────────────────────────┘                   │
//! └─────────┼─────────────────────────────────────────────────┘
//!           ▼
//!   mc-01-matrix-core (MatrixRequestHandler)
//! ```
//!
//! Matrix failures come back as `result.success = false`. JSON-RPC `error`
//! objects are only used for protocol faults.
//!
//! # Usage
//!
//! ```ignore
//! use mc_02_rpc_gateway::{GatewayConfig, RpcGatewayService};
//! use mc_01_matrix_core::MatrixRequestHandler;
//!
//! let service = RpcGatewayService::new(GatewayConfig::default(), MatrixRequestHandler::new())?;
//! service.start(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod router;
pub mod rpc;
pub mod service;

pub use domain::config::{ConfigError, GatewayConfig, HttpConfig, LimitsConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use domain::methods::{get_method_info, is_method_supported, MatrixMethod, MethodInfo};
pub use middleware::GatewayMetrics;
pub use service::RpcGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

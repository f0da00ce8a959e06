//! Middleware for the RPC gateway.
//!
//! Layer order: Request → BodyLimit → Tracing → Handler

pub mod metrics;
pub mod tracing;

pub use metrics::{GatewayMetrics, RequestTimer};
pub use tracing::{TracingLayer, REQUEST_ID_HEADER};

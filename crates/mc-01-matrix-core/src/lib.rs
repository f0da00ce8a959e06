//! # MC-01: Matrix Core Subsystem
//!
//! Shared matrix built up row by row by independent clients, with
//! consistent row-count, rank and determinant queries.
//!
//! ## Architecture
//!
//! - **Domain**: MatrixStore, SessionRegistry, snapshots, errors, invariants
//! - **Algorithms**: Query engine (SVD rank, LU determinant via nalgebra)
//! - **Ports**: Inbound (MatrixCoordinationApi)
//! - **Application**: Service owning the single lock over all shared state
//! - **IPC**: SendRow / Query handlers and payloads used by the transport
//!
//! ## Matrix Lifecycle
//!
//! ```text
//! Empty ──first accepted row (fixes column width)──→ Accumulating
//! ```
//!
//! The matrix only grows. Row indices are dense and never reused.

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use application::service::MatrixCoordinationService;
pub use config::MatrixConfig;
pub use domain::entities::*;
pub use domain::errors::{QueryError, SubmissionError};
pub use domain::value_objects::*;
pub use ipc::{MatrixRequestHandler, QueryRequest, QueryResponse, SendRowRequest, SendRowResponse};
pub use ports::inbound::MatrixCoordinationApi;

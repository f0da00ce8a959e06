//! Application layer: the service that owns the shared state.

pub mod service;

pub use service::MatrixCoordinationService;

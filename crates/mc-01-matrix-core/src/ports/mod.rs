//! Ports module for the Matrix Core
//!
//! Defines the inbound (API) port trait.

pub mod inbound;

pub use inbound::MatrixCoordinationApi;

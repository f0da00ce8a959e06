//! IPC Module for the Matrix Core
//!
//! ## Entry Points
//!
//! - SendRow: append a row on behalf of a client
//! - Query: row count, rank or determinant of the current matrix

pub mod handler;
pub mod payloads;

pub use handler::MatrixRequestHandler;
pub use payloads::*;

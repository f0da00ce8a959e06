//! RPC method handlers for the JSON-RPC API.

pub mod matrix;

pub use matrix::MatrixRpc;

//! # Integration Tests
//!
//! - `flows`: matrix core driven through `MatrixRequestHandler`, including
//!   many concurrent clients
//! - `gateway`: the same operations over JSON-RPC on a real socket

pub mod flows;
pub mod gateway;

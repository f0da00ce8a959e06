//! Algorithms module for the Matrix Core
//!
//! Contains:
//! - Query engine (row count, SVD rank, LU determinant)

pub mod query_engine;

pub use query_engine::{determinant, evaluate, numerical_rank};

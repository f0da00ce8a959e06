//! # Matrix-Coordinator Benchmarks
//!
//! | Group | What it measures |
//! |-------|------------------|
//! | mc-01/submit_row | Append and reject cost per row |
//! | mc-01/query | Row count, rank and determinant on n x n |
//! | mc-01/concurrent_submit | Throughput with contending writers |

use criterion::{criterion_group, criterion_main};
use mc_tests::benchmarks::mc_01_matrix_core::{
    concurrent_submissions, query_latency, submit_row_throughput,
};

criterion_group!(
    matrix_core,
    submit_row_throughput,
    query_latency,
    concurrent_submissions
);
criterion_main!(matrix_core);

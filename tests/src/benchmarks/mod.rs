//! # Matrix-Coordinator Benchmarks
//!
//! Performance benchmarks for the matrix core, called from
//! `benches/matrix_benchmarks.rs`.

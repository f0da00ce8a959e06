//! Configuration for the Matrix Core

use serde::{Deserialize, Serialize};

/// Query engine tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Singular values at or below this count as zero when computing rank.
    /// `None` uses `sigma_max * max(rows, cols) * f64::EPSILON`.
    pub rank_tolerance: Option<f64>,
    /// Iteration cap for the SVD before a rank query is reported as failed
    pub svd_max_iterations: usize,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rank_tolerance: None,
            svd_max_iterations: 1000,
        }
    }
}

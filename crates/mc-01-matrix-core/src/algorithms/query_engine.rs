//! Query engine: row count, numerical rank and determinant of a snapshot.
//!
//! Rank and determinant delegate to nalgebra (SVD and LU respectively).
//! Nothing here knows about thresholds; callers compare the returned value
//! against whatever bound they care about.

use crate::config::MatrixConfig;
use crate::domain::entities::MatrixSnapshot;
use crate::domain::errors::QueryError;
use crate::domain::value_objects::{QueryKind, QueryOutcome};
use nalgebra::DMatrix;

/// Evaluate one query against a snapshot.
pub fn evaluate(
    snapshot: &MatrixSnapshot,
    kind: QueryKind,
    config: &MatrixConfig,
) -> Result<QueryOutcome, QueryError> {
    if snapshot.is_empty() {
        return Err(QueryError::NoDataAvailable);
    }

    match kind {
        QueryKind::RowCount => Ok(QueryOutcome::RowCount(snapshot.row_count())),
        QueryKind::Rank => numerical_rank(snapshot, config).map(QueryOutcome::Rank),
        QueryKind::Determinant => determinant(snapshot).map(QueryOutcome::Determinant),
    }
}

/// Count of singular values above the tolerance.
pub fn numerical_rank(snapshot: &MatrixSnapshot, config: &MatrixConfig) -> Result<usize, QueryError> {
    let (rows, cols) = (snapshot.row_count(), snapshot.column_count());
    if rows == 0 || cols == 0 {
        return Ok(0);
    }

    let matrix = to_dmatrix(snapshot, QueryKind::Rank)?;
    let svd = matrix
        .try_svd(false, false, f64::EPSILON, config.svd_max_iterations)
        .ok_or_else(|| QueryError::ComputationFailed {
            query: QueryKind::Rank,
            reason: format!(
                "SVD did not converge within {} iterations",
                config.svd_max_iterations
            ),
        })?;

    if svd.singular_values.iter().any(|sigma| !sigma.is_finite()) {
        return Err(QueryError::ComputationFailed {
            query: QueryKind::Rank,
            reason: "singular values are not finite (overflow)".to_string(),
        });
    }

    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tolerance = config
        .rank_tolerance
        .unwrap_or_else(|| sigma_max * rows.max(cols) as f64 * f64::EPSILON);

    Ok(svd
        .singular_values
        .iter()
        .filter(|&&sigma| sigma > tolerance)
        .count())
}

/// Determinant via LU decomposition. Square matrices only.
pub fn determinant(snapshot: &MatrixSnapshot) -> Result<f64, QueryError> {
    if !snapshot.is_square() {
        return Err(QueryError::SquareMatrixRequired {
            rows: snapshot.row_count(),
            cols: snapshot.column_count(),
        });
    }

    let matrix = to_dmatrix(snapshot, QueryKind::Determinant)?;
    let det = matrix.determinant();
    if !det.is_finite() {
        return Err(QueryError::ComputationFailed {
            query: QueryKind::Determinant,
            reason: "determinant is not finite (overflow)".to_string(),
        });
    }
    Ok(det)
}

fn to_dmatrix(snapshot: &MatrixSnapshot, query: QueryKind) -> Result<DMatrix<f64>, QueryError> {
    let data = snapshot.to_row_major();

    if let Some(position) = data.iter().position(|v| !v.is_finite()) {
        let cols = snapshot.column_count();
        return Err(QueryError::ComputationFailed {
            query,
            reason: format!(
                "non-finite value at row {}, column {}",
                position / cols,
                position % cols
            ),
        });
    }

    Ok(DMatrix::from_row_slice(
        snapshot.row_count(),
        snapshot.column_count(),
        &data,
    ))
}

//! Small CSR helpers shared by the smoother, multigrid, and Krylov solver.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CsrMatrix;

use crate::{Result, SolverError};

/// Residual `b - A * x`.
pub fn residual(a: &CsrMatrix<f64>, x: &DVector<f64>, b: &DVector<f64>) -> DVector<f64> {
    b - a * x
}

/// Inverted diagonal of `a`; fails on missing or zero diagonal entries.
pub fn inverse_diagonal(a: &CsrMatrix<f64>) -> Result<DVector<f64>> {
    let mut inv = DVector::zeros(a.nrows());
    for (row_idx, row) in a.row_iter().enumerate() {
        let diag = row
            .col_indices()
            .iter()
            .position(|&col| col == row_idx)
            .map(|pos| row.values()[pos])
            .unwrap_or(0.0);
        if diag.abs() < 1e-300 {
            return Err(SolverError::ZeroDiagonal(row_idx));
        }
        inv[row_idx] = 1.0 / diag;
    }
    Ok(inv)
}

/// Densify a CSR matrix (base-level solves only).
pub fn to_dense(a: &CsrMatrix<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(a.nrows(), a.ncols());
    for (row_idx, row) in a.row_iter().enumerate() {
        for (&col, &val) in row.col_indices().iter().zip(row.values().iter()) {
            dense[(row_idx, col)] = val;
        }
    }
    dense
}

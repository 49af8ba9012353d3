//! Grid transfer operators for P1 Lagrange fields.
//!
//! Prolongation interpolates linearly: surviving vertices copy their coarse
//! value, midpoints average their two parents. Restriction is the
//! transpose, which is the natural map for defect vectors.

use nalgebra::DVector;

use crate::{Result, SolverError};

#[derive(Debug, Clone, Copy, Default)]
pub struct StdTransfer;

impl StdTransfer {
    pub fn new() -> Self {
        Self
    }

    /// Interpolate a coarse correction to the next finer level.
    pub fn prolongate(
        &self,
        coarse: &DVector<f64>,
        parents: &[(usize, usize)],
    ) -> Result<DVector<f64>> {
        let nc = coarse.len();
        let mut fine = DVector::zeros(nc + parents.len());
        for i in 0..nc {
            fine[i] = coarse[i];
        }
        for (k, &(a, b)) in parents.iter().enumerate() {
            if a >= nc || b >= nc {
                return Err(SolverError::DimensionMismatch(format!(
                    "midpoint parent ({a}, {b}) outside coarse space of size {nc}"
                )));
            }
            fine[nc + k] = 0.5 * (coarse[a] + coarse[b]);
        }
        Ok(fine)
    }

    /// Restrict a fine defect to the next coarser level (transpose of
    /// prolongation).
    pub fn restrict(
        &self,
        fine: &DVector<f64>,
        parents: &[(usize, usize)],
    ) -> Result<DVector<f64>> {
        if fine.len() < parents.len() {
            return Err(SolverError::DimensionMismatch(format!(
                "fine vector of size {} cannot hold {} midpoints",
                fine.len(),
                parents.len()
            )));
        }
        let nc = fine.len() - parents.len();
        let mut coarse = DVector::zeros(nc);
        for i in 0..nc {
            coarse[i] = fine[i];
        }
        for (k, &(a, b)) in parents.iter().enumerate() {
            let value = 0.5 * fine[nc + k];
            coarse[a] += value;
            coarse[b] += value;
        }
        Ok(coarse)
    }
}

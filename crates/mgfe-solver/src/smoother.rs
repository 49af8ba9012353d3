//! Damped Jacobi smoother.

use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;

use crate::algebra;

/// Damped Jacobi iteration: `x += damping * D^{-1} (b - A x)`.
///
/// The multigrid cycle precomputes `inv_diag` per level and reuses it for
/// every smoothing step.
#[derive(Debug, Clone, Copy)]
pub struct Jacobi {
    damping: f64,
}

impl Jacobi {
    pub fn new(damping: f64) -> Self {
        Self { damping }
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// One smoothing step in place.
    pub fn step(
        &self,
        a: &CsrMatrix<f64>,
        inv_diag: &DVector<f64>,
        x: &mut DVector<f64>,
        b: &DVector<f64>,
    ) {
        let r = algebra::residual(a, x, b);
        for i in 0..x.len() {
            x[i] += self.damping * inv_diag[i] * r[i];
        }
    }
}

impl Default for Jacobi {
    /// Default damping 0.66, the usual choice for tetrahedral stencils.
    fn default() -> Self {
        Self::new(0.66)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_sparse::CooMatrix;

    #[test]
    fn converges_on_diagonally_dominant_system() {
        // [4 -1; -1 4] x = [3; 3] has solution [1; 1].
        let coo = CooMatrix::try_from_triplets(
            2,
            2,
            vec![0, 0, 1, 1],
            vec![0, 1, 0, 1],
            vec![4.0, -1.0, -1.0, 4.0],
        )
        .unwrap();
        let a = CsrMatrix::from(&coo);
        let inv_diag = algebra::inverse_diagonal(&a).unwrap();
        let b = DVector::from_vec(vec![3.0, 3.0]);
        let mut x = DVector::zeros(2);

        let jacobi = Jacobi::new(0.66);
        for _ in 0..100 {
            jacobi.step(&a, &inv_diag, &mut x, &b);
        }
        assert!((x[0] - 1.0).abs() < 1e-8);
        assert!((x[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn exact_solution_is_a_fixed_point() {
        let coo =
            CooMatrix::try_from_triplets(2, 2, vec![0, 1], vec![0, 1], vec![2.0, 5.0]).unwrap();
        let a = CsrMatrix::from(&coo);
        let inv_diag = algebra::inverse_diagonal(&a).unwrap();
        let b = DVector::from_vec(vec![4.0, 10.0]);
        let mut x = DVector::from_vec(vec![2.0, 2.0]);

        Jacobi::default().step(&a, &inv_diag, &mut x, &b);
        assert_eq!(x[0], 2.0);
        assert_eq!(x[1], 2.0);
    }
}

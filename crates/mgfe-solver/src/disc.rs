//! Elliptic element discretization on linear tetrahedra.

use nalgebra::{Matrix3, Vector3};

use crate::{Result, SolverError};

/// Reaction-diffusion discretization of a scalar field on a named element
/// subset: `-div(diffusion * grad u) + reaction * u = source`.
///
/// P1 stiffness uses exact integration of the constant-gradient product;
/// the reaction term uses the consistent tet mass matrix `V/20 (1 + d_ij)`.
#[derive(Debug, Clone)]
pub struct EllipticDisc {
    function: String,
    subset: String,
    diffusion: f64,
    reaction: f64,
    source: f64,
}

impl EllipticDisc {
    pub fn new(function: &str, subset: &str) -> Self {
        Self {
            function: function.to_string(),
            subset: subset.to_string(),
            diffusion: 1.0,
            reaction: 0.0,
            source: 0.0,
        }
    }

    pub fn set_diffusion(&mut self, diffusion: f64) {
        self.diffusion = diffusion;
    }

    pub fn set_reaction(&mut self, reaction: f64) {
        self.reaction = reaction;
    }

    pub fn set_source(&mut self, source: f64) {
        self.source = source;
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn subset(&self) -> &str {
        &self.subset
    }

    /// Element stiffness matrix and load vector for one tetrahedron.
    ///
    /// `elem_index` is only used in error reporting for degenerate cells.
    pub fn element_system(
        &self,
        elem_index: usize,
        coords: &[[f64; 3]; 4],
    ) -> Result<([[f64; 4]; 4], [f64; 4])> {
        let a = Vector3::from_column_slice(&coords[0]);
        let jac = Matrix3::from_columns(&[
            Vector3::from_column_slice(&coords[1]) - a,
            Vector3::from_column_slice(&coords[2]) - a,
            Vector3::from_column_slice(&coords[3]) - a,
        ]);
        let det = jac.determinant();
        let volume = det.abs() / 6.0;
        if volume < 1e-300 {
            return Err(SolverError::DegenerateElement(elem_index));
        }

        // Gradients of the barycentric basis: columns of J^{-T} for
        // vertices 1..3, and their negated sum for vertex 0.
        let inv_t = jac
            .try_inverse()
            .ok_or(SolverError::DegenerateElement(elem_index))?
            .transpose();
        let mut grads = [Vector3::zeros(); 4];
        for i in 0..3 {
            grads[i + 1] = inv_t.column(i).into_owned();
        }
        grads[0] = -(grads[1] + grads[2] + grads[3]);

        let mut k = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                let stiff = self.diffusion * volume * grads[i].dot(&grads[j]);
                let mass_factor = if i == j { 2.0 } else { 1.0 };
                let mass = self.reaction * volume / 20.0 * mass_factor;
                k[i][j] = stiff + mass;
            }
        }

        let load = [self.source * volume / 4.0; 4];
        Ok((k, load))
    }
}

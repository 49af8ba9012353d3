//! Global assembly of the constrained linear system.
//!
//! Element contributions are gathered in COO triplet form and converted to
//! CSR for solving. Dirichlet constraints are eliminated symmetrically:
//! constrained rows become identity rows with the prescribed value on the
//! right-hand side, and constrained columns are lifted into the RHS of the
//! remaining rows.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use rayon::prelude::*;

use crate::dirichlet::DirichletBoundary;
use crate::disc::EllipticDisc;
use crate::space::ApproximationSpace;
use crate::{Result, SolverError};

/// Spatial discretization of the whole domain: element discretizations on
/// their subsets plus Dirichlet constraints.
pub struct DomainDiscretization<'a> {
    space: &'a ApproximationSpace,
    elem_discs: Vec<EllipticDisc>,
    constraints: Vec<DirichletBoundary>,
}

impl<'a> DomainDiscretization<'a> {
    pub fn new(space: &'a ApproximationSpace) -> Self {
        Self {
            space,
            elem_discs: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn add(&mut self, disc: EllipticDisc) {
        self.elem_discs.push(disc);
    }

    pub fn add_constraint(&mut self, constraint: DirichletBoundary) {
        self.constraints.push(constraint);
    }

    pub fn space(&self) -> &ApproximationSpace {
        self.space
    }

    /// Merged prescribed values on `level`; later constraints override.
    pub fn dirichlet_values(&self, level: usize) -> Result<Vec<Option<f64>>> {
        let grid = self.space.grid(level);
        let mut merged = vec![None; grid.num_vertices()];
        for constraint in &self.constraints {
            for (v, value) in constraint.prescribed_values(grid)?.into_iter().enumerate() {
                if value.is_some() {
                    merged[v] = value;
                }
            }
        }
        Ok(merged)
    }

    /// Constrained-DOF mask on `level`.
    pub fn dirichlet_mask(&self, level: usize) -> Result<Vec<bool>> {
        Ok(self
            .dirichlet_values(level)?
            .into_iter()
            .map(|v| v.is_some())
            .collect())
    }

    /// Write prescribed boundary values into the solution vector.
    pub fn adjust_solution(&self, u: &mut DVector<f64>, level: usize) -> Result<()> {
        let grid = self.space.grid(level);
        for constraint in &self.constraints {
            constraint.adjust_solution(u, grid)?;
        }
        Ok(())
    }

    /// Assemble stiffness and RHS on `level` with prescribed values.
    pub fn assemble_linear(&self, level: usize) -> Result<(CsrMatrix<f64>, DVector<f64>)> {
        let values = self.dirichlet_values(level)?;
        self.assemble_with_values(level, &values)
    }

    /// Assemble the level operator with homogeneous Dirichlet rows, as
    /// needed for multigrid correction equations on coarse levels.
    pub fn assemble_level_matrix(&self, level: usize) -> Result<CsrMatrix<f64>> {
        let values: Vec<Option<f64>> = self
            .dirichlet_values(level)?
            .into_iter()
            .map(|v| v.map(|_| 0.0))
            .collect();
        Ok(self.assemble_with_values(level, &values)?.0)
    }

    fn assemble_with_values(
        &self,
        level: usize,
        dirichlet: &[Option<f64>],
    ) -> Result<(CsrMatrix<f64>, DVector<f64>)> {
        if self.elem_discs.is_empty() {
            return Err(SolverError::NotInitialized("domain discretization"));
        }
        let function = self.space.function()?;
        let grid = self.space.grid(level);
        let n = grid.num_vertices();

        let mut raw_rows = Vec::new();
        let mut raw_cols = Vec::new();
        let mut raw_vals = Vec::new();
        let mut rhs = DVector::zeros(n);

        for disc in &self.elem_discs {
            if disc.function() != function.name {
                return Err(SolverError::Assembly(format!(
                    "element discretization acts on unknown function {}",
                    disc.function()
                )));
            }
            let members = grid.element_set(disc.subset())?;

            let contributions = members
                .par_iter()
                .map(|&t| {
                    let tet = grid.tets[t];
                    let coords = [
                        grid.vertices[tet[0]],
                        grid.vertices[tet[1]],
                        grid.vertices[tet[2]],
                        grid.vertices[tet[3]],
                    ];
                    disc.element_system(t, &coords).map(|(k, load)| (tet, k, load))
                })
                .collect::<Result<Vec<_>>>()?;

            for (tet, k, load) in contributions {
                for i in 0..4 {
                    rhs[tet[i]] += load[i];
                    for j in 0..4 {
                        raw_rows.push(tet[i]);
                        raw_cols.push(tet[j]);
                        raw_vals.push(k[i][j]);
                    }
                }
            }
        }

        // Symmetric elimination of constrained DOFs.
        let mut rows = Vec::with_capacity(raw_rows.len());
        let mut cols = Vec::with_capacity(raw_cols.len());
        let mut vals = Vec::with_capacity(raw_vals.len());
        for ((&i, &j), &v) in raw_rows.iter().zip(&raw_cols).zip(&raw_vals) {
            if dirichlet[i].is_some() {
                continue;
            }
            if let Some(g) = dirichlet[j] {
                rhs[i] -= v * g;
            } else {
                rows.push(i);
                cols.push(j);
                vals.push(v);
            }
        }
        for (i, value) in dirichlet.iter().enumerate() {
            if let Some(g) = value {
                rows.push(i);
                cols.push(i);
                vals.push(1.0);
                rhs[i] = *g;
            }
        }

        let coo = CooMatrix::try_from_triplets(n, n, rows, cols, vals)
            .map_err(|e| SolverError::Assembly(format!("invalid triplets: {e:?}")))?;
        Ok((CsrMatrix::from(&coo), rhs))
    }
}

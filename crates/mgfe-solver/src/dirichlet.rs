//! Dirichlet boundary constraints on named vertex sets.

use mgfe_grid::Grid;
use nalgebra::DVector;

use crate::{Result, SolverError};

#[derive(Debug, Clone, PartialEq)]
pub struct DirichletEntry {
    pub value: f64,
    pub function: String,
    pub subset: String,
}

/// Collection of prescribed-value constraints.
///
/// Entries are applied in insertion order; if a vertex appears in several
/// subsets the last entry wins.
#[derive(Debug, Clone, Default)]
pub struct DirichletBoundary {
    entries: Vec<DirichletEntry>,
}

impl DirichletBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `function` to `value` on the vertex set `subset`.
    pub fn add(&mut self, value: f64, function: &str, subset: &str) {
        self.entries.push(DirichletEntry {
            value,
            function: function.to_string(),
            subset: subset.to_string(),
        });
    }

    pub fn entries(&self) -> &[DirichletEntry] {
        &self.entries
    }

    /// Prescribed value per vertex on `grid`, `None` where unconstrained.
    pub fn prescribed_values(&self, grid: &Grid) -> Result<Vec<Option<f64>>> {
        let mut values = vec![None; grid.num_vertices()];
        for entry in &self.entries {
            for &v in grid.vertex_set(&entry.subset)? {
                values[v] = Some(entry.value);
            }
        }
        Ok(values)
    }

    /// Write prescribed values into a solution vector.
    pub fn adjust_solution(&self, u: &mut DVector<f64>, grid: &Grid) -> Result<()> {
        if u.len() != grid.num_vertices() {
            return Err(SolverError::DimensionMismatch(format!(
                "solution has {} entries, grid has {} vertices",
                u.len(),
                grid.num_vertices()
            )));
        }
        for (v, value) in self.prescribed_values(grid)?.into_iter().enumerate() {
            if let Some(g) = value {
                u[v] = g;
            }
        }
        Ok(())
    }
}

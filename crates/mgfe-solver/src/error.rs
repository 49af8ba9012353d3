//! Error types for mgfe-solver

use mgfe_grid::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("{0} used before initialization")]
    NotInitialized(&'static str),

    #[error("unsupported function space: {0}")]
    UnsupportedSpace(String),

    #[error("degenerate element {0} (zero volume)")]
    DegenerateElement(usize),

    #[error("zero diagonal entry at DOF {0}")]
    ZeroDiagonal(usize),

    #[error("singular matrix in base solver")]
    SingularBase,

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("numerical breakdown in {0}")]
    Breakdown(&'static str),

    #[error("no convergence after {steps} iterations (defect {defect:.3e})")]
    NotConverged { steps: usize, defect: f64 },

    #[error("assembly error: {0}")]
    Assembly(String),
}

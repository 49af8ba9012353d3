use std::path::PathBuf;

use thiserror::Error;

use crate::compare::CompareError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("testcase '{0}' does not implement run()")]
    RunNotImplemented(String),

    #[error("no solution stored, run() has not completed")]
    NoSolution,

    #[error(transparent)]
    Grid(#[from] mgfe_grid::GridError),

    #[error(transparent)]
    Solver(#[from] mgfe_solver::SolverError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error("reference file {}, line {line}: {message}", path.display())]
    Reference {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report")]
    Report(#[from] serde_json::Error),

    #[error("thread pool setup failed: {0}")]
    ThreadPool(String),
}

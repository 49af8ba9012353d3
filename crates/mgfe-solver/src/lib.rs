//! Multigrid-preconditioned finite-element solver components.
//!
//! The pipeline mirrors the usual FE solve: an [`ApproximationSpace`] maps
//! grid vertices to scalar P1 degrees of freedom, a [`DomainDiscretization`]
//! assembles the elliptic operator with Dirichlet constraints eliminated,
//! and [`BiCgStab`] solves the system, optionally preconditioned by a
//! [`GeometricMultigrid`] cycle over the refinement hierarchy.

pub mod algebra;
pub mod assembly;
pub mod bicgstab;
pub mod conv_check;
pub mod dirichlet;
pub mod disc;
pub mod error;
pub mod gmg;
pub mod smoother;
pub mod space;
pub mod transfer;

pub use assembly::DomainDiscretization;
pub use bicgstab::{BiCgStab, Preconditioner, SolveInfo};
pub use conv_check::ConvCheck;
pub use dirichlet::DirichletBoundary;
pub use disc::EllipticDisc;
pub use error::SolverError;
pub use gmg::{BaseSolver, CycleType, DenseLuSolver, GeometricMultigrid};
pub use smoother::Jacobi;
pub use space::ApproximationSpace;
pub use transfer::StdTransfer;

pub type Result<T> = std::result::Result<T, SolverError>;

//! Laplace regression problem: unit box, linear Dirichlet data, four
//! uniform refinements, geometric multigrid inside BiCGStab.

use std::path::{Path, PathBuf};

use log::info;
use nalgebra::DVector;

use mgfe_grid::{Grid, GridHierarchy};
use mgfe_solver::{
    ApproximationSpace, BiCgStab, ConvCheck, CycleType, DenseLuSolver, DirichletBoundary,
    DomainDiscretization, EllipticDisc, GeometricMultigrid, Jacobi, SolveInfo, StdTransfer,
};

use crate::testcase::Testcase;
use crate::{HarnessError, Result};

const NUM_REFINEMENTS: usize = 4;

pub struct LaplaceTestcase {
    grid_path: PathBuf,
    reference_path: PathBuf,
    num_refs: usize,
    solution: Option<Vec<f64>>,
    info: Option<SolveInfo>,
}

impl LaplaceTestcase {
    pub fn new(grid_path: impl Into<PathBuf>, reference_path: impl Into<PathBuf>) -> Self {
        Self {
            grid_path: grid_path.into(),
            reference_path: reference_path.into(),
            num_refs: NUM_REFINEMENTS,
            solution: None,
            info: None,
        }
    }

    /// Override the refinement depth, mainly for quick checks.
    pub fn set_num_refinements(&mut self, num_refs: usize) {
        self.num_refs = num_refs;
    }

    pub fn solve_info(&self) -> Option<&SolveInfo> {
        self.info.as_ref()
    }
}

impl Testcase for LaplaceTestcase {
    fn name(&self) -> &str {
        "laplace"
    }

    fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    fn run(&mut self) -> Result<()> {
        let grid = Grid::load(&self.grid_path)?;
        let mut hierarchy = GridHierarchy::new(grid);
        hierarchy.refine(self.num_refs);
        let mut space = ApproximationSpace::new(hierarchy);
        space.add("c", "Lagrange", 1)?;

        let mut elem = EllipticDisc::new("c", "Inner");
        elem.set_diffusion(1.0);
        elem.set_reaction(0.0);

        let mut boundary = DirichletBoundary::new();
        boundary.add(-1.0, "c", "bndNegative");
        boundary.add(1.0, "c", "bndPositive");

        let mut disc = DomainDiscretization::new(&space);
        disc.add(elem);
        disc.add_constraint(boundary);

        let level = space.top_level();
        info!(
            "laplace: level {level}, {} unknowns",
            space.num_dofs(level)
        );
        let (a, b) = disc.assemble_linear(level)?;

        let mut gmg = GeometricMultigrid::new();
        gmg.set_smoother(Jacobi::new(0.66));
        gmg.set_base_solver(Box::new(DenseLuSolver::new()));
        gmg.set_base_level(0);
        gmg.set_cycle_type(CycleType::V);
        gmg.set_num_presmooth(3);
        gmg.set_num_postsmooth(3);
        gmg.set_transfer(StdTransfer::new());
        gmg.init(&disc)?;

        let mut solver = BiCgStab::new();
        solver.set_preconditioner(Box::new(gmg));
        solver.set_convergence_check(ConvCheck::new(100, 1e-12, 1e-10, true));
        solver.init(a)?;

        let mut u = DVector::zeros(b.len());
        disc.adjust_solution(&mut u, level)?;
        let solve_info = solver.apply(&mut u, &b)?;
        info!(
            "laplace: {} converged after {} steps, defect {:.3e}",
            solve_info.solver_name, solve_info.iterations, solve_info.residual_norm
        );

        self.solution = Some(u.iter().copied().collect());
        self.info = Some(solve_info);
        Ok(())
    }

    fn solution(&self) -> Result<&[f64]> {
        self.solution
            .as_deref()
            .ok_or(HarnessError::NoSolution)
    }
}

//! Geometric multigrid preconditioner over the refinement hierarchy.

use std::str::FromStr;

use nalgebra::{DVector, Dyn, linalg::LU};
use nalgebra_sparse::CsrMatrix;

use crate::algebra;
use crate::assembly::DomainDiscretization;
use crate::bicgstab::Preconditioner;
use crate::smoother::Jacobi;
use crate::transfer::StdTransfer;
use crate::{Result, SolverError};

/// Solver for the coarsest multigrid level.
pub trait BaseSolver {
    fn init(&mut self, a: &CsrMatrix<f64>) -> Result<()>;
    fn apply(&self, b: &DVector<f64>) -> Result<DVector<f64>>;
}

/// Dense LU factorization; the base level is small enough to densify.
#[derive(Default)]
pub struct DenseLuSolver {
    lu: Option<LU<f64, Dyn, Dyn>>,
}

impl DenseLuSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BaseSolver for DenseLuSolver {
    fn init(&mut self, a: &CsrMatrix<f64>) -> Result<()> {
        let lu = algebra::to_dense(a).lu();
        if !lu.is_invertible() {
            return Err(SolverError::SingularBase);
        }
        self.lu = Some(lu);
        Ok(())
    }

    fn apply(&self, b: &DVector<f64>) -> Result<DVector<f64>> {
        let lu = self
            .lu
            .as_ref()
            .ok_or(SolverError::NotInitialized("base solver"))?;
        lu.solve(b).ok_or(SolverError::SingularBase)
    }
}

/// Multigrid cycle shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleType {
    V,
    W,
}

impl FromStr for CycleType {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "V" => Ok(CycleType::V),
            "W" => Ok(CycleType::W),
            other => Err(SolverError::Assembly(format!(
                "unknown cycle type: {other}"
            ))),
        }
    }
}

struct LevelData {
    matrix: CsrMatrix<f64>,
    inv_diag: DVector<f64>,
    dirichlet: Vec<bool>,
}

/// Geometric multigrid: smoothing on every level of the hierarchy, exact
/// solve on the base level, linear interpolation in between.
///
/// `init` assembles the level operators with homogeneous Dirichlet rows;
/// `apply` then runs one cycle on a defect and returns the correction.
pub struct GeometricMultigrid {
    smoother: Jacobi,
    transfer: StdTransfer,
    base_solver: Box<dyn BaseSolver>,
    base_level: usize,
    cycle_type: CycleType,
    num_presmooth: usize,
    num_postsmooth: usize,
    levels: Vec<LevelData>,
    parents: Vec<Vec<(usize, usize)>>,
}

impl GeometricMultigrid {
    pub fn new() -> Self {
        Self {
            smoother: Jacobi::default(),
            transfer: StdTransfer::new(),
            base_solver: Box::new(DenseLuSolver::new()),
            base_level: 0,
            cycle_type: CycleType::V,
            num_presmooth: 2,
            num_postsmooth: 2,
            levels: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn set_smoother(&mut self, smoother: Jacobi) {
        self.smoother = smoother;
    }

    pub fn set_transfer(&mut self, transfer: StdTransfer) {
        self.transfer = transfer;
    }

    pub fn set_base_solver(&mut self, base_solver: Box<dyn BaseSolver>) {
        self.base_solver = base_solver;
    }

    pub fn set_base_level(&mut self, base_level: usize) {
        self.base_level = base_level;
    }

    pub fn set_cycle_type(&mut self, cycle_type: CycleType) {
        self.cycle_type = cycle_type;
    }

    pub fn set_num_presmooth(&mut self, steps: usize) {
        self.num_presmooth = steps;
    }

    pub fn set_num_postsmooth(&mut self, steps: usize) {
        self.num_postsmooth = steps;
    }

    /// Assemble all level operators and factorize the base level.
    pub fn init(&mut self, disc: &DomainDiscretization<'_>) -> Result<()> {
        let space = disc.space();
        let top = space.top_level();
        if self.base_level > top {
            return Err(SolverError::DimensionMismatch(format!(
                "base level {} above top level {top}",
                self.base_level
            )));
        }

        self.levels.clear();
        self.parents.clear();
        for level in self.base_level..=top {
            let matrix = disc.assemble_level_matrix(level)?;
            let inv_diag = algebra::inverse_diagonal(&matrix)?;
            let dirichlet = disc.dirichlet_mask(level)?;
            self.levels.push(LevelData {
                matrix,
                inv_diag,
                dirichlet,
            });
        }
        for level in self.base_level..top {
            self.parents.push(space.hierarchy().parents(level).to_vec());
        }
        self.base_solver.init(&self.levels[0].matrix)?;
        Ok(())
    }

    fn cycle(&self, k: usize, defect: &DVector<f64>) -> Result<DVector<f64>> {
        if k == 0 {
            return self.base_solver.apply(defect);
        }

        let data = &self.levels[k];
        let mut x = DVector::zeros(defect.len());
        for _ in 0..self.num_presmooth {
            self.smoother
                .step(&data.matrix, &data.inv_diag, &mut x, defect);
        }

        let r = algebra::residual(&data.matrix, &x, defect);
        let parents = &self.parents[k - 1];
        let mut rc = self.transfer.restrict(&r, parents)?;
        for (i, &constrained) in self.levels[k - 1].dirichlet.iter().enumerate() {
            if constrained {
                rc[i] = 0.0;
            }
        }

        let mut cc = self.cycle(k - 1, &rc)?;
        if self.cycle_type == CycleType::W && k > 1 {
            let coarse = &self.levels[k - 1];
            let rc2 = algebra::residual(&coarse.matrix, &cc, &rc);
            cc += self.cycle(k - 1, &rc2)?;
        }

        x += self.transfer.prolongate(&cc, parents)?;
        for _ in 0..self.num_postsmooth {
            self.smoother
                .step(&data.matrix, &data.inv_diag, &mut x, defect);
        }
        Ok(x)
    }
}

impl Default for GeometricMultigrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Preconditioner for GeometricMultigrid {
    fn apply(&self, defect: &DVector<f64>) -> Result<DVector<f64>> {
        if self.levels.is_empty() {
            return Err(SolverError::NotInitialized("geometric multigrid"));
        }
        let top = self.levels.len() - 1;
        if defect.len() != self.levels[top].matrix.nrows() {
            return Err(SolverError::DimensionMismatch(format!(
                "defect has {} entries, top level has {}",
                defect.len(),
                self.levels[top].matrix.nrows()
            )));
        }
        self.cycle(top, defect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirichlet::DirichletBoundary;
    use crate::disc::EllipticDisc;
    use crate::space::ApproximationSpace;
    use mgfe_grid::{Deck, Grid, GridHierarchy};

    fn unit_cube() -> Grid {
        let src = r#"
*NODE
1, 0.0, 0.0, 0.0
2, 1.0, 0.0, 0.0
3, 0.0, 1.0, 0.0
4, 1.0, 1.0, 0.0
5, 0.0, 0.0, 1.0
6, 1.0, 0.0, 1.0
7, 0.0, 1.0, 1.0
8, 1.0, 1.0, 1.0
*ELEMENT, TYPE=TET4, ELSET=Inner
1, 1, 2, 4, 8
2, 1, 2, 6, 8
3, 1, 3, 4, 8
4, 1, 3, 7, 8
5, 1, 5, 6, 8
6, 1, 5, 7, 8
*NSET, NSET=bndNegative
1, 3, 5, 7
*NSET, NSET=bndPositive
2, 4, 6, 8
"#;
        Grid::from_deck(&Deck::parse_str(src).unwrap()).unwrap()
    }

    fn laplace_space(num_refs: usize) -> ApproximationSpace {
        let mut hierarchy = GridHierarchy::new(unit_cube());
        hierarchy.refine(num_refs);
        let mut space = ApproximationSpace::new(hierarchy);
        space.add("c", "Lagrange", 1).unwrap();
        space
    }

    fn laplace_disc(space: &ApproximationSpace) -> DomainDiscretization<'_> {
        let mut elem = EllipticDisc::new("c", "Inner");
        elem.set_diffusion(1.0);
        let mut boundary = DirichletBoundary::new();
        boundary.add(-1.0, "c", "bndNegative");
        boundary.add(1.0, "c", "bndPositive");

        let mut disc = DomainDiscretization::new(space);
        disc.add(elem);
        disc.add_constraint(boundary);
        disc
    }

    #[test]
    fn cycle_type_parses_from_string() {
        assert_eq!("V".parse::<CycleType>().unwrap(), CycleType::V);
        assert_eq!("w".parse::<CycleType>().unwrap(), CycleType::W);
        assert!("F".parse::<CycleType>().is_err());
    }

    #[test]
    fn uninitialized_apply_is_an_error() {
        let gmg = GeometricMultigrid::new();
        let d = DVector::zeros(4);
        assert!(matches!(
            gmg.apply(&d),
            Err(SolverError::NotInitialized(_))
        ));
    }

    #[test]
    fn stationary_iteration_converges_on_two_levels() {
        let space = laplace_space(2);
        let disc = laplace_disc(&space);
        let level = space.top_level();
        let (a, b) = disc.assemble_linear(level).unwrap();

        let mut gmg = GeometricMultigrid::new();
        gmg.set_smoother(Jacobi::new(0.66));
        gmg.set_num_presmooth(3);
        gmg.set_num_postsmooth(3);
        gmg.init(&disc).unwrap();

        // x_{k+1} = x_k + M(b - A x_k) as a stationary iteration.
        let mut x = DVector::zeros(b.len());
        disc.adjust_solution(&mut x, level).unwrap();
        for _ in 0..25 {
            let r = algebra::residual(&a, &x, &b);
            x += gmg.apply(&r).unwrap();
        }

        let grid = space.grid(level);
        for (v, coords) in grid.vertices.iter().enumerate() {
            let expected = 2.0 * coords[0] - 1.0;
            assert!(
                (x[v] - expected).abs() < 1e-8,
                "vertex {v}: got {} expected {expected}",
                x[v]
            );
        }
    }

    #[test]
    fn w_cycle_also_converges() {
        let space = laplace_space(2);
        let disc = laplace_disc(&space);
        let level = space.top_level();
        let (a, b) = disc.assemble_linear(level).unwrap();

        let mut gmg = GeometricMultigrid::new();
        gmg.set_cycle_type(CycleType::W);
        gmg.set_smoother(Jacobi::new(0.66));
        gmg.set_num_presmooth(3);
        gmg.set_num_postsmooth(3);
        gmg.init(&disc).unwrap();

        let mut x = DVector::zeros(b.len());
        disc.adjust_solution(&mut x, level).unwrap();
        let r0 = algebra::residual(&a, &x, &b).norm();
        for _ in 0..25 {
            let r = algebra::residual(&a, &x, &b);
            x += gmg.apply(&r).unwrap();
        }
        let r1 = algebra::residual(&a, &x, &b).norm();
        assert!(r1 < 1e-8 * r0.max(1.0), "defect only dropped to {r1}");
    }

    #[test]
    fn base_solver_alone_solves_base_level() {
        let space = laplace_space(0);
        let disc = laplace_disc(&space);
        let (a, b) = disc.assemble_linear(0).unwrap();

        let mut base = DenseLuSolver::new();
        base.init(&a).unwrap();
        let x = base.apply(&b).unwrap();

        let r = algebra::residual(&a, &x, &b).norm();
        assert!(r < 1e-12);
    }
}

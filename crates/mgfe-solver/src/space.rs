//! Scalar Lagrange approximation space over a grid hierarchy.

use mgfe_grid::{Grid, GridHierarchy};

use crate::{Result, SolverError};

/// Declared scalar field: one P1 Lagrange DOF per grid vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub order: usize,
}

/// Maps grid entities to degrees of freedom.
///
/// Owns the refinement hierarchy; built once and treated as immutable by
/// the rest of the pipeline. DOF numbering on every level is the vertex
/// numbering of that level's grid.
#[derive(Debug, Clone)]
pub struct ApproximationSpace {
    hierarchy: GridHierarchy,
    function: Option<FunctionDecl>,
}

impl ApproximationSpace {
    pub fn new(hierarchy: GridHierarchy) -> Self {
        Self {
            hierarchy,
            function: None,
        }
    }

    /// Declare the scalar field. Only Lagrange order 1 is supported.
    pub fn add(&mut self, name: &str, space: &str, order: usize) -> Result<()> {
        if !space.eq_ignore_ascii_case("Lagrange") || order != 1 {
            return Err(SolverError::UnsupportedSpace(format!(
                "{space} order {order}"
            )));
        }
        self.function = Some(FunctionDecl {
            name: name.to_string(),
            order,
        });
        Ok(())
    }

    pub fn function(&self) -> Result<&FunctionDecl> {
        self.function
            .as_ref()
            .ok_or(SolverError::NotInitialized("approximation space"))
    }

    pub fn hierarchy(&self) -> &GridHierarchy {
        &self.hierarchy
    }

    pub fn grid(&self, level: usize) -> &Grid {
        self.hierarchy.level(level)
    }

    pub fn top_level(&self) -> usize {
        self.hierarchy.top_level()
    }

    /// Number of DOFs on a level (P1: one per vertex).
    pub fn num_dofs(&self, level: usize) -> usize {
        self.hierarchy.level(level).num_vertices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgfe_grid::Deck;

    fn single_tet_space() -> ApproximationSpace {
        let src = "*NODE\n1,0,0,0\n2,1,0,0\n3,0,1,0\n4,0,0,1\n\
                   *ELEMENT, TYPE=TET4, ELSET=Inner\n1,1,2,3,4\n";
        let grid = Grid::from_deck(&Deck::parse_str(src).unwrap()).unwrap();
        ApproximationSpace::new(GridHierarchy::new(grid))
    }

    #[test]
    fn declares_p1_field() {
        let mut space = single_tet_space();
        space.add("c", "Lagrange", 1).unwrap();
        assert_eq!(space.function().unwrap().name, "c");
        assert_eq!(space.num_dofs(0), 4);
    }

    #[test]
    fn rejects_higher_order() {
        let mut space = single_tet_space();
        let err = space.add("c", "Lagrange", 2).expect_err("should fail");
        assert!(matches!(err, SolverError::UnsupportedSpace(_)));
    }

    #[test]
    fn undeclared_function_is_an_error() {
        let space = single_tet_space();
        assert!(matches!(
            space.function(),
            Err(SolverError::NotInitialized(_))
        ));
    }
}

//! Global uniform refinement and the multigrid level hierarchy.
//!
//! Refinement follows Bey's regular rule: each tetrahedron is split into
//! four corner children plus four children of the inner octahedron, cut
//! along the (m02, m13) diagonal. New vertices are the edge midpoints,
//! appended in sorted edge order so the numbering is reproducible. The
//! parent pair of every midpoint is recorded; the solver builds its
//! transfer operators from that record.

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::Grid;

/// Local vertex pairs of a tetrahedron's six edges.
const TET_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Refine every tetrahedron once.
///
/// Returns the refined grid and the parent vertex pair of each newly
/// created midpoint, in creation order. Vertices of the input grid keep
/// their indices; midpoints are appended after them.
pub fn refine_once(grid: &Grid) -> (Grid, Vec<(usize, usize)>) {
    let mut edges = BTreeSet::<(usize, usize)>::new();
    for tet in &grid.tets {
        for &(a, b) in &TET_EDGES {
            let (lo, hi) = ordered(tet[a], tet[b]);
            edges.insert((lo, hi));
        }
    }

    let mut vertices = grid.vertices.clone();
    let mut parents = Vec::with_capacity(edges.len());
    let mut midpoint = BTreeMap::<(usize, usize), usize>::new();
    for &(a, b) in &edges {
        let pa = grid.vertices[a];
        let pb = grid.vertices[b];
        midpoint.insert((a, b), vertices.len());
        vertices.push([
            0.5 * (pa[0] + pb[0]),
            0.5 * (pa[1] + pb[1]),
            0.5 * (pa[2] + pb[2]),
        ]);
        parents.push((a, b));
    }

    let mid = |a: usize, b: usize| -> usize {
        let (lo, hi) = ordered(a, b);
        midpoint[&(lo, hi)]
    };

    let mut tets = Vec::with_capacity(grid.tets.len() * 8);
    for &[v0, v1, v2, v3] in &grid.tets {
        let m01 = mid(v0, v1);
        let m02 = mid(v0, v2);
        let m03 = mid(v0, v3);
        let m12 = mid(v1, v2);
        let m13 = mid(v1, v3);
        let m23 = mid(v2, v3);

        // Corner children.
        tets.push([v0, m01, m02, m03]);
        tets.push([m01, v1, m12, m13]);
        tets.push([m02, m12, v2, m23]);
        tets.push([m03, m13, m23, v3]);
        // Octahedron children along the (m02, m13) diagonal.
        tets.push([m01, m02, m03, m13]);
        tets.push([m01, m02, m12, m13]);
        tets.push([m02, m03, m13, m23]);
        tets.push([m02, m12, m13, m23]);
    }

    // A midpoint joins a vertex set when both edge endpoints belong to it.
    let mut vertex_sets = BTreeMap::new();
    for (name, members) in &grid.vertex_sets {
        let mut mask = vec![false; grid.vertices.len()];
        for &v in members {
            mask[v] = true;
        }
        let mut refined = members.clone();
        for &(a, b) in &edges {
            if mask[a] && mask[b] {
                refined.push(midpoint[&(a, b)]);
            }
        }
        vertex_sets.insert(name.clone(), refined);
    }

    // Children inherit the element set of their parent; child indices of
    // parent t are 8*t .. 8*t+8 by construction.
    let mut element_sets = BTreeMap::new();
    for (name, members) in &grid.element_sets {
        let refined = members
            .iter()
            .flat_map(|&t| (8 * t)..(8 * t + 8))
            .collect();
        element_sets.insert(name.clone(), refined);
    }

    let refined = Grid {
        vertices,
        tets,
        vertex_sets,
        element_sets,
    };
    (refined, parents)
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// A stack of uniformly refined grid levels.
///
/// Level 0 is the coarse input grid; `refine` appends levels. The parent
/// record between consecutive levels drives prolongation and restriction.
#[derive(Debug, Clone)]
pub struct GridHierarchy {
    levels: Vec<Grid>,
    parents: Vec<Vec<(usize, usize)>>,
}

impl GridHierarchy {
    pub fn new(base: Grid) -> Self {
        Self {
            levels: vec![base],
            parents: Vec::new(),
        }
    }

    /// Refine the finest level `num_refs` times, appending one level each.
    pub fn refine(&mut self, num_refs: usize) {
        for _ in 0..num_refs {
            let (next, parents) = refine_once(self.top());
            self.levels.push(next);
            self.parents.push(parents);
        }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn top_level(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn level(&self, level: usize) -> &Grid {
        &self.levels[level]
    }

    /// Finest grid.
    pub fn top(&self) -> &Grid {
        self.levels.last().expect("hierarchy has at least one level")
    }

    /// Midpoint parent pairs between `level` and `level + 1`.
    pub fn parents(&self, level: usize) -> &[(usize, usize)] {
        &self.parents[level]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;

    fn unit_cube() -> Grid {
        // Kuhn triangulation: six tets sharing the (0,0,0)-(1,1,1) diagonal.
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
        let deck = Deck::parse_str(src).unwrap();
        Grid::from_deck(&deck).unwrap()
    }

    fn tet_volume(grid: &Grid, tet: &[usize; 4]) -> f64 {
        let p = |i: usize| grid.vertices[tet[i]];
        let (a, b, c, d) = (p(0), p(1), p(2), p(3));
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let w = [d[0] - a[0], d[1] - a[1], d[2] - a[2]];
        let det = u[0] * (v[1] * w[2] - v[2] * w[1]) - u[1] * (v[0] * w[2] - v[2] * w[0])
            + u[2] * (v[0] * w[1] - v[1] * w[0]);
        det.abs() / 6.0
    }

    #[test]
    fn single_tet_splits_into_eight() {
        let src = "*NODE\n1,0,0,0\n2,1,0,0\n3,0,1,0\n4,0,0,1\n\
                   *ELEMENT, TYPE=TET4\n1,1,2,3,4\n";
        let deck = Deck::parse_str(src).unwrap();
        let grid = Grid::from_deck(&deck).unwrap();

        let (fine, parents) = refine_once(&grid);
        assert_eq!(fine.num_vertices(), 10); // 4 corners + 6 midpoints
        assert_eq!(fine.tets.len(), 8);
        assert_eq!(parents.len(), 6);

        // Volume is conserved by regular refinement.
        let coarse_vol = tet_volume(&grid, &grid.tets[0]);
        let fine_vol: f64 = fine.tets.iter().map(|t| tet_volume(&fine, t)).sum();
        assert!((coarse_vol - fine_vol).abs() < 1e-14);
    }

    #[test]
    fn cube_refines_to_structured_counts() {
        let mut hierarchy = GridHierarchy::new(unit_cube());
        hierarchy.refine(1);

        let fine = hierarchy.top();
        assert_eq!(fine.num_vertices(), 27); // 3^3 lattice
        assert_eq!(fine.tets.len(), 48);

        hierarchy.refine(1);
        assert_eq!(hierarchy.top().num_vertices(), 125); // 5^3 lattice
        assert_eq!(hierarchy.top().tets.len(), 384);
        assert_eq!(hierarchy.num_levels(), 3);
    }

    #[test]
    fn midpoint_parents_are_coarse_vertices() {
        let mut hierarchy = GridHierarchy::new(unit_cube());
        hierarchy.refine(1);

        let coarse_count = hierarchy.level(0).num_vertices();
        for (k, &(a, b)) in hierarchy.parents(0).iter().enumerate() {
            assert!(a < coarse_count && b < coarse_count);
            let fine_v = hierarchy.top().vertices[coarse_count + k];
            let pa = hierarchy.level(0).vertices[a];
            let pb = hierarchy.level(0).vertices[b];
            for d in 0..3 {
                assert_eq!(fine_v[d], 0.5 * (pa[d] + pb[d]));
            }
        }
    }

    #[test]
    fn boundary_sets_cover_refined_faces() {
        let mut hierarchy = GridHierarchy::new(unit_cube());
        hierarchy.refine(2);

        let fine = hierarchy.top();
        let mask = fine.vertex_mask("bndNegative").unwrap();
        for (v, coords) in fine.vertices.iter().enumerate() {
            assert_eq!(
                mask[v],
                coords[0] == 0.0,
                "vertex {v} at {coords:?} misclassified"
            );
        }

        let mask = fine.vertex_mask("bndPositive").unwrap();
        for (v, coords) in fine.vertices.iter().enumerate() {
            assert_eq!(mask[v], coords[0] == 1.0);
        }
    }

    #[test]
    fn element_sets_follow_children() {
        let mut hierarchy = GridHierarchy::new(unit_cube());
        hierarchy.refine(1);
        let inner = hierarchy.top().element_set("Inner").unwrap();
        assert_eq!(inner.len(), 48);
        assert_eq!(inner[0], 0);
        assert_eq!(inner[47], 47);
    }
}

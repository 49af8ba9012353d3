//! Grid data structures built from a geometry deck.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;

use crate::deck::{Card, Deck};
use crate::{GridError, Result};

/// A conforming tetrahedral grid with named vertex and element subsets.
///
/// Vertex order matches the deck and defines the DOF numbering; external
/// node ids from the deck are resolved to 0-based indices at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Vertex coordinates in deck order.
    pub vertices: Vec<[f64; 3]>,
    /// Tetrahedra as 0-based vertex indices.
    pub tets: Vec<[usize; 4]>,
    /// Named vertex subsets (boundary markers), 0-based indices.
    pub vertex_sets: BTreeMap<String, Vec<usize>>,
    /// Named element subsets, 0-based tet indices.
    pub element_sets: BTreeMap<String, Vec<usize>>,
}

impl Grid {
    /// Load a grid from a geometry deck file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let deck = Deck::parse_file(path)?;
        Self::from_deck(&deck)
    }

    /// Build a grid from a parsed deck.
    pub fn from_deck(deck: &Deck) -> Result<Self> {
        let mut vertices = Vec::new();
        let mut id_map = HashMap::<i64, usize>::new();
        let mut tets = Vec::new();
        let mut vertex_sets = BTreeMap::<String, Vec<usize>>::new();
        let mut element_sets = BTreeMap::<String, Vec<usize>>::new();

        for card in &deck.cards {
            match card.keyword.as_str() {
                "NODE" => Self::read_nodes(card, &mut vertices, &mut id_map)?,
                "ELEMENT" => {
                    Self::read_elements(card, &id_map, &mut tets, &mut element_sets)?
                }
                "NSET" => Self::read_nset(card, &id_map, &mut vertex_sets)?,
                _ => {
                    return Err(GridError::parse(
                        card.line_start,
                        format!("unexpected card *{} in geometry deck", card.keyword),
                    ));
                }
            }
        }

        let grid = Self {
            vertices,
            tets,
            vertex_sets,
            element_sets,
        };
        grid.validate()?;
        Ok(grid)
    }

    fn read_nodes(
        card: &Card,
        vertices: &mut Vec<[f64; 3]>,
        id_map: &mut HashMap<i64, usize>,
    ) -> Result<()> {
        for line in &card.data_lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 4 {
                return Err(GridError::parse(
                    card.line_start,
                    format!("NODE line needs id and 3 coordinates: {line}"),
                ));
            }
            let id = parse_id(fields[0], card.line_start)?;
            let mut coords = [0.0; 3];
            for (k, field) in fields[1..].iter().enumerate() {
                coords[k] = field.parse::<f64>().map_err(|_| {
                    GridError::parse(card.line_start, format!("invalid coordinate: {field}"))
                })?;
            }
            if id_map.insert(id, vertices.len()).is_some() {
                return Err(GridError::parse(
                    card.line_start,
                    format!("duplicate node id {id}"),
                ));
            }
            vertices.push(coords);
        }
        Ok(())
    }

    fn read_elements(
        card: &Card,
        id_map: &HashMap<i64, usize>,
        tets: &mut Vec<[usize; 4]>,
        element_sets: &mut BTreeMap<String, Vec<usize>>,
    ) -> Result<()> {
        let elem_type = card.parameter("TYPE").unwrap_or("");
        if !elem_type.eq_ignore_ascii_case("TET4") {
            return Err(GridError::UnsupportedElementType(elem_type.to_string()));
        }
        let set_name = card.parameter("ELSET").map(str::to_string);

        for line in &card.data_lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 5 {
                return Err(GridError::parse(
                    card.line_start,
                    format!("TET4 line needs id and 4 node ids: {line}"),
                ));
            }
            let mut tet = [0usize; 4];
            for (k, field) in fields[1..].iter().enumerate() {
                let node_id = parse_id(field, card.line_start)?;
                tet[k] = *id_map.get(&node_id).ok_or_else(|| {
                    GridError::parse(
                        card.line_start,
                        format!("element references unknown node {node_id}"),
                    )
                })?;
            }
            if let Some(name) = &set_name {
                element_sets.entry(name.clone()).or_default().push(tets.len());
            }
            tets.push(tet);
        }
        Ok(())
    }

    fn read_nset(
        card: &Card,
        id_map: &HashMap<i64, usize>,
        vertex_sets: &mut BTreeMap<String, Vec<usize>>,
    ) -> Result<()> {
        let name = card
            .parameter("NSET")
            .ok_or_else(|| {
                GridError::parse(card.line_start, "missing NSET parameter on *NSET card")
            })?
            .to_string();

        let members = vertex_sets.entry(name).or_default();
        for line in &card.data_lines {
            for field in line.split(',') {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                let node_id = parse_id(field, card.line_start)?;
                let index = *id_map.get(&node_id).ok_or_else(|| {
                    GridError::parse(
                        card.line_start,
                        format!("NSET references unknown node {node_id}"),
                    )
                })?;
                members.push(index);
            }
        }
        Ok(())
    }

    /// Number of vertices (equals the number of scalar P1 DOFs).
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Look up a vertex set by name.
    pub fn vertex_set(&self, name: &str) -> Result<&[usize]> {
        self.vertex_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GridError::UnknownVertexSet(name.to_string()))
    }

    /// Look up an element set by name.
    pub fn element_set(&self, name: &str) -> Result<&[usize]> {
        self.element_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GridError::UnknownElementSet(name.to_string()))
    }

    /// Membership mask for a vertex set.
    pub fn vertex_mask(&self, name: &str) -> Result<Vec<bool>> {
        let mut mask = vec![false; self.vertices.len()];
        for &v in self.vertex_set(name)? {
            mask[v] = true;
        }
        Ok(mask)
    }

    /// Structural validation: index ranges and non-degenerate connectivity.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(GridError::Invalid("grid has no vertices".into()));
        }
        for (i, tet) in self.tets.iter().enumerate() {
            for &v in tet {
                if v >= self.vertices.len() {
                    return Err(GridError::Invalid(format!(
                        "tet {i} references out-of-range vertex {v}"
                    )));
                }
            }
            for a in 0..4 {
                for b in (a + 1)..4 {
                    if tet[a] == tet[b] {
                        return Err(GridError::Invalid(format!(
                            "tet {i} repeats vertex {}",
                            tet[a]
                        )));
                    }
                }
            }
        }
        for (name, members) in &self.vertex_sets {
            for &v in members {
                if v >= self.vertices.len() {
                    return Err(GridError::Invalid(format!(
                        "vertex set {name} references out-of-range vertex {v}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Grid statistics for reporting.
    pub fn statistics(&self) -> GridStatistics {
        GridStatistics {
            num_vertices: self.vertices.len(),
            num_tets: self.tets.len(),
            vertex_set_names: self.vertex_sets.keys().cloned().collect(),
            element_set_names: self.element_sets.keys().cloned().collect(),
        }
    }
}

/// Summary counts for a grid level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStatistics {
    pub num_vertices: usize,
    pub num_tets: usize,
    pub vertex_set_names: Vec<String>,
    pub element_set_names: Vec<String>,
}

fn parse_id(field: &str, line: usize) -> Result<i64> {
    field
        .parse::<i64>()
        .map_err(|_| GridError::parse(line, format!("invalid id: {field}")))
}

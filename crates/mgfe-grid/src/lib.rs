//! Tetrahedral grids for multigrid finite-element solves.
//!
//! A grid is read from a keyword-card geometry deck, validated, and then
//! refined uniformly into a level hierarchy. Vertex order is significant:
//! it defines the degree-of-freedom numbering used by the solver and the
//! reference files, so every operation here is deterministic.

pub mod deck;
pub mod error;
pub mod grid;
pub mod refine;

pub use deck::{Card, Deck, Parameter};
pub use error::GridError;
pub use grid::{Grid, GridStatistics};
pub use refine::{GridHierarchy, refine_once};

pub type Result<T> = std::result::Result<T, GridError>;

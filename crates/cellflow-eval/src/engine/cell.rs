use std::fmt;

use cellflow_common::Coord;
use cellflow_parse::{Extraction, UnsupportedOp};
use smallvec::SmallVec;

/// Arena index of a [`Cell`] inside a workload. Stable for the workload's
/// lifetime.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellId(pub(crate) u32);

impl CellId {
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    pub(crate) fn as_index(self) -> usize {
        self.0 as usize
    }
}

/// One dynamic cell: a unit of work.
///
/// Dependencies are computed once when the grid is scanned and never
/// recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub coord: Coord,
    /// Expression text, after any propagate rewrite.
    pub expr: String,
    pub dependencies: SmallVec<[Coord; 4]>,
    pub unsupported: Vec<UnsupportedOp>,
}

impl Cell {
    pub fn new(coord: Coord, extraction: Extraction) -> Self {
        Self {
            coord,
            expr: extraction.expression,
            dependencies: extraction.dependencies,
            unsupported: extraction.unsupported,
        }
    }

    /// Build a cell without running the extractor.
    pub fn from_parts(coord: Coord, expr: impl Into<String>, dependencies: Vec<Coord>) -> Self {
        Self {
            coord,
            expr: expr.into(),
            dependencies: SmallVec::from_vec(dependencies),
            unsupported: Vec::new(),
        }
    }

    pub fn depends_on(&self, coord: Coord) -> bool {
        self.dependencies.contains(&coord)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coord)
    }
}

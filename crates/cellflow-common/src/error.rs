//! Fatal errors raised while planning or executing a grid.
//!
//! Every variant aborts the run. Recognised-but-unsupported syntax is *not*
//! an error: it degrades to verbatim text inside the engine.

use thiserror::Error;

use crate::coord::Coord;

/// Process exit codes, one per failure family.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const INVALID_ARGUMENTS: u8 = 1;
    pub const INPUT_FILE_OPEN: u8 = 2;
    pub const INPUT_FILE_SCAN: u8 = 3;
    pub const OUTPUT_FILE_WRITE: u8 = 4;
    pub const INVALID_CELL_REFERENCE: u8 = 5;
    pub const INVALID_EXPRESSION: u8 = 6;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A reference token that is not `LETTERS` followed by a 1-based row.
    #[error("malformed cell reference '{token}'")]
    MalformedReference { token: String },

    /// A coordinate outside the grid. Signed so that "the row above row 0"
    /// can be reported as-is.
    #[error("invalid cell reference ({row}, {col}): outside the grid")]
    OutOfBounds { row: i64, col: i64 },

    /// An in-bounds coordinate that the Status Board has no record of.
    #[error("invalid cell reference {coord}: no cell is registered there")]
    AbsentCell { coord: Coord },

    #[error("invalid expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },

    #[error("circular dependency detected at {coord}")]
    CircularReference { coord: Coord },
}

impl CoreError {
    pub fn out_of_bounds(coord: Coord) -> Self {
        CoreError::OutOfBounds {
            row: i64::from(coord.row),
            col: i64::from(coord.col),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CoreError::MalformedReference { .. } | CoreError::InvalidExpression { .. } => {
                exit_code::INVALID_EXPRESSION
            }
            CoreError::OutOfBounds { .. }
            | CoreError::AbsentCell { .. }
            | CoreError::CircularReference { .. } => exit_code::INVALID_CELL_REFERENCE,
        }
    }
}

//! Capabilities the scheduler consumes while executing a bucket.

use std::sync::Arc;

use cellflow_common::{Coord, CoreError};

use crate::engine::Cell;

/* ─────────────────────────── ValueReader ─────────────────────────── */

/// Read-only view of finalized literals.
pub trait ValueReader {
    /// `Ok(None)` when the coordinate exists but is not finalized yet.
    /// Coordinates outside the grid are an error.
    fn value(&self, coord: Coord) -> Result<Option<&str>, CoreError>;
}

/* ─────────────────────────── Evaluator ───────────────────────────── */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The expression reduced to this literal.
    Literal(String),
    /// The expression uses syntax the evaluator does not handle, or reads a
    /// cell that is not finalized. The cell falls back to `text`, or to its
    /// own expression when `text` is `None`.
    Unsupported { text: Option<String> },
}

impl Evaluation {
    /// Unsupported, keeping the expression as written.
    pub fn unsupported() -> Self {
        Evaluation::Unsupported { text: None }
    }

    /// Unsupported, displaying a partially rewritten expression.
    pub fn unsupported_with(text: impl Into<String>) -> Self {
        Evaluation::Unsupported {
            text: Some(text.into()),
        }
    }
}

/// Reduces one cell's expression to a literal.
///
/// Implementations are shared across worker threads. Returning `Err` aborts
/// the whole run, so it is reserved for fatal conditions such as reading
/// outside the grid.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, cell: &Cell, values: &dyn ValueReader) -> Result<Evaluation, CoreError>;
}

impl<T: Evaluator + ?Sized> Evaluator for Box<T> {
    fn evaluate(&self, cell: &Cell, values: &dyn ValueReader) -> Result<Evaluation, CoreError> {
        (**self).evaluate(cell, values)
    }
}

impl<T: Evaluator + ?Sized> Evaluator for Arc<T> {
    fn evaluate(&self, cell: &Cell, values: &dyn ValueReader) -> Result<Evaluation, CoreError> {
        (**self).evaluate(cell, values)
    }
}

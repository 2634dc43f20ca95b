use std::fmt::{self, Display};

use cellflow_common::Coord;
use smallvec::SmallVec;

/// First character of every dynamic cell.
pub const FORMULA_MARKER: char = '=';

/// A cell whose whole expression is this copies the formula above it.
pub const PROPAGATE_EXPR: &str = "=^^";

/// "The cell directly above" operator.
pub const ABOVE_OPERATOR: &str = "E^";

/// Suffix that turns [`ABOVE_OPERATOR`] into the two-axis relative operator.
pub const TWO_AXIS_SUFFIX: char = 'v';

/// True if `text` is a dynamic cell (starts with the formula marker).
#[inline]
pub fn is_formula(text: &str) -> bool {
    text.starts_with(FORMULA_MARKER)
}

/// Operators that are recognised so they are not mis-parsed, but which the
/// engine does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnsupportedOp {
    /// `E^v`
    TwoAxisRelative,
    /// `@label<n>`, keeping the matched text.
    LabeledReference(String),
}

impl Display for UnsupportedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedOp::TwoAxisRelative => write!(f, "{ABOVE_OPERATOR}{TWO_AXIS_SUFFIX}"),
            UnsupportedOp::LabeledReference(text) => f.write_str(text),
        }
    }
}

/// Result of running the extractor over one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The expression after any propagate rewrite.
    pub expression: String,
    /// Coordinates read by the expression, unique, in first-seen order.
    pub dependencies: SmallVec<[Coord; 4]>,
    pub unsupported: Vec<UnsupportedOp>,
    /// Set when `=^^` replaced the cell text.
    pub rewritten: bool,
}

impl Extraction {
    pub(crate) fn new(expression: String, rewritten: bool) -> Self {
        Self {
            expression,
            dependencies: SmallVec::new(),
            unsupported: Vec::new(),
            rewritten,
        }
    }

    pub(crate) fn add_dependency(&mut self, coord: Coord) {
        if !self.dependencies.contains(&coord) {
            self.dependencies.push(coord);
        }
    }

    pub fn is_supported(&self) -> bool {
        self.unsupported.is_empty()
    }
}

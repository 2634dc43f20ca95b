use cellflow_common::{Coord, CoreError};

use crate::rewrite::propagate_from_above;
use crate::scan;
use crate::types::{Extraction, PROPAGATE_EXPR, UnsupportedOp};

/// Read access to the current expression of other cells.
///
/// Only the propagate operator needs it: a `=^^` cell copies whatever the
/// cell above holds at the time it is scanned (a formula for a pending cell,
/// the literal text for a finalized one).
pub trait ExpressionSource {
    fn expression_at(&self, coord: Coord) -> Result<String, CoreError>;
}

/// Extract the dependencies of the expression held by the cell at `at`.
///
/// The propagate rewrite runs first since it replaces the text every other
/// rule looks at. Direct references come next, then the cell-above operator.
/// `E^v` and `@label<n>` are recorded as unsupported and add nothing.
pub fn extract<S>(expr: &str, at: Coord, source: &S) -> Result<Extraction, CoreError>
where
    S: ExpressionSource + ?Sized,
{
    let mut out = if expr == PROPAGATE_EXPR {
        let above = source.expression_at(at.try_above()?)?;
        Extraction::new(propagate_from_above(&above)?, true)
    } else {
        Extraction::new(expr.to_string(), false)
    };

    let references = scan::direct_references(&out.expression)
        .map(|(_, token)| Coord::parse_a1(token))
        .collect::<Result<Vec<_>, _>>()?;
    for coord in references {
        out.add_dependency(coord);
    }

    if !scan::above_operators(&out.expression).is_empty() {
        out.add_dependency(at.try_above()?);
    }

    for _ in scan::two_axis_operators(&out.expression) {
        out.unsupported.push(UnsupportedOp::TwoAxisRelative);
    }
    let labels: Vec<UnsupportedOp> = scan::labeled_references(&out.expression)
        .map(|text| UnsupportedOp::LabeledReference(text.to_string()))
        .collect();
    out.unsupported.extend(labels);

    Ok(out)
}

//! Built-in evaluator for single-operand expressions.
//!
//! Handles `=A1`, `=E^`, `=incFrom(n)`, numeric literals and the empty body.
//! Everything else (operators, function calls, `E^v`, labeled references) is
//! reported as [`Evaluation::Unsupported`], with every finalized direct
//! reference and `E^` in the text replaced by its value.

use std::ops::Range;

use cellflow_common::{Coord, CoreError};
use cellflow_parse::scan;
use cellflow_parse::types::{ABOVE_OPERATOR, FORMULA_MARKER};

use crate::engine::Cell;
use crate::traits::{Evaluation, Evaluator, ValueReader};

const COUNTER_OPEN: &str = "incFrom(";
const COUNTER_CLOSE: &str = ")";

#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceEvaluator;

impl Evaluator for ReferenceEvaluator {
    fn evaluate(&self, cell: &Cell, values: &dyn ValueReader) -> Result<Evaluation, CoreError> {
        if cell.unsupported.is_empty() {
            if let Some(literal) = reduce(cell, values)? {
                return Ok(Evaluation::Literal(literal));
            }
        }
        substitute(cell, values)
    }
}

/// Literal for a single-operand body. `None` for any other body, or when the
/// operand reads a cell that is not finalized.
fn reduce(cell: &Cell, values: &dyn ValueReader) -> Result<Option<String>, CoreError> {
    let body = cell
        .expr
        .strip_prefix(FORMULA_MARKER)
        .unwrap_or(&cell.expr)
        .trim();

    if body.is_empty() {
        return Ok(Some(String::new()));
    }
    if body == ABOVE_OPERATOR {
        return read(values, cell.coord.try_above()?);
    }
    if let Ok(coord) = Coord::parse_a1(body) {
        return read(values, coord);
    }
    if let Some(n) = counter_value(body) {
        return Ok(Some(n.to_string()));
    }
    if is_number(body) {
        return Ok(Some(body.to_string()));
    }
    Ok(None)
}

fn read(values: &dyn ValueReader, coord: Coord) -> Result<Option<String>, CoreError> {
    Ok(values.value(coord)?.map(str::to_string))
}

/// Unsupported result whose text has every readable reference replaced by
/// its value. References to pending cells stay as written.
fn substitute(cell: &Cell, values: &dyn ValueReader) -> Result<Evaluation, CoreError> {
    let expr = cell.expr.as_str();
    let mut spans: Vec<(Range<usize>, Coord)> = scan::direct_references(expr)
        .map(|(span, token)| Coord::parse_a1(token).map(|coord| (span, coord)))
        .collect::<Result<_, _>>()?;
    let above = scan::above_operators(expr);
    if !above.is_empty() {
        let coord = cell.coord.try_above()?;
        spans.extend(above.into_iter().map(|span| (span, coord)));
    }
    spans.sort_by_key(|(span, _)| span.start);

    let mut out = String::with_capacity(expr.len());
    let mut last = 0;
    let mut replaced = false;
    for (span, coord) in spans {
        if let Some(value) = values.value(coord)? {
            out.push_str(&expr[last..span.start]);
            out.push_str(value);
            last = span.end;
            replaced = true;
        }
    }
    if !replaced {
        return Ok(Evaluation::unsupported());
    }
    out.push_str(&expr[last..]);
    Ok(Evaluation::unsupported_with(out))
}

/// `incFrom(n)` evaluates to its current counter value `n`.
fn counter_value(body: &str) -> Option<u64> {
    let digits = body.strip_prefix(COUNTER_OPEN)?.strip_suffix(COUNTER_CLOSE)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn is_number(body: &str) -> bool {
    body.bytes().any(|b| b.is_ascii_digit())
        && body.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

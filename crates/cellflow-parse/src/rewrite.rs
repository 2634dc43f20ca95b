use cellflow_common::CoreError;

use crate::scan::{COUNTER, DIRECT_REFERENCE_ROW, increment_captures};

/// Rewrite the expression copied from the cell above for a `=^^` cell.
///
/// Counters are bumped first (`incFrom(3)` -> `incFrom(4)`), then the row
/// digits of every direct reference (`A3` -> `A4`). This is plain text
/// substitution; nothing is evaluated.
pub fn propagate_from_above(above: &str) -> Result<String, CoreError> {
    let overflow = || CoreError::InvalidExpression {
        expr: above.to_string(),
        reason: "number too large to increment".to_string(),
    };
    let counted = increment_captures(above, &COUNTER).ok_or_else(overflow)?;
    increment_captures(&counted, &DIRECT_REFERENCE_ROW).ok_or_else(overflow)
}

//! Low-level scanners over expression text.
//!
//! `regex` has no look-ahead, so "`E^` not followed by `v`" is handled by
//! checking the byte after each match by hand.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ABOVE_OPERATOR, TWO_AXIS_SUFFIX};

pub(crate) static DIRECT_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]+\d+").expect("direct reference pattern"));

/// Same as [`DIRECT_REFERENCE`] with the row digits captured.
pub(crate) static DIRECT_REFERENCE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]+(\d+)").expect("direct reference row pattern"));

pub(crate) static COUNTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"incFrom\((\d+)\)").expect("counter pattern"));

static LABELED_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\w+<\d+>").expect("labeled reference pattern"));

/// Every direct reference token (`A1`, `BC12`, ...) with its byte span.
pub fn direct_references(expr: &str) -> impl Iterator<Item = (Range<usize>, &str)> + '_ {
    DIRECT_REFERENCE
        .find_iter(expr)
        .map(|m| (m.range(), m.as_str()))
}

/// Byte spans of every `E^` that is not immediately followed by `v`.
pub fn above_operators(expr: &str) -> Vec<Range<usize>> {
    operator_spans(expr)
        .filter(|span| !followed_by_suffix(expr, span.end))
        .collect()
}

/// Byte spans of every `E^v`.
pub fn two_axis_operators(expr: &str) -> Vec<Range<usize>> {
    operator_spans(expr)
        .filter(|span| followed_by_suffix(expr, span.end))
        .map(|span| span.start..span.end + TWO_AXIS_SUFFIX.len_utf8())
        .collect()
}

/// Every `@label<n>` occurrence.
pub fn labeled_references(expr: &str) -> impl Iterator<Item = &str> + '_ {
    LABELED_REFERENCE.find_iter(expr).map(|m| m.as_str())
}

/// Incremented copy of `expr` where the first capture group of every match of
/// `pattern` is a decimal number. Returns `None` if a number does not fit.
pub(crate) fn increment_captures(expr: &str, pattern: &Regex) -> Option<String> {
    let mut out = String::with_capacity(expr.len() + 4);
    let mut last = 0;
    for caps in pattern.captures_iter(expr) {
        let digits = caps.get(1)?;
        let n: u64 = digits.as_str().parse().ok()?;
        out.push_str(&expr[last..digits.start()]);
        out.push_str(&n.checked_add(1)?.to_string());
        last = digits.end();
    }
    out.push_str(&expr[last..]);
    Some(out)
}

fn operator_spans(expr: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    expr.match_indices(ABOVE_OPERATOR)
        .map(|(start, op)| start..start + op.len())
}

fn followed_by_suffix(expr: &str, end: usize) -> bool {
    expr[end..].starts_with(TWO_AXIS_SUFFIX)
}

//! Value Board rendering.

use std::fmt::Write as _;

use cellflow_common::column_name;
use cellflow_eval::engine::ValueBoard;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::IoError;

pub fn render(board: &ValueBoard, format: OutputFormat) -> Result<String, IoError> {
    match format {
        OutputFormat::Table => Ok(render_table(board)),
        OutputFormat::Json => render_json(board),
    }
}

/// Fixed-width table: a tab-indented legend of column letters, then one line
/// per row prefixed with its two-digit, one-based number. Every column is as
/// wide as its longest value.
///
/// ```text
///     A     B
/// 01  hello | x
/// ```
pub fn render_table(board: &ValueBoard) -> String {
    if board.rows() == 0 || board.cols() == 0 {
        return String::new();
    }

    let mut pads = vec![0usize; board.cols()];
    for row in board.iter_rows() {
        for (pad, value) in pads.iter_mut().zip(row) {
            *pad = (*pad).max(value.chars().count());
        }
    }

    let mut out = String::from("\t");
    for (x, &pad) in pads.iter().enumerate() {
        let _ = write!(
            out,
            "{:>lead$}{:trail$}",
            column_name(x as u32),
            "",
            lead = pad / 2 + pad % 2,
            trail = pad / 2 + 2
        );
        if pad >= 1 {
            out.push(' ');
        }
    }
    out.push('\n');

    for (y, row) in board.iter_rows().enumerate() {
        let _ = write!(out, "{:02}\t", y + 1);
        for (x, value) in row.iter().enumerate() {
            if x > 0 {
                out.push_str(" | ");
            }
            let _ = write!(out, "{:<pad$}", value, pad = pads[x]);
        }
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    rows: usize,
    cols: usize,
    values: Vec<&'a [String]>,
}

pub fn render_json(board: &ValueBoard) -> Result<String, IoError> {
    let report = JsonReport {
        rows: board.rows(),
        cols: board.cols(),
        values: board.iter_rows().collect(),
    };
    let mut text = serde_json::to_string_pretty(&report)?;
    text.push('\n');
    Ok(text)
}

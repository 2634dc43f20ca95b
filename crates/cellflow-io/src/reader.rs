//! Delimited grid ingestion.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use cellflow_common::RawGrid;

use crate::config::IoConfig;
use crate::error::IoError;

/// Read a grid from `path`, one row per line.
pub fn read_grid(path: impl AsRef<Path>, config: &IoConfig) -> Result<RawGrid, IoError> {
    let path = path.as_ref();

    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("read_grid", path = %path.display()).entered();

    let file = File::open(path).map_err(|source| IoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    collect_rows(BufReader::new(file), config, path)
}

/// Read a grid from any byte source.
pub fn read_grid_from_reader<R: Read>(reader: R, config: &IoConfig) -> Result<RawGrid, IoError> {
    collect_rows(reader, config, Path::new("<input>"))
}

/// Fields are taken verbatim: no quoting, no trimming, ragged rows kept as
/// they are. Lines end at `\n` and a trailing `\r` is dropped. A blank line
/// is a row holding one empty cell, so row numbers match file lines.
fn collect_rows<R: Read>(mut reader: R, config: &IoConfig, path: &Path) -> Result<RawGrid, IoError> {
    let scan_error = |line: u64, source: csv::Error| IoError::Scan {
        path: path.to_path_buf(),
        line,
        source,
    };

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| scan_error(0, csv::Error::from(e)))?;

    // Without quoting a record never spans lines, so every non-empty line is
    // exactly one record. The csv reader skips empty lines; they are put
    // back here.
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(bytes.as_slice());
    let mut records = rdr.records();

    let mut rows = RawGrid::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if line.is_empty() {
            rows.push(vec![String::new()]);
            continue;
        }
        let Some(record) = records.next() else {
            break;
        };
        let record = record.map_err(|source| scan_error(idx as u64 + 1, source))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if let Some(last) = row.last_mut() {
            if last.ends_with('\r') {
                last.pop();
            }
        }
        rows.push(row);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(rows = rows.len(), "grid read");

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> RawGrid {
        read_grid_from_reader(input.as_bytes(), &IoConfig::default()).unwrap()
    }

    #[test]
    fn splits_on_pipe_and_keeps_ragged_rows() {
        assert_eq!(
            read("1|=A1|x\n=E^\n"),
            vec![vec!["1", "=A1", "x"], vec!["=E^"]]
        );
    }

    #[test]
    fn fields_are_verbatim() {
        assert_eq!(
            read(" a | \"b\" ||\r\n"),
            vec![vec![" a ", " \"b\" ", "", ""]]
        );
    }

    #[test]
    fn blank_lines_are_rows_with_one_empty_cell() {
        assert_eq!(
            read("1\n\n3\n=A3\n"),
            vec![vec!["1"], vec![""], vec!["3"], vec!["=A3"]]
        );
        assert_eq!(read("a\r\n\r\nb"), vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn trailing_newline_adds_no_row() {
        assert_eq!(read("x|y\n"), vec![vec!["x", "y"]]);
        assert_eq!(read("x|y\n\n"), vec![vec!["x", "y"], vec![""]]);
        assert!(read("").is_empty());
    }

    #[test]
    fn custom_delimiter() {
        let config = IoConfig {
            delimiter: b';',
            ..IoConfig::default()
        };
        let grid = read_grid_from_reader("a;b|c\n".as_bytes(), &config).unwrap();
        assert_eq!(grid, vec![vec!["a", "b|c"]]);
    }

    #[test]
    fn invalid_utf8_is_a_scan_error() {
        let err = read_grid_from_reader(&b"ok\n\xff\xfe\n"[..], &IoConfig::default()).unwrap_err();
        assert!(matches!(err, IoError::Scan { line: 2, .. }), "{err:?}");
        assert_eq!(err.exit_code(), 3);
    }
}

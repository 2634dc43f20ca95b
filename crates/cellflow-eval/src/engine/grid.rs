//! Grid State: the Value Board and the Status Board.
//!
//! Both boards share one `rows x cols` shape and are stored row-major in a
//! flat vector. Any coordinate outside that shape is reported as
//! [`CoreError::OutOfBounds`].

use std::fmt;

use cellflow_common::{Coord, CoreError, column_name};

use super::bucket::BucketId;
use crate::traits::ValueReader;

/// Dense rectangular board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Board<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }
}

impl<T> Board<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        (coord.row as usize) < self.rows && (coord.col as usize) < self.cols
    }

    #[inline]
    pub fn get(&self, coord: Coord) -> Result<&T, CoreError> {
        if !self.contains(coord) {
            return Err(CoreError::out_of_bounds(coord));
        }
        Ok(&self.cells[coord.index(self.cols)])
    }

    #[inline]
    pub fn get_mut(&mut self, coord: Coord) -> Result<&mut T, CoreError> {
        if !self.contains(coord) {
            return Err(CoreError::out_of_bounds(coord));
        }
        let idx = coord.index(self.cols);
        Ok(&mut self.cells[idx])
    }

    pub fn set(&mut self, coord: Coord, value: T) -> Result<(), CoreError> {
        *self.get_mut(coord)? = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Every coordinate with its entry, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (Coord::new((i / cols) as u32, (i % cols) as u32), v))
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        let mut rows = Vec::with_capacity(self.rows);
        let mut cells = self.cells.into_iter();
        for _ in 0..self.rows {
            rows.push(cells.by_ref().take(self.cols).collect());
        }
        rows
    }
}

/* ───────────────────────────── Status ───────────────────────────── */

/// Per-coordinate lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Pending, homed in the given bucket.
    Unresolved(BucketId),
    /// The Value Board holds this coordinate's definitive literal.
    Finalized,
    /// No known cell. Only reachable for coordinates never scanned.
    Absent,
}

impl Status {
    /// Numeric code used by the board rendering: the bucket index, `-1` for
    /// finalized and `-2` for absent.
    pub fn code(self) -> i64 {
        match self {
            Status::Unresolved(bucket) => bucket.as_index() as i64,
            Status::Finalized => -1,
            Status::Absent => -2,
        }
    }
}

pub type StatusBoard = Board<Status>;
pub type ValueBoard = Board<String>;

impl fmt::Display for Board<Status> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StatusBoard:")?;
        if self.rows == 0 {
            return Ok(());
        }
        write!(f, "{:6}", "")?;
        for col in 0..self.cols {
            write!(f, "{:>2} ", column_name(col as u32))?;
        }
        writeln!(f)?;
        for (y, row) in self.iter_rows().enumerate() {
            write!(f, "{:02}  [ ", y + 1)?;
            for status in row {
                write!(f, "{:>2} ", status.code())?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

/* ──────────────────────────── GridState ─────────────────────────── */

/// The two parallel boards.
///
/// Invariant: a coordinate is [`Status::Finalized`] iff `values` holds its
/// definitive literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    values: ValueBoard,
    status: StatusBoard,
}

impl GridState {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            values: Board::filled(rows, cols, String::new()),
            status: Board::filled(rows, cols, Status::Absent),
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.values.dimensions()
    }

    pub fn values(&self) -> &ValueBoard {
        &self.values
    }

    pub fn status_board(&self) -> &StatusBoard {
        &self.status
    }

    pub fn status(&self, coord: Coord) -> Result<Status, CoreError> {
        self.status.get(coord).copied()
    }

    pub(crate) fn set_status(&mut self, coord: Coord, status: Status) -> Result<(), CoreError> {
        self.status.set(coord, status)
    }

    /// Write the literal for `coord` and mark it finalized.
    pub(crate) fn finalize(&mut self, coord: Coord, value: String) -> Result<(), CoreError> {
        self.values.set(coord, value)?;
        self.status.set(coord, Status::Finalized)
    }

    pub fn is_fully_finalized(&self) -> bool {
        self.status.iter().all(|(_, s)| *s == Status::Finalized)
    }

    pub fn into_values(self) -> ValueBoard {
        self.values
    }
}

impl ValueReader for GridState {
    fn value(&self, coord: Coord) -> Result<Option<&str>, CoreError> {
        match self.status(coord)? {
            Status::Finalized => Ok(Some(self.values.get(coord)?.as_str())),
            Status::Unresolved(_) | Status::Absent => Ok(None),
        }
    }
}

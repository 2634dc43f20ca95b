//! Grid coordinates and their A1 text form.
//!
//! `Coord` is a zero-based `(row, col)` pair. The textual form follows the
//! spreadsheet convention: a run of uppercase letters naming the column
//! (`A` = 0, `Z` = 25, `AA` = 26, ...) followed by the 1-based row number.

use core::fmt;

use crate::error::CoreError;

/// Absolute zero-based grid position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    #[inline(always)]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// The coordinate directly above this one, if it exists.
    #[inline]
    pub fn above(self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| Self::new(row, self.col))
    }

    /// Like [`Coord::above`], but reports the missing row as an out-of-bounds
    /// reference.
    pub fn try_above(self) -> Result<Self, CoreError> {
        self.above().ok_or(CoreError::OutOfBounds {
            row: i64::from(self.row) - 1,
            col: i64::from(self.col),
        })
    }

    /// Flat index into a row-major board with `cols` columns.
    #[inline(always)]
    pub fn index(self, cols: usize) -> usize {
        self.row as usize * cols + self.col as usize
    }

    /// Parse an A1-style token such as `B12` or `AA3`.
    pub fn parse_a1(token: &str) -> Result<Self, CoreError> {
        let malformed = || CoreError::MalformedReference {
            token: token.to_string(),
        };

        let split = token
            .find(|c: char| !c.is_ascii_uppercase())
            .ok_or_else(malformed)?;
        let (letters, digits) = token.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let col = column_index(letters).ok_or_else(malformed)?;
        let row: u32 = digits.parse().map_err(|_| malformed())?;
        if row == 0 {
            return Err(malformed());
        }
        Ok(Self::new(row - 1, col))
    }

    /// Column letters for this coordinate (`0` -> `A`, `26` -> `AA`).
    pub fn column_name(self) -> String {
        column_name(self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.col), u64::from(self.row) + 1)
    }
}

impl From<(u32, u32)> for Coord {
    fn from((row, col): (u32, u32)) -> Self {
        Self::new(row, col)
    }
}

impl From<Coord> for (u32, u32) {
    fn from(coord: Coord) -> Self {
        (coord.row, coord.col)
    }
}

/// Bijective base-26 column name.
pub fn column_name(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn column_index(letters: &str) -> Option<u32> {
    let mut acc: u32 = 0;
    for b in letters.bytes() {
        let digit = u32::from(b - b'A') + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    acc.checked_sub(1)
}

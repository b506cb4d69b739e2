//! A1-style cell references and rectangular ranges

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Zero-based position of a cell on a sheet.
///
/// Ordering is row-major (row first, then column), matching document order
/// in a worksheet part. Merge anchors and scan anchors rely on this.
///
/// ```
/// use rostercal_core::CellAddress;
///
/// let addr: CellAddress = "$B$2".parse().unwrap();
/// assert_eq!((addr.row, addr.col), (1, 1));
/// assert_eq!(addr.to_string(), "B2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
}

impl CellAddress {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a reference such as `C7` or `$AA$644`. Absolute markers are
    /// ignored; the sheet name prefix form (`Sheet1!A1`) is not accepted.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let plain: String = s.chars().filter(|c| *c != '$').collect();
        let split = plain
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::InvalidAddress(format!("'{}' has no row number", s)))?;
        let (letters, digits) = plain.split_at(split);

        let col = Self::letters_to_column(letters)
            .map_err(|_| Error::InvalidAddress(format!("'{}' has a bad column", s)))?;
        let row = match digits.parse::<u32>() {
            Ok(0) | Err(_) => {
                return Err(Error::InvalidAddress(format!("'{}' has a bad row", s)));
            }
            Ok(n) if n > MAX_ROWS => return Err(Error::OutOfBounds(s.to_string())),
            Ok(n) => n - 1,
        };
        Ok(Self { row, col })
    }

    /// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`
    pub fn column_to_letters(col: u16) -> String {
        let mut n = u32::from(col) + 1;
        let mut rev = Vec::with_capacity(3);
        while n > 0 {
            n -= 1;
            rev.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        rev.iter().rev().map(|b| *b as char).collect()
    }

    /// Inverse of [`CellAddress::column_to_letters`]; case-insensitive.
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::InvalidAddress(format!("bad column '{}'", letters)));
        }
        let mut n: u32 = 0;
        for b in letters.bytes() {
            n = n * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1;
            if n > u32::from(MAX_COLS) {
                return Err(Error::OutOfBounds(letters.to_string()));
            }
        }
        Ok((n - 1) as u16)
    }

    /// The cell `rows` down and `cols` right of this one, if it is on the sheet.
    pub fn offset(&self, rows: i64, cols: i64) -> Option<Self> {
        let row = i64::from(self.row) + rows;
        let col = i64::from(self.col) + cols;
        let on_sheet = (0..i64::from(MAX_ROWS)).contains(&row)
            && (0..i64::from(MAX_COLS)).contains(&col);
        on_sheet.then(|| Self::new(row as u32, col as u16))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Inclusive rectangle of cells, normalized so `start` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse `C2:E4`; a lone reference gives a one-cell range.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some((a, b)) = s.split_once(':') else {
            let addr = CellAddress::parse(s)?;
            return Ok(Self::new(addr, addr));
        };
        let bad = |e: Error| Error::InvalidRange(format!("'{}': {}", s, e));
        Ok(Self::new(
            CellAddress::parse(a).map_err(bad)?,
            CellAddress::parse(b).map_err(bad)?,
        ))
    }

    pub fn contains(&self, addr: &CellAddress) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    /// Check if the two rectangles share at least one cell
    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.end.row - self.start.row + 1) * u64::from(self.end.col - self.start.col + 1)
    }

    /// Every address in the range, row-major
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> {
        let (cols, rows) = (self.start.col..=self.end.col, self.start.row..=self.end.row);
        rows.flat_map(move |row| cols.clone().map(move |col| CellAddress::new(row, col)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

//! Container-level data handed from the reader to the grid

use crate::cell::RawCell;
use crate::style::StyleTables;

/// One worksheet as declared in the container
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    /// Sheet name from the workbook part
    pub name: String,
    /// Cells in document order; the first one is the baseline cell
    pub cells: Vec<RawCell>,
    /// `mergeCell` references, e.g. `"C2:E4"`
    pub merge_ranges: Vec<String>,
}

impl SheetData {
    /// Create an empty sheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The first declared cell
    pub fn baseline(&self) -> Option<&RawCell> {
        self.cells.first()
    }
}

/// Document-wide parts shared by every sheet
#[derive(Debug, Clone, Default)]
pub struct DocumentParts {
    /// Shared string table, by index
    pub shared_strings: Vec<String>,
    /// Style lookups
    pub styles: StyleTables,
    /// Serial dates count from 1904-01-01 instead of 1899-12-30
    pub date_1904: bool,
}

impl DocumentParts {
    /// Look up a shared string
    pub fn shared_string(&self, index: usize) -> Option<&str> {
        self.shared_strings.get(index).map(String::as_str)
    }
}

//! Layout strategy selection

use std::fmt;
use std::str::FromStr;

use rostercal_core::ScheduleBlock;

use crate::error::{ConvertError, Result};
use crate::fixed_layout;
use crate::grid::CellGrid;
use crate::scanner;

/// Which sheet layout to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// Color-banded roster with merged date headers
    #[default]
    Preceptor,
    /// One row per day with four lecture/presenter pairs
    Didactic,
}

impl Layout {
    /// Every layout, in declaration order
    pub const ALL: [Layout; 2] = [Layout::Preceptor, Layout::Didactic];

    /// The sheet name the layout reads when none is given
    pub fn default_sheet(&self) -> &'static str {
        match self {
            Layout::Preceptor => "Sheet1",
            Layout::Didactic => "Lecture & Presenter List",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Preceptor => "preceptor",
            Layout::Didactic => "didactic",
        }
    }

    /// Recover the blocks of one sheet.
    ///
    /// The preceptor layout is driven by merged date cells, so a sheet with
    /// no merges at all is rejected rather than read as empty.
    pub fn parse(&self, grid: &CellGrid<'_>) -> Result<Vec<ScheduleBlock>> {
        match self {
            Layout::Preceptor => {
                if grid.merges().is_empty() {
                    return Err(ConvertError::NoMergeRanges(grid.sheet_name().to_string()));
                }
                Ok(scanner::scan(grid))
            }
            Layout::Didactic => Ok(fixed_layout::extract(grid)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown layout '{}', expected preceptor or didactic", s))
    }
}

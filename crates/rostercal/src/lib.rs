//! # rostercal
//!
//! Turn color-coded spreadsheet duty rosters into per-person iCalendar files.
//!
//! The pipeline:
//!
//! - [`rostercal_xlsx`] reads the workbook container (cells, shared strings,
//!   styles, theme, merges)
//! - [`CellGrid`] classifies cells and resolves relative lookups
//! - a [`Layout`] recovers [`ScheduleBlock`]s from one sheet
//! - the [`Exporter`] projects blocks into named calendars
//!
//! ## Example
//!
//! ```rust,no_run
//! use rostercal::prelude::*;
//!
//! let blocks = rostercal::parse_file("roster.xlsx", Layout::Preceptor, None)?;
//!
//! let mut exporter = Exporter::new(ExportOptions::default());
//! exporter.add_blocks(&blocks)?;
//! for key in exporter.keys() {
//!     let bytes = exporter.render(key)?;
//!     std::fs::write(Exporter::file_name(key), bytes)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod export;
pub mod fixed_layout;
pub mod grid;
pub mod layout;
pub mod prelude;
pub mod scanner;

use std::io::{Read, Seek};
use std::path::Path;

pub use error::{ConvertError, Result};
pub use export::{CalendarEvent, ExportOptions, Exporter};
pub use grid::CellGrid;
pub use layout::Layout;

// Re-export core types
pub use rostercal_core::{
    CellAddress, CellKind, CellRange, CellValue, NamedColor, ScheduleBlock, ScheduleBlockPerson,
    ScheduleBlockShift, ShiftPeriod, NO_DATA,
};
pub use rostercal_core::style::number_format::{format_short_date, parse_short_date};
pub use rostercal_xlsx::{XlsxDocument, XlsxError};

/// Read the blocks of one sheet of an XLSX file.
///
/// `sheet` defaults to the layout's usual sheet name.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    layout: Layout,
    sheet: Option<&str>,
) -> Result<Vec<ScheduleBlock>> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), %layout, "reading roster");
    let mut doc = XlsxDocument::open(path)?;
    parse_document(&mut doc, layout, sheet)
}

/// Like [`parse_file`], reading from any seekable source
pub fn parse_reader<R: Read + Seek>(
    reader: R,
    layout: Layout,
    sheet: Option<&str>,
) -> Result<Vec<ScheduleBlock>> {
    let mut doc = XlsxDocument::from_reader(reader)?;
    parse_document(&mut doc, layout, sheet)
}

/// Read the blocks of one sheet of an open document
pub fn parse_document<R: Read + Seek>(
    doc: &mut XlsxDocument<R>,
    layout: Layout,
    sheet: Option<&str>,
) -> Result<Vec<ScheduleBlock>> {
    let name = sheet.unwrap_or_else(|| layout.default_sheet());
    let data = doc.read_sheet(name).map_err(|e| match e {
        XlsxError::SheetNotFound(name) => ConvertError::SheetNotFound(name),
        other => other.into(),
    })?;

    let grid = CellGrid::new(&data, doc.parts());
    layout.parse(&grid)
}
